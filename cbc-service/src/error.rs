//! Error types for encryption service operations

use thiserror::Error;

use crate::stream::TransformState;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CipherError {
    #[error("Invalid key size: {actual} bytes (expected 16, 24 or 32)")]
    InvalidKeySize { actual: usize },

    #[error("Invalid IV size: expected {expected} bytes, got {actual}")]
    InvalidIvSize { expected: usize, actual: usize },

    #[error("Invalid ciphertext length: {actual} bytes is not a non-zero multiple of {block_size}")]
    InvalidCiphertextLength { actual: usize, block_size: usize },

    #[error("Invalid block size: {0} bytes (must be 1..=255)")]
    InvalidBlockSize(usize),

    #[error("Padding error")]
    Padding,

    #[error("Transform is {0}, no further input accepted")]
    InvalidState(TransformState),

    #[error("Secure random source failed: {0}")]
    Randomness(String),

    #[error("Invalid ciphertext encoding: {0}")]
    InvalidEncoding(#[from] hex::FromHexError),

    #[error("Unsupported configuration: {0}")]
    UnsupportedConfig(String),
}

pub type Result<T> = std::result::Result<T, CipherError>;
