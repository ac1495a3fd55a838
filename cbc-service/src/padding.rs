//! PKCS#7 padding

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CipherError, Result};

/// Padding schemes understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingScheme {
    #[default]
    Pkcs7,
}

impl fmt::Display for PaddingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaddingScheme::Pkcs7 => f.write_str("PKCS7"),
        }
    }
}

/// PKCS#7 stores the pad length in one byte, so blocks are 1..=255 bytes.
fn check_block_size(block_size: usize) -> Result<()> {
    if block_size == 0 || block_size > u8::MAX as usize {
        Err(CipherError::InvalidBlockSize(block_size))
    } else {
        Ok(())
    }
}

/// Append PKCS#7 padding.
///
/// Always adds between 1 and `block_size` bytes, so aligned input gains a
/// whole extra block.
///
/// # Arguments
///
/// * `data` - The bytes to pad
/// * `block_size` - Block size in bytes (1..=255)
///
/// # Example
///
/// ```rust
/// use cbc_service::padding::pad;
///
/// assert_eq!(pad(b"abc", 4)?, b"abc\x01");
/// assert_eq!(pad(b"abcd", 4)?, b"abcd\x04\x04\x04\x04");
/// # Ok::<(), cbc_service::CipherError>(())
/// ```
pub fn pad(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_block_size(block_size)?;
    let pad_len = block_size - data.len() % block_size;

    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    Ok(padded)
}

/// Strip PKCS#7 padding, rejecting anything malformed
///
/// # Arguments
///
/// * `data` - Padded bytes, normally the final decrypted block
/// * `block_size` - Block size in bytes (1..=255)
pub fn unpad(data: &[u8], block_size: usize) -> Result<&[u8]> {
    check_block_size(block_size)?;
    let pad_len = *data.last().ok_or(CipherError::Padding)? as usize;

    if pad_len == 0 || pad_len > block_size || pad_len > data.len() {
        return Err(CipherError::Padding);
    }

    let (body, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| b as usize != pad_len) {
        return Err(CipherError::Padding);
    }

    Ok(body)
}
