//! # CBC Encryption Service
//!
//! AES in Cipher Block Chaining mode with PKCS#7 padding, exposed both as
//! whole-buffer calls and as an incremental `feed`/`finalize` transform.
//!
//! ## Layers
//!
//! - **KeyMaterial** - validated key (16/24/32 bytes) and IV (16 bytes)
//! - **padding** - PKCS#7 pad/unpad
//! - **CbcChain** - one CBC step over a keyed block cipher
//! - **StreamingTransform** - buffers partial blocks, holds back the last
//!   decrypted block until finalization
//! - **EncryptionService** - façade with key/IV generation
//!
//! ## Usage
//!
//! ```rust
//! use cbc_service::{CipherConfig, EncryptionService};
//!
//! let service = EncryptionService::new(CipherConfig::default())?;
//! let material = service.generate_key_material()?;
//!
//! let ciphertext = service.encrypt_with(b"Hello, World!", &material)?;
//! assert_eq!(ciphertext.len(), 16);
//!
//! let plaintext = service.decrypt_with(&ciphertext, &material)?;
//! assert_eq!(plaintext, b"Hello, World!");
//! # Ok::<(), cbc_service::CipherError>(())
//! ```
//!
//! A fresh IV must be used for every message encrypted under the same key.

// Public modules
pub mod cipher;
pub mod ciphertext;
pub mod config;
pub mod error;
pub mod key;
pub mod modes;
pub mod padding;
pub mod random;
pub mod service;
pub mod stream;
pub mod utils;

// Re-exports for easy access
pub use cipher::{Aes, BlockCipher};
pub use ciphertext::Ciphertext;
pub use config::CipherConfig;
pub use error::{CipherError, Result};
pub use key::{Iv, Key, KeyMaterial, KeySize};
pub use modes::{CbcChain, CipherMode};
pub use padding::PaddingScheme;
pub use random::{OsRandom, RandomSource};
pub use service::EncryptionService;
pub use stream::{Direction, StreamingTransform, TransformState};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cipher block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// A single cipher block
pub type Block = [u8; BLOCK_SIZE];
