//! Key and IV material with size validation

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CipherError, Result};
use crate::{Block, BLOCK_SIZE};

/// Supported AES key sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySize {
    Aes128,
    Aes192,
    #[default]
    Aes256,
}

impl KeySize {
    pub const ALL: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    pub fn bytes(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    pub fn bits(self) -> usize {
        self.bytes() * 8
    }

    /// Map a key length in bytes to its key size
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(KeySize::Aes128),
            24 => Ok(KeySize::Aes192),
            32 => Ok(KeySize::Aes256),
            actual => Err(CipherError::InvalidKeySize { actual }),
        }
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.bits())
    }
}

/// Secret key bytes.
///
/// The size is fixed at construction and the bytes are only wiped on drop,
/// so a live `Key` always holds a full AES key.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    bytes: Vec<u8>,
    size: KeySize,
}

impl Key {
    /// Copy `bytes` into a key, rejecting lengths other than 16, 24 or 32
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let size = KeySize::from_len(bytes.len())?;
        Ok(Key {
            bytes: bytes.to_vec(),
            size,
        })
    }

    pub fn size(&self) -> KeySize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl ZeroizeOnDrop for Key {}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}, REDACTED)", self.size())
    }
}

/// Initialization vector, exactly one block long
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct Iv(Block);

impl Iv {
    /// Copy `bytes` into an IV, rejecting anything but one block
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let block: Block = bytes.try_into().map_err(|_| CipherError::InvalidIvSize {
            expected: BLOCK_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Iv(block))
    }

    pub fn as_block(&self) -> &Block {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Block> for Iv {
    fn from(block: Block) -> Self {
        Iv(block)
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Iv(REDACTED)")
    }
}

/// A validated key and IV pair.
///
/// Construction fails unless the key is 16, 24 or 32 bytes and the IV is
/// exactly one block. Both buffers are wiped when the value is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    key: Key,
    iv: Iv,
}

impl KeyMaterial {
    /// Validate raw key and IV bytes
    ///
    /// # Example
    ///
    /// ```rust
    /// use cbc_service::{CipherError, KeyMaterial};
    ///
    /// assert!(KeyMaterial::new(&[0u8; 16], &[0u8; 16]).is_ok());
    /// assert!(matches!(
    ///     KeyMaterial::new(&[0u8; 20], &[0u8; 16]),
    ///     Err(CipherError::InvalidKeySize { actual: 20 })
    /// ));
    /// ```
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        Ok(KeyMaterial {
            key: Key::new(key)?,
            iv: Iv::new(iv)?,
        })
    }

    pub fn from_parts(key: Key, iv: Iv) -> Self {
        KeyMaterial { key, iv }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn iv(&self) -> &Iv {
        &self.iv
    }
}

// Both fields wipe themselves on drop
impl ZeroizeOnDrop for KeyMaterial {}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &self.key)
            .field("iv", &self.iv)
            .finish()
    }
}
