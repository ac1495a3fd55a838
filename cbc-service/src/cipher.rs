//! Block cipher primitive trait and the AES implementation behind it

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::error::{CipherError, Result};
use crate::key::KeySize;
use crate::{Block, BLOCK_SIZE};

/// Trait for a 128-bit block cipher with an already expanded key
pub trait BlockCipher {
    /// Encrypts a single block
    fn encrypt_block(&self, block: &Block) -> Block;

    /// Decrypts a single block
    fn decrypt_block(&self, block: &Block) -> Block;

    /// Returns the block size of the cipher
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}

/// AES keyed for one of the three standard key sizes.
///
/// The variant is picked from the key length. Key schedules are wiped when
/// the value is dropped.
#[derive(Clone)]
pub enum Aes {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl Aes {
    /// Expand `key` into an AES key schedule
    ///
    /// # Example
    ///
    /// ```rust
    /// use cbc_service::{Aes, BlockCipher};
    ///
    /// let aes = Aes::new(&[0u8; 32]).unwrap();
    /// assert_eq!(aes.block_size(), 16);
    /// ```
    pub fn new(key: &[u8]) -> Result<Self> {
        let size = KeySize::from_len(key.len())?;
        let invalid = |_| CipherError::InvalidKeySize { actual: key.len() };
        Ok(match size {
            KeySize::Aes128 => Aes::Aes128(Aes128::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes192 => Aes::Aes192(Aes192::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes256 => Aes::Aes256(Aes256::new_from_slice(key).map_err(invalid)?),
        })
    }

    pub fn key_size(&self) -> KeySize {
        match self {
            Aes::Aes128(_) => KeySize::Aes128,
            Aes::Aes192(_) => KeySize::Aes192,
            Aes::Aes256(_) => KeySize::Aes256,
        }
    }
}

impl std::fmt::Debug for Aes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aes({})", self.key_size())
    }
}

impl BlockCipher for Aes {
    fn encrypt_block(&self, block: &Block) -> Block {
        let mut out = *block;
        let buf = GenericArray::from_mut_slice(&mut out);
        match self {
            Aes::Aes128(c) => c.encrypt_block(buf),
            Aes::Aes192(c) => c.encrypt_block(buf),
            Aes::Aes256(c) => c.encrypt_block(buf),
        }
        out
    }

    fn decrypt_block(&self, block: &Block) -> Block {
        let mut out = *block;
        let buf = GenericArray::from_mut_slice(&mut out);
        match self {
            Aes::Aes128(c) => c.decrypt_block(buf),
            Aes::Aes192(c) => c.decrypt_block(buf),
            Aes::Aes256(c) => c.decrypt_block(buf),
        }
        out
    }
}
