//! Block-aligned ciphertext value

use std::fmt;
use std::ops::Deref;

use crate::error::Result;
use crate::{utils, BLOCK_SIZE};

/// CBC ciphertext: always a non-zero whole number of blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Wrap raw bytes, rejecting empty or misaligned input
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self> {
        utils::check_ciphertext_len(bytes.len())?;
        Ok(Ciphertext(bytes))
    }

    /// Parse hex text; surrounding whitespace is ignored
    pub fn from_hex(text: &str) -> Result<Self> {
        Self::from_vec(hex::decode(text.trim())?)
    }

    pub(crate) fn from_aligned(bytes: Vec<u8>) -> Self {
        debug_assert!(utils::check_ciphertext_len(bytes.len()).is_ok());
        Ciphertext(bytes)
    }

    /// Lowercase hex, two characters per byte
    ///
    /// # Example
    ///
    /// ```rust
    /// use cbc_service::Ciphertext;
    ///
    /// let ciphertext = Ciphertext::from_vec(vec![0xAB; 16])?;
    /// assert_eq!(ciphertext.to_hex(), "ab".repeat(16));
    /// # Ok::<(), cbc_service::CipherError>(())
    /// ```
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Borrow the raw ciphertext bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take ownership of the raw ciphertext bytes
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Number of 16-byte blocks, always at least one
    pub fn block_count(&self) -> usize {
        self.0.len() / BLOCK_SIZE
    }

    /// Iterate over the ciphertext one block at a time
    pub fn blocks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.0.chunks_exact(BLOCK_SIZE)
    }
}

impl Deref for Ciphertext {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Ciphertext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Ciphertext> for Vec<u8> {
    fn from(ciphertext: Ciphertext) -> Self {
        ciphertext.0
    }
}

impl TryFrom<Vec<u8>> for Ciphertext {
    type Error = crate::CipherError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_vec(bytes)
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
