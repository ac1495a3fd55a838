//! CBC (Cipher Block Chaining) mode implementation

use crate::{utils, Block, BlockCipher};

/// One step of CBC chaining over a keyed block cipher.
///
/// The chain holds no chaining state of its own: callers pass the current
/// chaining value in and receive the next one back.
#[derive(Debug, Clone)]
pub struct CbcChain<C: BlockCipher> {
    cipher: C,
}

impl<C: BlockCipher> CbcChain<C> {
    /// Wrap an already keyed block cipher
    ///
    /// # Example
    ///
    /// ```rust
    /// use cbc_service::{Aes, CbcChain};
    ///
    /// let chain = CbcChain::new(Aes::new(&[0u8; 16])?);
    /// let (cipher, next) = chain.encrypt_block(&[0u8; 16], &[0u8; 16]);
    /// assert_eq!(cipher, next);
    /// # Ok::<(), cbc_service::CipherError>(())
    /// ```
    pub fn new(cipher: C) -> Self {
        Self { cipher }
    }

    /// The underlying block cipher
    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// C_i = E(K, P_i ⊕ C_{i-1}), with C_0 = IV
    ///
    /// Returns the ciphertext block and the next chaining value.
    pub fn encrypt_block(&self, plain: &Block, chain: &Block) -> (Block, Block) {
        let cipher = self.cipher.encrypt_block(&utils::xor_blocks(plain, chain));
        (cipher, cipher)
    }

    /// P_i = D(K, C_i) ⊕ C_{i-1}, with C_0 = IV
    ///
    /// Returns the plaintext block and the next chaining value.
    pub fn decrypt_block(&self, cipher: &Block, chain: &Block) -> (Block, Block) {
        let plain = utils::xor_blocks(&self.cipher.decrypt_block(cipher), chain);
        (plain, *cipher)
    }
}
