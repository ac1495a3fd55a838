//! Utility functions for block handling

use crate::error::{CipherError, Result};
use crate::{Block, BLOCK_SIZE};

/// XOR two blocks
pub fn xor_blocks(a: &Block, b: &Block) -> Block {
    let mut out = [0u8; BLOCK_SIZE];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = x ^ y;
    }
    out
}

/// Copy the first block of `data` into a `Block`
pub(crate) fn to_block(data: &[u8]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(&data[..BLOCK_SIZE]);
    block
}

/// Check that `len` bytes can be a CBC ciphertext
pub fn check_ciphertext_len(len: usize) -> Result<()> {
    if len == 0 || len % BLOCK_SIZE != 0 {
        Err(CipherError::InvalidCiphertextLength {
            actual: len,
            block_size: BLOCK_SIZE,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_blocks() {
        let a = [0xF0u8; 16];
        let b = [0x0Fu8; 16];
        assert_eq!(xor_blocks(&a, &b), [0xFFu8; 16]);
        assert_eq!(xor_blocks(&a, &a), [0u8; 16]);
    }

    #[test]
    fn test_check_ciphertext_len() {
        assert!(check_ciphertext_len(16).is_ok());
        assert!(check_ciphertext_len(64).is_ok());
        for len in [0, 1, 15, 17, 33] {
            assert_eq!(
                check_ciphertext_len(len),
                Err(CipherError::InvalidCiphertextLength { actual: len, block_size: 16 })
            );
        }
    }
}
