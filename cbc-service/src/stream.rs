//! Incremental CBC transform with explicit feed/finalize

use std::fmt;

use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{CipherError, Result};
use crate::key::Iv;
use crate::modes::CbcChain;
use crate::{padding, utils, Aes, Block, BlockCipher, BLOCK_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Lifecycle of a [`StreamingTransform`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformState {
    Active,
    Finalized,
    Failed,
}

impl fmt::Display for TransformState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformState::Active => f.write_str("active"),
            TransformState::Finalized => f.write_str("finalized"),
            TransformState::Failed => f.write_str("failed"),
        }
    }
}

/// CBC encryptor or decryptor fed in arbitrary-sized chunks.
///
/// Partial blocks are buffered between calls to [`feed`](Self::feed).
/// When decrypting, the most recent plaintext block is held back until
/// [`finalize`](Self::finalize) because only then is it known to carry the
/// padding. Once finalized or failed the transform rejects all input.
///
/// # Example
///
/// ```rust
/// use cbc_service::{Aes, Iv, StreamingTransform};
///
/// let aes = Aes::new(&[0u8; 16]).unwrap();
/// let iv = Iv::from([0u8; 16]);
///
/// let mut enc = StreamingTransform::encryptor(aes.clone(), &iv);
/// let mut ciphertext = enc.feed(b"Programando ").unwrap();
/// ciphertext.extend(enc.feed(b"seguridad").unwrap());
/// ciphertext.extend(enc.finalize().unwrap());
/// assert_eq!(ciphertext.len(), 32);
///
/// let mut dec = StreamingTransform::decryptor(aes, &iv);
/// let mut plaintext = dec.feed(&ciphertext).unwrap();
/// plaintext.extend(dec.finalize().unwrap());
/// assert_eq!(plaintext, b"Programando seguridad");
/// ```
pub struct StreamingTransform<C: BlockCipher = Aes> {
    chain: CbcChain<C>,
    direction: Direction,
    state: TransformState,
    chain_value: Block,
    buffer: Zeroizing<Vec<u8>>,
    held: Option<Block>,
    consumed: usize,
}

impl<C: BlockCipher> StreamingTransform<C> {
    /// Create a transform seeded with `iv` as the first chaining value
    ///
    /// # Arguments
    ///
    /// * `cipher` - Keyed block cipher, owned by the transform
    /// * `direction` - Whether fed bytes are plaintext or ciphertext
    /// * `iv` - Initialization vector; never reuse one under the same key
    pub fn new(cipher: C, direction: Direction, iv: &Iv) -> Self {
        debug!(%direction, "starting CBC transform");
        Self {
            chain: CbcChain::new(cipher),
            direction,
            state: TransformState::Active,
            chain_value: *iv.as_block(),
            buffer: Zeroizing::new(Vec::with_capacity(BLOCK_SIZE)),
            held: None,
            consumed: 0,
        }
    }

    /// Shorthand for `new(cipher, Direction::Encrypt, iv)`
    pub fn encryptor(cipher: C, iv: &Iv) -> Self {
        Self::new(cipher, Direction::Encrypt, iv)
    }

    /// Shorthand for `new(cipher, Direction::Decrypt, iv)`
    pub fn decryptor(cipher: C, iv: &Iv) -> Self {
        Self::new(cipher, Direction::Decrypt, iv)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    /// Total bytes passed to `feed` so far
    pub fn bytes_consumed(&self) -> usize {
        self.consumed
    }

    /// Consume `chunk` and return every output byte that is ready.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        self.ensure_active()?;
        self.consumed += chunk.len();
        self.buffer.extend_from_slice(chunk);

        let full = self.buffer.len() / BLOCK_SIZE * BLOCK_SIZE;
        let blocks = Zeroizing::new(self.buffer.drain(..full).collect::<Vec<u8>>());

        let mut emitted = Vec::with_capacity(full);
        for block in blocks.chunks_exact(BLOCK_SIZE) {
            self.process(&utils::to_block(block), &mut emitted);
        }
        Ok(emitted)
    }

    /// Flush the final block and close the transform.
    ///
    /// Encrypting pads the buffered tail into one last ciphertext block.
    /// Decrypting strips the padding from the held-back block; a misaligned
    /// or empty input, or malformed padding, leaves the transform `Failed`.
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        self.ensure_active()?;
        let out = match self.direction {
            Direction::Encrypt => self.finalize_encrypt()?,
            Direction::Decrypt => self.finalize_decrypt()?,
        };
        self.state = TransformState::Finalized;
        self.wipe();
        debug!(direction = %self.direction, consumed = self.consumed, "CBC transform finalized");
        Ok(out)
    }

    fn finalize_encrypt(&mut self) -> Result<Vec<u8>> {
        let last = Zeroizing::new(padding::pad(&self.buffer, BLOCK_SIZE)?);
        let (cipher, _) = self
            .chain
            .encrypt_block(&utils::to_block(&last), &self.chain_value);
        Ok(cipher.to_vec())
    }

    fn finalize_decrypt(&mut self) -> Result<Vec<u8>> {
        if !self.buffer.is_empty() || self.consumed == 0 {
            return Err(self.fail(CipherError::InvalidCiphertextLength {
                actual: self.consumed,
                block_size: BLOCK_SIZE,
            }));
        }
        let Some(mut last) = self.held.take() else {
            return Err(self.fail(CipherError::InvalidCiphertextLength {
                actual: self.consumed,
                block_size: BLOCK_SIZE,
            }));
        };

        let result = padding::unpad(&last, BLOCK_SIZE).map(<[u8]>::to_vec);
        last.zeroize();
        result.map_err(|err| self.fail(err))
    }

    fn process(&mut self, block: &Block, emitted: &mut Vec<u8>) {
        match self.direction {
            Direction::Encrypt => {
                let (cipher, next) = self.chain.encrypt_block(block, &self.chain_value);
                self.chain_value = next;
                emitted.extend_from_slice(&cipher);
            }
            Direction::Decrypt => {
                let (plain, next) = self.chain.decrypt_block(block, &self.chain_value);
                self.chain_value = next;
                if let Some(mut previous) = self.held.replace(plain) {
                    emitted.extend_from_slice(&previous);
                    previous.zeroize();
                }
            }
        }
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            TransformState::Active => Ok(()),
            state => Err(CipherError::InvalidState(state)),
        }
    }

    fn fail(&mut self, err: CipherError) -> CipherError {
        warn!(direction = %self.direction, consumed = self.consumed, %err, "CBC transform failed");
        self.state = TransformState::Failed;
        self.wipe();
        err
    }

    fn wipe(&mut self) {
        self.buffer.zeroize();
        self.chain_value.zeroize();
        if let Some(held) = self.held.as_mut() {
            held.zeroize();
        }
        self.held = None;
    }
}

impl<C: BlockCipher> Drop for StreamingTransform<C> {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl<C: BlockCipher> fmt::Debug for StreamingTransform<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingTransform")
            .field("direction", &self.direction)
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .field("consumed", &self.consumed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x2Au8; 32];
    const MESSAGE: &[u8] = b"Integration test message spanning several AES blocks!";

    fn aes() -> Aes {
        Aes::new(&KEY).unwrap()
    }

    fn iv() -> Iv {
        Iv::from([0x11u8; 16])
    }

    fn encrypt_in_chunks(data: &[u8], chunk: usize) -> Vec<u8> {
        let mut enc = StreamingTransform::encryptor(aes(), &iv());
        let mut out = Vec::new();
        for piece in data.chunks(chunk.max(1)) {
            out.extend(enc.feed(piece).unwrap());
        }
        out.extend(enc.finalize().unwrap());
        out
    }

    #[test]
    fn test_chunking_does_not_change_ciphertext() {
        let reference = encrypt_in_chunks(MESSAGE, MESSAGE.len());
        for chunk in [1, 3, 15, 16, 17, 32] {
            assert_eq!(encrypt_in_chunks(MESSAGE, chunk), reference, "chunk size {chunk}");
        }
    }

    #[test]
    fn test_encrypt_emits_full_blocks_only() {
        let mut enc = StreamingTransform::encryptor(aes(), &iv());
        assert!(enc.feed(&[0u8; 10]).unwrap().is_empty());
        assert_eq!(enc.feed(&[0u8; 10]).unwrap().len(), 16);
        assert_eq!(enc.feed(&[0u8; 12]).unwrap().len(), 16);
        assert_eq!(enc.finalize().unwrap().len(), 16);
        assert_eq!(enc.state(), TransformState::Finalized);
    }

    #[test]
    fn test_constructors_set_direction() {
        let enc = StreamingTransform::encryptor(aes(), &iv());
        let dec = StreamingTransform::decryptor(aes(), &iv());
        let explicit = StreamingTransform::new(aes(), Direction::Decrypt, &iv());

        assert_eq!(enc.direction(), Direction::Encrypt);
        assert_eq!(dec.direction(), Direction::Decrypt);
        assert_eq!(explicit.direction(), Direction::Decrypt);
        assert_eq!(enc.direction().to_string(), "encrypt");
        assert_eq!(dec.state(), TransformState::Active);
    }

    #[test]
    fn test_encrypt_empty_input() {
        let mut enc = StreamingTransform::encryptor(aes(), &iv());
        assert_eq!(enc.finalize().unwrap().len(), 16);
    }

    #[test]
    fn test_decrypt_holds_back_last_block() {
        let ciphertext = encrypt_in_chunks(MESSAGE, 64);
        assert_eq!(ciphertext.len(), 64);

        let mut dec = StreamingTransform::decryptor(aes(), &iv());
        assert!(dec.feed(&ciphertext[..16]).unwrap().is_empty());
        assert_eq!(dec.feed(&ciphertext[16..40]).unwrap().len(), 16);
        assert_eq!(dec.feed(&ciphertext[40..]).unwrap().len(), 32);

        let tail = dec.finalize().unwrap();
        assert_eq!(tail, &MESSAGE[48..]);
    }

    #[test]
    fn test_decrypt_roundtrip_byte_by_byte() {
        let ciphertext = encrypt_in_chunks(MESSAGE, 7);
        let mut dec = StreamingTransform::decryptor(aes(), &iv());
        let mut plain = Vec::new();
        for byte in &ciphertext {
            plain.extend(dec.feed(std::slice::from_ref(byte)).unwrap());
        }
        plain.extend(dec.finalize().unwrap());
        assert_eq!(plain, MESSAGE);
    }

    #[test]
    fn test_feed_after_finalize() {
        let mut enc = StreamingTransform::encryptor(aes(), &iv());
        enc.feed(b"data").unwrap();
        enc.finalize().unwrap();

        assert_eq!(
            enc.feed(b"more"),
            Err(CipherError::InvalidState(TransformState::Finalized))
        );
        assert_eq!(
            enc.finalize(),
            Err(CipherError::InvalidState(TransformState::Finalized))
        );
    }

    #[test]
    fn test_decrypt_partial_block_fails() {
        let ciphertext = encrypt_in_chunks(MESSAGE, 16);
        let mut dec = StreamingTransform::decryptor(aes(), &iv());
        dec.feed(&ciphertext[..ciphertext.len() - 1]).unwrap();

        assert_eq!(
            dec.finalize(),
            Err(CipherError::InvalidCiphertextLength { actual: 63, block_size: 16 })
        );
        assert_eq!(dec.state(), TransformState::Failed);
        assert_eq!(
            dec.feed(&ciphertext[63..]),
            Err(CipherError::InvalidState(TransformState::Failed))
        );
    }

    #[test]
    fn test_decrypt_nothing_fails() {
        let mut dec = StreamingTransform::decryptor(aes(), &iv());
        assert!(matches!(
            dec.finalize(),
            Err(CipherError::InvalidCiphertextLength { actual: 0, .. })
        ));
    }

    #[test]
    fn test_bad_padding_fails_transform() {
        // A zero plaintext block decrypts to a pad value of 0
        let chain = CbcChain::new(aes());
        let (forged, _) = chain.encrypt_block(&[0u8; 16], iv().as_block());

        let mut dec = StreamingTransform::decryptor(aes(), &iv());
        assert!(dec.feed(&forged).unwrap().is_empty());
        assert_eq!(dec.finalize(), Err(CipherError::Padding));
        assert_eq!(dec.state(), TransformState::Failed);
        assert_eq!(
            dec.finalize(),
            Err(CipherError::InvalidState(TransformState::Failed))
        );
    }

    #[test]
    fn test_abandoned_transform_stays_active() {
        let mut enc = StreamingTransform::encryptor(aes(), &iv());
        enc.feed(&[1u8; 20]).unwrap();
        assert_eq!(enc.state(), TransformState::Active);
        assert_eq!(enc.bytes_consumed(), 20);
        drop(enc);
    }

    #[test]
    fn test_debug_hides_contents() {
        let mut enc = StreamingTransform::encryptor(aes(), &iv());
        enc.feed(b"secret").unwrap();
        let shown = format!("{enc:?}");
        assert!(shown.contains("buffered: 6"));
        assert!(!shown.contains("secret"));
    }
}
