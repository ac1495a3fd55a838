//! Whole-buffer and streaming encryption façade

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::ciphertext::Ciphertext;
use crate::config::CipherConfig;
use crate::error::Result;
use crate::key::{Iv, Key, KeyMaterial, KeySize};
use crate::random::{OsRandom, RandomSource};
use crate::stream::StreamingTransform;
use crate::{utils, Aes, Block, BLOCK_SIZE};

/// AES-CBC encryption with PKCS#7 padding.
///
/// The service keeps no key material between calls: every operation takes
/// the key and IV it needs and drops its own copies before returning.
#[derive(Debug, Clone)]
pub struct EncryptionService<R: RandomSource = OsRandom> {
    config: CipherConfig,
    rng: R,
}

impl EncryptionService<OsRandom> {
    /// Service backed by the operating system CSPRNG
    ///
    /// Fails with `UnsupportedConfig` when `config` does not validate.
    pub fn new(config: CipherConfig) -> Result<Self> {
        Self::with_random_source(config, OsRandom)
    }
}

impl Default for EncryptionService<OsRandom> {
    fn default() -> Self {
        Self {
            config: CipherConfig::default(),
            rng: OsRandom,
        }
    }
}

impl<R: RandomSource> EncryptionService<R> {
    /// Service drawing keys and IVs from `rng`
    ///
    /// # Arguments
    ///
    /// * `config` - Algorithm settings, validated here
    /// * `rng` - A cryptographically secure random source
    pub fn with_random_source(config: CipherConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// Settings this service was built with
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Encrypt `plaintext` under raw key and IV bytes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cbc_service::{CipherConfig, EncryptionService};
    ///
    /// let service = EncryptionService::new(CipherConfig::default())?;
    /// let key = [7u8; 32];
    /// let iv = [9u8; 16];
    ///
    /// let ciphertext = service.encrypt(b"Programando seguridad", &key, &iv)?;
    /// assert_eq!(ciphertext.len(), 32);
    ///
    /// let plaintext = service.decrypt(&ciphertext, &key, &iv)?;
    /// assert_eq!(plaintext, b"Programando seguridad");
    /// # Ok::<(), cbc_service::CipherError>(())
    /// ```
    pub fn encrypt(&self, plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Ciphertext> {
        self.encrypt_with(plaintext, &KeyMaterial::new(key, iv)?)
    }

    /// Decrypt `ciphertext` under raw key and IV bytes.
    ///
    /// Nothing is returned unless the whole input decrypts and unpads cleanly.
    pub fn decrypt(&self, ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_with(ciphertext, &KeyMaterial::new(key, iv)?)
    }

    /// Encrypt `plaintext` under an already validated key and IV
    pub fn encrypt_with(&self, plaintext: &[u8], material: &KeyMaterial) -> Result<Ciphertext> {
        let mut transform = self.encryptor(material)?;
        let mut out = transform.feed(plaintext)?;
        out.extend(transform.finalize()?);

        debug!(plaintext = plaintext.len(), ciphertext = out.len(), "encrypted buffer");
        Ok(Ciphertext::from_aligned(out))
    }

    /// Decrypt `ciphertext` under an already validated key and IV
    ///
    /// Empty or misaligned input fails with `InvalidCiphertextLength`
    /// before any block is decrypted.
    pub fn decrypt_with(&self, ciphertext: &[u8], material: &KeyMaterial) -> Result<Vec<u8>> {
        if let Err(err) = utils::check_ciphertext_len(ciphertext.len()) {
            warn!(%err, "rejecting ciphertext");
            return Err(err);
        }
        let mut transform = self.decryptor(material)?;

        let (head, last) = ciphertext.split_at(ciphertext.len() - BLOCK_SIZE);
        let mut plain = Zeroizing::new(transform.feed(head)?);
        plain.extend(transform.feed(last)?);
        plain.extend(transform.finalize()?);

        debug!(ciphertext = ciphertext.len(), plaintext = plain.len(), "decrypted buffer");
        Ok(std::mem::take(&mut *plain))
    }

    /// Start an incremental encryption under `material`
    pub fn encryptor(&self, material: &KeyMaterial) -> Result<StreamingTransform<Aes>> {
        let aes = Aes::new(material.key().as_bytes())?;
        Ok(StreamingTransform::encryptor(aes, material.iv()))
    }

    /// Start an incremental decryption under `material`
    pub fn decryptor(&self, material: &KeyMaterial) -> Result<StreamingTransform<Aes>> {
        let aes = Aes::new(material.key().as_bytes())?;
        Ok(StreamingTransform::decryptor(aes, material.iv()))
    }

    /// Draw a fresh key of `size` from the random source
    ///
    /// # Example
    ///
    /// ```rust
    /// use cbc_service::{EncryptionService, KeySize};
    ///
    /// let service: EncryptionService = EncryptionService::default();
    /// let key = service.generate_key(KeySize::Aes128)?;
    /// assert_eq!(key.as_bytes().len(), 16);
    /// # Ok::<(), cbc_service::CipherError>(())
    /// ```
    pub fn generate_key(&self, size: KeySize) -> Result<Key> {
        let mut bytes = Zeroizing::new(vec![0u8; size.bytes()]);
        self.rng.fill_bytes(&mut bytes)?;
        Key::new(&bytes)
    }

    /// Draw a fresh one-block IV from the random source
    pub fn generate_iv(&self) -> Result<Iv> {
        let mut block: Block = [0u8; BLOCK_SIZE];
        self.rng.fill_bytes(&mut block)?;
        Ok(Iv::from(block))
    }

    /// Fresh key of the configured size plus a fresh IV
    pub fn generate_key_material(&self) -> Result<KeyMaterial> {
        let key = self.generate_key(self.config.key_size)?;
        let iv = self.generate_iv()?;
        Ok(KeyMaterial::from_parts(key, iv))
    }
}
