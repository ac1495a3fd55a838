//! Service configuration

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CipherError, Result};
use crate::key::KeySize;
use crate::modes::CipherMode;
use crate::padding::PaddingScheme;
use crate::BLOCK_SIZE;

/// Explicit algorithm settings handed to [`EncryptionService`](crate::EncryptionService).
///
/// Missing fields fall back to the defaults: 128-bit blocks, CBC, PKCS#7
/// and a 256-bit generated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    pub block_size_bits: usize,
    pub mode: CipherMode,
    pub padding: PaddingScheme,
    /// Size used by `generate_key_material`
    pub key_size: KeySize,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            block_size_bits: BLOCK_SIZE * 8,
            mode: CipherMode::Cbc,
            padding: PaddingScheme::Pkcs7,
            key_size: KeySize::Aes256,
        }
    }
}

impl CipherConfig {
    pub fn with_key_size(mut self, key_size: KeySize) -> Self {
        self.key_size = key_size;
        self
    }

    /// AES only has 128-bit blocks; reject anything else.
    pub fn validate(&self) -> Result<()> {
        if self.block_size_bits != BLOCK_SIZE * 8 {
            return Err(CipherError::UnsupportedConfig(format!(
                "block size {} bits (only {} is supported)",
                self.block_size_bits,
                BLOCK_SIZE * 8
            )));
        }
        Ok(())
    }
}

impl fmt::Display for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block size: {}", self.block_size_bits)?;
        writeln!(f, "Cipher mode: {}", self.mode)?;
        writeln!(f, "Padding mode: {}", self.padding)?;
        write!(f, "Key size: {}", self.key_size.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CipherConfig::default();
        assert_eq!(config.block_size_bits, 128);
        assert_eq!(config.mode, CipherMode::Cbc);
        assert_eq!(config.padding, PaddingScheme::Pkcs7);
        assert_eq!(config.key_size, KeySize::Aes256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_display_summary() {
        let shown = CipherConfig::default().to_string();
        assert_eq!(
            shown,
            "Block size: 128\nCipher mode: CBC\nPadding mode: PKCS7\nKey size: 256"
        );
    }

    #[test]
    fn test_unsupported_block_size() {
        let config = CipherConfig {
            block_size_bits: 256,
            ..CipherConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CipherError::UnsupportedConfig(_))
        ));
    }

    #[test]
    fn test_parse_partial_json() {
        let config: CipherConfig = serde_json::from_str(r#"{ "key_size": "aes128" }"#).unwrap();
        assert_eq!(config, CipherConfig::default().with_key_size(KeySize::Aes128));
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let result = serde_json::from_str::<CipherConfig>(r#"{ "mode": "ecb" }"#);
        assert!(result.is_err());
    }
}
