//! Encrypted config file envelope.
//!
//! # File Format
//!
//! ```text
//! magic (4 bytes): "ENSM"
//! version (1 byte): 1
//! m_cost (4 bytes LE): Argon2id memory in KiB
//! t_cost (4 bytes LE): Argon2id passes
//! p_cost (4 bytes LE): Argon2id lanes
//! salt (16 bytes)
//! nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! Everything before the nonce is public. The header is not authenticated;
//! altering it changes the derived key and the tag check then fails.

use ensm_core::constants::{
    CIPHER_NONCE_SIZE, CIPHER_TAG_SIZE, CONFIG_FILE_MAGIC, CONFIG_FILE_VERSION,
    CONFIG_HEADER_SIZE, KDF_SALT_SIZE,
};
use ensm_core::error::{EnsmError, Result};
use ensm_crypto::{KdfParams, SecretCipher};

/// Parsed config file: key derivation header plus sealed store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigFile {
    /// KDF parameters and salt
    pub cipher: SecretCipher,
    /// `nonce || ciphertext || tag`
    pub sealed: Vec<u8>,
}

impl ConfigFile {
    /// Encodes the envelope.
    pub fn encode(&self) -> Vec<u8> {
        let params = self.cipher.params();
        let mut out = Vec::with_capacity(CONFIG_HEADER_SIZE + self.sealed.len());
        out.extend_from_slice(CONFIG_FILE_MAGIC);
        out.push(CONFIG_FILE_VERSION);
        out.extend_from_slice(&params.memory_kib().to_le_bytes());
        out.extend_from_slice(&params.iterations().to_le_bytes());
        out.extend_from_slice(&params.parallelism().to_le_bytes());
        out.extend_from_slice(self.cipher.salt());
        out.extend_from_slice(&self.sealed);
        out
    }

    /// Decodes an envelope.
    ///
    /// # Errors
    /// [`EnsmError::CorruptData`] for a short file, wrong magic, or KDF
    /// parameters that are unusable or above the `MAX_KDF_*` limits;
    /// [`EnsmError::VersionMismatch`] for an unknown version.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < CONFIG_HEADER_SIZE + CIPHER_NONCE_SIZE + CIPHER_TAG_SIZE {
            return Err(EnsmError::CorruptData("config file too short".into()));
        }
        if &bytes[0..4] != CONFIG_FILE_MAGIC {
            return Err(EnsmError::CorruptData("not an ENSM config file".into()));
        }

        let version = bytes[4];
        if version != CONFIG_FILE_VERSION {
            return Err(EnsmError::VersionMismatch {
                expected: CONFIG_FILE_VERSION,
                actual: version,
            });
        }

        let params = KdfParams::new(read_u32(bytes, 5), read_u32(bytes, 9), read_u32(bytes, 13))
            .map_err(|e| EnsmError::CorruptData(format!("bad KDF parameters: {}", e)))?;

        let mut salt = [0u8; KDF_SALT_SIZE];
        salt.copy_from_slice(&bytes[17..17 + KDF_SALT_SIZE]);

        Ok(Self {
            cipher: SecretCipher::new(params, salt),
            sealed: bytes[CONFIG_HEADER_SIZE..].to_vec(),
        })
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigFile {
        ConfigFile {
            cipher: SecretCipher::new(KdfParams::new(256, 2, 1).unwrap(), [9u8; KDF_SALT_SIZE]),
            sealed: vec![0xAA; CIPHER_NONCE_SIZE + CIPHER_TAG_SIZE + 5],
        }
    }

    #[test]
    fn test_layout() {
        let encoded = sample().encode();
        assert_eq!(&encoded[0..4], b"ENSM");
        assert_eq!(encoded[4], CONFIG_FILE_VERSION);
        assert_eq!(&encoded[5..9], &256u32.to_le_bytes());
        assert_eq!(&encoded[9..13], &2u32.to_le_bytes());
        assert_eq!(&encoded[13..17], &1u32.to_le_bytes());
        assert_eq!(&encoded[17..33], &[9u8; 16]);
        assert_eq!(encoded.len(), CONFIG_HEADER_SIZE + sample().sealed.len());
    }

    #[test]
    fn test_decode_encoded() {
        let file = sample();
        assert_eq!(ConfigFile::decode(&file.encode()).unwrap(), file);
    }

    #[test]
    fn test_bad_magic() {
        let mut encoded = sample().encode();
        encoded[0] = b'X';
        assert!(matches!(
            ConfigFile::decode(&encoded),
            Err(EnsmError::CorruptData(_))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let mut encoded = sample().encode();
        encoded[4] = 9;
        assert!(matches!(
            ConfigFile::decode(&encoded),
            Err(EnsmError::VersionMismatch { expected: 1, actual: 9 })
        ));
    }

    #[test]
    fn test_too_short() {
        let encoded = sample().encode();
        let cut = CONFIG_HEADER_SIZE + CIPHER_NONCE_SIZE + CIPHER_TAG_SIZE - 1;
        assert!(ConfigFile::decode(&encoded[..cut]).is_err());
        assert!(ConfigFile::decode(b"").is_err());
    }

    #[test]
    fn test_oversized_costs_rejected() {
        for offset in [5usize, 9, 13] {
            let mut encoded = sample().encode();
            encoded[offset..offset + 4].copy_from_slice(&u32::MAX.to_le_bytes());
            assert!(
                matches!(ConfigFile::decode(&encoded), Err(EnsmError::CorruptData(_))),
                "cost at offset {} was accepted",
                offset
            );
        }
    }

    #[test]
    fn test_unusable_params_rejected() {
        let mut encoded = sample().encode();
        // Zero passes
        encoded[9..13].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            ConfigFile::decode(&encoded),
            Err(EnsmError::CorruptData(_))
        ));
    }
}
