//! Authenticated encryption of the configuration payload.
//!
//! ## Layout
//!
//! ```text
//! nonce (12 bytes, random per call) || AES-256-GCM ciphertext || tag (16 bytes)
//! ```
//!
//! Any failure to authenticate (wrong key, truncation, a flipped bit) is
//! reported as [`EnsmError::Integrity`] without further detail.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroizing;

use ensm_core::constants::{CIPHER_NONCE_SIZE, CIPHER_TAG_SIZE, KDF_SALT_SIZE};
use ensm_core::error::{EnsmError, Result};

use crate::kdf::{derive_key, CipherKey, KdfParams};

/// Password-keyed cipher for one installation.
///
/// Holds the per-installation salt and the KDF cost parameters; neither is
/// secret, both are stored alongside the ciphertext.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretCipher {
    params: KdfParams,
    salt: [u8; KDF_SALT_SIZE],
}

impl SecretCipher {
    /// Creates a cipher from stored parameters and salt.
    pub fn new(params: KdfParams, salt: [u8; KDF_SALT_SIZE]) -> Self {
        Self { params, salt }
    }

    /// Creates a cipher with a fresh random salt.
    pub fn generate(params: KdfParams) -> Self {
        let mut salt = [0u8; KDF_SALT_SIZE];
        OsRng.fill_bytes(&mut salt);
        Self { params, salt }
    }

    /// The KDF salt.
    pub fn salt(&self) -> &[u8; KDF_SALT_SIZE] {
        &self.salt
    }

    /// The KDF cost parameters.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Derives the symmetric key for `password`.
    pub fn derive_key(&self, password: &str) -> Result<CipherKey> {
        derive_key(password, &self.salt, &self.params)
    }

    /// Encrypts `plaintext` under `key` with a fresh random nonce.
    pub fn encrypt(key: &CipherKey, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| EnsmError::EncryptionFailed(e.to_string()))?;

        let mut nonce_bytes = [0u8; CIPHER_NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| EnsmError::EncryptionFailed("AES-GCM seal failed".into()))?;

        let mut out = Vec::with_capacity(CIPHER_NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);

        debug!(plaintext_len = plaintext.len(), sealed_len = out.len(), "Encrypted payload");
        Ok(out)
    }

    /// Decrypts and authenticates `sealed`.
    ///
    /// # Errors
    /// Returns [`EnsmError::Integrity`] if the input is shorter than a nonce
    /// plus tag or fails authentication.
    pub fn decrypt(key: &CipherKey, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if sealed.len() < CIPHER_NONCE_SIZE + CIPHER_TAG_SIZE {
            return Err(EnsmError::Integrity);
        }

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| EnsmError::EncryptionFailed(e.to_string()))?;
        let (nonce, ciphertext) = sealed.split_at(CIPHER_NONCE_SIZE);

        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| EnsmError::Integrity)?;

        Ok(Zeroizing::new(plaintext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cheap_cipher() -> SecretCipher {
        SecretCipher::new(KdfParams::new(256, 1, 1).unwrap(), [3u8; KDF_SALT_SIZE])
    }

    #[test]
    fn test_roundtrip() {
        let cipher = cheap_cipher();
        let key = cipher.derive_key("pw1").unwrap();

        let sealed = SecretCipher::encrypt(&key, b"{\"providers\":{}}").unwrap();
        assert_eq!(
            sealed.len(),
            CIPHER_NONCE_SIZE + b"{\"providers\":{}}".len() + CIPHER_TAG_SIZE
        );

        let opened = SecretCipher::decrypt(&key, &sealed).unwrap();
        assert_eq!(&opened[..], b"{\"providers\":{}}");
    }

    #[test]
    fn test_empty_plaintext() {
        let key = cheap_cipher().derive_key("pw1").unwrap();
        let sealed = SecretCipher::encrypt(&key, b"").unwrap();
        assert!(SecretCipher::decrypt(&key, &sealed).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_password() {
        let cipher = cheap_cipher();
        let key = cipher.derive_key("pw1").unwrap();
        let wrong = cipher.derive_key("pw2").unwrap();

        let sealed = SecretCipher::encrypt(&key, b"secret").unwrap();
        assert!(matches!(
            SecretCipher::decrypt(&wrong, &sealed),
            Err(EnsmError::Integrity)
        ));
    }

    #[test]
    fn test_tampered_ciphertext() {
        let key = cheap_cipher().derive_key("pw1").unwrap();
        let sealed = SecretCipher::encrypt(&key, b"secret").unwrap();

        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(SecretCipher::decrypt(&key, &tampered), Err(EnsmError::Integrity)),
                "bit flip at byte {} was not detected",
                i
            );
        }
    }

    #[test]
    fn test_truncated_input() {
        let key = cheap_cipher().derive_key("pw1").unwrap();
        let sealed = SecretCipher::encrypt(&key, b"secret").unwrap();

        assert!(matches!(SecretCipher::decrypt(&key, &[]), Err(EnsmError::Integrity)));
        assert!(matches!(
            SecretCipher::decrypt(&key, &sealed[..CIPHER_NONCE_SIZE + CIPHER_TAG_SIZE - 1]),
            Err(EnsmError::Integrity)
        ));
        assert!(matches!(
            SecretCipher::decrypt(&key, &sealed[..sealed.len() - 1]),
            Err(EnsmError::Integrity)
        ));
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let key = cheap_cipher().derive_key("pw1").unwrap();
        let a = SecretCipher::encrypt(&key, b"same").unwrap();
        let b = SecretCipher::encrypt(&key, b"same").unwrap();

        assert_ne!(a[..CIPHER_NONCE_SIZE], b[..CIPHER_NONCE_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_generated_salts_differ() {
        let params = KdfParams::new(256, 1, 1).unwrap();
        let a = SecretCipher::generate(params);
        let b = SecretCipher::generate(params);
        assert_ne!(a.salt(), b.salt());
        assert_eq!(a.params(), &params);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let key = cheap_cipher().derive_key("pw1").unwrap();
            let sealed = SecretCipher::encrypt(&key, &data).unwrap();
            let opened = SecretCipher::decrypt(&key, &sealed).unwrap();
            prop_assert_eq!(&opened[..], &data[..]);
        }

        #[test]
        fn prop_other_password_fails(password in "[a-z0-9]{1,16}") {
            prop_assume!(password != "pw1");
            let cipher = cheap_cipher();
            let key = cipher.derive_key("pw1").unwrap();
            let other = cipher.derive_key(&password).unwrap();

            let sealed = SecretCipher::encrypt(&key, b"payload").unwrap();
            prop_assert!(matches!(
                SecretCipher::decrypt(&other, &sealed),
                Err(EnsmError::Integrity)
            ));
        }
    }
}
