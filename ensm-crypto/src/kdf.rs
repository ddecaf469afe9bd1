//! Password-based key derivation.
//!
//! Keys are derived with Argon2id, so every password guess costs the
//! configured amount of memory and time.
//!
//! ```text
//! password (UTF-8) + salt (16 bytes, per installation)
//!     ↓ Argon2id (m_cost KiB, t_cost passes, p_cost lanes)
//! key (32 bytes, zeroized on drop)
//! ```

use argon2::{Algorithm, Argon2, Params, Version};
use tracing::debug;
use zeroize::Zeroizing;

use ensm_core::constants::{
    CIPHER_KEY_SIZE, DEFAULT_KDF_ITERATIONS, DEFAULT_KDF_MEMORY_KIB, DEFAULT_KDF_PARALLELISM,
    MAX_KDF_ITERATIONS, MAX_KDF_MEMORY_KIB, MAX_KDF_PARALLELISM,
};
use ensm_core::error::{EnsmError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Argon2id cost parameters.
///
/// Stored in the config file header so that a file is always unlocked with the
/// parameters it was created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl KdfParams {
    /// Creates validated parameters.
    ///
    /// # Errors
    /// Returns [`EnsmError::KeyDerivation`] if Argon2 rejects the combination
    /// (for example less than 8 KiB of memory per lane) or a cost exceeds the
    /// `MAX_KDF_*` limits.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        if memory_kib > MAX_KDF_MEMORY_KIB
            || iterations > MAX_KDF_ITERATIONS
            || parallelism > MAX_KDF_PARALLELISM
        {
            return Err(EnsmError::KeyDerivation(format!(
                "cost m={} KiB, t={}, p={} exceeds the limit of m={} KiB, t={}, p={}",
                memory_kib,
                iterations,
                parallelism,
                MAX_KDF_MEMORY_KIB,
                MAX_KDF_ITERATIONS,
                MAX_KDF_PARALLELISM
            )));
        }
        Params::new(memory_kib, iterations, parallelism, Some(CIPHER_KEY_SIZE))
            .map_err(|e| EnsmError::KeyDerivation(e.to_string()))?;
        Ok(Self {
            memory_kib,
            iterations,
            parallelism,
        })
    }

    /// Memory cost in KiB.
    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    /// Number of passes.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Number of lanes.
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(CIPHER_KEY_SIZE),
        )
        .map_err(|e| EnsmError::KeyDerivation(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_KDF_MEMORY_KIB,
            iterations: DEFAULT_KDF_ITERATIONS,
            parallelism: DEFAULT_KDF_PARALLELISM,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DERIVED KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Symmetric key derived from the user's password.
///
/// Held only in memory for the lifetime of the process and zeroized on drop.
pub struct CipherKey {
    bytes: Zeroizing<[u8; CIPHER_KEY_SIZE]>,
}

impl CipherKey {
    /// Wraps raw key bytes.
    pub fn from_array(bytes: [u8; CIPHER_KEY_SIZE]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Returns the raw key bytes.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8; CIPHER_KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CipherKey([REDACTED])")
    }
}

/// Derives a key from `password` and `salt` with Argon2id.
pub fn derive_key(password: &str, salt: &[u8], params: &KdfParams) -> Result<CipherKey> {
    debug!(
        memory_kib = params.memory_kib,
        iterations = params.iterations,
        parallelism = params.parallelism,
        "Deriving key"
    );

    let mut key = Zeroizing::new([0u8; CIPHER_KEY_SIZE]);
    params
        .argon2()?
        .hash_password_into(password.as_bytes(), salt, &mut *key)
        .map_err(|e| EnsmError::KeyDerivation(e.to_string()))?;

    Ok(CipherKey { bytes: key })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> KdfParams {
        KdfParams::new(256, 1, 1).unwrap()
    }

    #[test]
    fn test_default_params_valid() {
        let params = KdfParams::default();
        assert!(KdfParams::new(params.memory_kib(), params.iterations(), params.parallelism()).is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        // Below the 8 KiB-per-lane minimum
        assert!(matches!(
            KdfParams::new(8, 1, 4),
            Err(EnsmError::KeyDerivation(_))
        ));
        assert!(KdfParams::new(256, 0, 1).is_err());
    }

    #[test]
    fn test_excessive_costs_rejected() {
        assert!(KdfParams::new(MAX_KDF_MEMORY_KIB, MAX_KDF_ITERATIONS, MAX_KDF_PARALLELISM).is_ok());
        assert!(KdfParams::new(MAX_KDF_MEMORY_KIB + 1, 1, 1).is_err());
        assert!(KdfParams::new(256, MAX_KDF_ITERATIONS + 1, 1).is_err());
        assert!(KdfParams::new(1024, 1, MAX_KDF_PARALLELISM + 1).is_err());
        assert!(matches!(
            KdfParams::new(u32::MAX, u32::MAX, u32::MAX),
            Err(EnsmError::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_derive_deterministic() {
        let salt = [7u8; 16];
        let a = derive_key("pw1", &salt, &cheap()).unwrap();
        let b = derive_key("pw1", &salt, &cheap()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_password_and_salt_matter() {
        let salt = [7u8; 16];
        let base = derive_key("pw1", &salt, &cheap()).unwrap();
        let other_pw = derive_key("pw2", &salt, &cheap()).unwrap();
        let other_salt = derive_key("pw1", &[8u8; 16], &cheap()).unwrap();
        assert_ne!(base.as_bytes(), other_pw.as_bytes());
        assert_ne!(base.as_bytes(), other_salt.as_bytes());
    }

    #[test]
    fn test_params_matter() {
        let salt = [7u8; 16];
        let a = derive_key("pw1", &salt, &cheap()).unwrap();
        let b = derive_key("pw1", &salt, &KdfParams::new(256, 2, 1).unwrap()).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_short_salt_rejected() {
        // Argon2 requires at least 8 bytes of salt
        assert!(derive_key("pw1", &[1u8; 4], &cheap()).is_err());
    }

    #[test]
    fn test_key_debug_redacted() {
        let key = CipherKey::from_array([0xAB; 32]);
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.to_lowercase().contains("ab"));
    }
}
