//! Key types for ENSM.
//!
//! - [`PrivateKey`]: 32-byte secp256k1 account key, zeroized on drop

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::constants::ETH_PRIVATE_KEY_SIZE;
use crate::error::{EnsmError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Ethereum account private key.
///
/// This key is sensitive and will be automatically zeroized when dropped.
/// Never expose this key in logs or error messages.
///
/// Range checks against the secp256k1 group order happen when the address is
/// derived, not here; this type only guarantees the length.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; ETH_PRIVATE_KEY_SIZE],
}

impl PrivateKey {
    /// Creates a private key from raw bytes.
    ///
    /// # Errors
    /// Returns [`EnsmError::InvalidKey`] if the length is not 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ETH_PRIVATE_KEY_SIZE {
            return Err(EnsmError::InvalidKey(format!(
                "expected {} bytes, got {}",
                ETH_PRIVATE_KEY_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; ETH_PRIVATE_KEY_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a private key from a fixed-size array.
    pub fn from_array(bytes: [u8; ETH_PRIVATE_KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Parses a hex string, with or without `0x` prefix.
    ///
    /// Surrounding whitespace is ignored, since keys are usually pasted.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if s.len() != ETH_PRIVATE_KEY_SIZE * 2 {
            return Err(EnsmError::InvalidKey(format!(
                "expected {} hex characters, got {}",
                ETH_PRIVATE_KEY_SIZE * 2,
                s.len()
            )));
        }

        let bytes = Zeroizing::new(
            hex::decode(s).map_err(|e| EnsmError::InvalidKey(format!("not valid hex: {}", e)))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Returns the raw bytes of the key.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8; ETH_PRIVATE_KEY_SIZE] {
        &self.bytes
    }

    /// Returns the `0x`-prefixed hex encoding, zeroized on drop.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.bytes)))
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for PrivateKey {}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key content
        write!(f, "PrivateKey([REDACTED])")
    }
}

impl Serialize for PrivateKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = Zeroizing::new(String::deserialize(deserializer)?);
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const KEY_HEX: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_from_hex_with_and_without_prefix() {
        let a = PrivateKey::from_hex(KEY_HEX).unwrap();
        let b = PrivateKey::from_hex(&format!("0x{}", KEY_HEX)).unwrap();
        let c = PrivateKey::from_hex(&format!("  0X{}\n", KEY_HEX.to_uppercase())).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.as_bytes()[0], 0x4c);
    }

    #[test_case("" ; "empty")]
    #[test_case("0x" ; "prefix only")]
    #[test_case("4c0883a69102937d" ; "too short")]
    #[test_case("zz0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318" ; "not hex")]
    #[test_case("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f36231800" ; "too long")]
    fn test_from_hex_rejects(input: &str) {
        assert!(matches!(
            PrivateKey::from_hex(input),
            Err(EnsmError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_hex_roundtrip() {
        let key = PrivateKey::from_hex(KEY_HEX).unwrap();
        assert_eq!(key.to_hex().as_str(), format!("0x{}", KEY_HEX));
    }

    #[test]
    fn test_debug_redacted() {
        let key = PrivateKey::from_hex(KEY_HEX).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("4c08"));
    }

    #[test]
    fn test_serde_uses_hex() {
        let key = PrivateKey::from_hex(KEY_HEX).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"0x{}\"", KEY_HEX));
        let back: PrivateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn test_serde_rejects_bad_key() {
        let result: std::result::Result<PrivateKey, _> = serde_json::from_str("\"0x1234\"");
        assert!(result.is_err());
    }
}
