//! Address types for ENSM.
//!
//! - [`EthAddress`]: A 20-byte Ethereum account address
//! - [`ConnectionInfo`]: The provider URL and signing key handed to the name-service client

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use super::PrivateKey;
use crate::constants::ETH_ADDRESS_SIZE;
use crate::error::{EnsmError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A standard 20-byte Ethereum address.
///
/// Displayed and serialized with the EIP-55 mixed-case checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthAddress {
    bytes: [u8; ETH_ADDRESS_SIZE],
}

impl EthAddress {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ETH_ADDRESS_SIZE {
            return Err(EnsmError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ETH_ADDRESS_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; ETH_ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the EIP-55 checksummed hex string.
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.bytes);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Parses from hex string (with or without 0x prefix).
    ///
    /// All-lowercase and all-uppercase input is accepted as is; mixed-case
    /// input must carry a valid EIP-55 checksum.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| EnsmError::InvalidAddress(format!("not valid hex: {}", e)))?;
        let address = Self::from_bytes(&bytes)?;

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum_string()[2..] != *digits {
            return Err(EnsmError::InvalidAddress("EIP-55 checksum mismatch".into()));
        }

        Ok(address)
    }
}

impl std::fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EthAddress({})", self.to_checksum_string())
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_checksum_string())
    }
}

impl Serialize for EthAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_checksum_string())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONNECTION INFO
// ═══════════════════════════════════════════════════════════════════════════════

/// Active provider and account, resolved for the name-service client.
#[derive(Clone)]
pub struct ConnectionInfo {
    /// Name of the active provider
    pub provider_name: String,
    /// Effective RPC URL (may embed an API key)
    pub provider_url: String,
    /// Name of the active account
    pub account_name: String,
    /// Signing key of the active account
    pub private_key: PrivateKey,
    /// Address derived from `private_key`
    pub address: EthAddress,
}

impl std::fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // URL may carry an API key
        f.debug_struct("ConnectionInfo")
            .field("provider_name", &self.provider_name)
            .field("provider_url", &"[REDACTED]")
            .field("account_name", &self.account_name)
            .field("private_key", &self.private_key)
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")]
    #[test_case("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359")]
    #[test_case("0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB")]
    #[test_case("0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb")]
    fn test_eip55_vectors(checksummed: &str) {
        let address = EthAddress::from_hex(&checksummed.to_lowercase()).unwrap();
        assert_eq!(address.to_checksum_string(), checksummed);
        assert!(EthAddress::from_hex(checksummed).is_ok());
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        // Flip the case of one letter in a valid checksum
        let result = EthAddress::from_hex("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(matches!(result, Err(EnsmError::InvalidAddress(_))));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(EthAddress::from_hex("0x1234").is_err());
        assert!(EthAddress::from_bytes(&[0u8; 19]).is_err());
    }

    #[test]
    fn test_all_zero_bytes_display() {
        let address = EthAddress::from_bytes(&[0u8; 20]).unwrap();
        assert_eq!(address.to_string(), "0x0000000000000000000000000000000000000000");
    }

    #[test]
    fn test_serde_checksummed() {
        let address = EthAddress::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed\"");
        let back: EthAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(address, back);
    }

    #[test]
    fn test_connection_info_debug_redacted() {
        let info = ConnectionInfo {
            provider_name: "infura1".into(),
            provider_url: "https://mainnet.infura.io/v3/secret-key".into(),
            account_name: "main".into(),
            private_key: PrivateKey::from_array([7u8; 32]),
            address: EthAddress::from_bytes(&[0u8; 20]).unwrap(),
        };
        let debug = format!("{:?}", info);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("infura1"));
    }
}
