//! Account address derivation.
//!
//! ## Derivation Flow
//!
//! ```text
//! private_key (32 bytes, 0 < k < n)
//!       ↓ secp256k1
//! public_key (uncompressed, 0x04 || X || Y)
//!       ↓
//! keccak256(X || Y)[12..32] → address
//! ```

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;

use ensm_core::constants::{ETH_ADDRESS_SIZE, KECCAK256_SIZE};
use ensm_core::error::{EnsmError, Result};
use ensm_core::types::{EthAddress, PrivateKey};

use crate::hash::keccak256;

/// Derives the Ethereum address controlled by `private_key`.
///
/// # Errors
///
/// Returns [`EnsmError::InvalidKey`] if the key is zero or not below the
/// secp256k1 group order.
pub fn derive_address(private_key: &PrivateKey) -> Result<EthAddress> {
    let secret = SecretKey::from_slice(private_key.as_bytes())
        .map_err(|_| EnsmError::InvalidKey("not a valid secp256k1 private key".into()))?;

    let point = secret.public_key().to_encoded_point(false);
    // Skip the 0x04 uncompressed marker
    let hash = keccak256(&point.as_bytes()[1..]);

    EthAddress::from_bytes(&hash[KECCAK256_SIZE - ETH_ADDRESS_SIZE..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex: &str) -> PrivateKey {
        PrivateKey::from_hex(hex).unwrap()
    }

    #[test]
    fn test_known_vector_one() {
        let address = derive_address(&key(
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        ))
        .unwrap();
        assert_eq!(
            address.to_checksum_string(),
            "0x7E5F4552091A69125d5DfCb7B8C2659029395Bdf"
        );
    }

    #[test]
    fn test_known_vector_web3_docs() {
        let address = derive_address(&key(
            "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
        ))
        .unwrap();
        assert_eq!(
            address.to_checksum_string(),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
        );
    }

    #[test]
    fn test_zero_key_rejected() {
        let result = derive_address(&PrivateKey::from_array([0u8; 32]));
        assert!(matches!(result, Err(EnsmError::InvalidKey(_))));
    }

    #[test]
    fn test_key_above_group_order_rejected() {
        let result = derive_address(&PrivateKey::from_array([0xffu8; 32]));
        assert!(matches!(result, Err(EnsmError::InvalidKey(_))));
    }

    #[test]
    fn test_derivation_deterministic() {
        let k = PrivateKey::from_array([0x11u8; 32]);
        assert_eq!(derive_address(&k).unwrap(), derive_address(&k).unwrap());
        assert_ne!(
            derive_address(&k).unwrap(),
            derive_address(&PrivateKey::from_array([0x12u8; 32])).unwrap()
        );
    }
}
