//! Hashing utilities.
//!
//! Only Keccak256 is needed: Ethereum addresses are the last 20 bytes of the
//! Keccak256 hash of the uncompressed public key.

use sha3::{Digest, Keccak256};

/// Computes Keccak256 hash (used for Ethereum addresses).
///
/// Note: Keccak256 is NOT SHA3-256. They use different padding.
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().into()
}
