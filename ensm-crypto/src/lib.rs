//! # ENSM Cryptography
//!
//! Cryptographic primitives for the ENSM configuration store.
//!
//! This crate provides:
//!
//! - **KDF**: Argon2id password → 256-bit key derivation
//! - **Cipher**: AES-256-GCM authenticated encryption of opaque payloads
//! - **Hash**: Keccak256
//! - **Address**: secp256k1 private key → Ethereum address
//!
//! ## Security Properties
//!
//! - Derived keys and decrypted plaintext are zeroized on drop
//! - Every ciphertext carries a fresh random nonce
//! - Decryption under the wrong key fails with [`EnsmError::Integrity`](ensm_core::EnsmError::Integrity),
//!   never with garbage output
//!
//! ## Example
//!
//! ```rust,ignore
//! use ensm_crypto::{KdfParams, SecretCipher};
//!
//! let cipher = SecretCipher::generate(KdfParams::default());
//! let key = cipher.derive_key("pw1")?;
//!
//! let sealed = SecretCipher::encrypt(&key, b"config bytes")?;
//! let opened = SecretCipher::decrypt(&key, &sealed)?;
//! assert_eq!(&opened[..], b"config bytes");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod cipher;
pub mod hash;
pub mod kdf;

// Re-export main items at crate root
pub use address::derive_address;
pub use cipher::SecretCipher;
pub use hash::keccak256;
pub use kdf::{CipherKey, KdfParams};
