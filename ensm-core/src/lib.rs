//! # ENSM Core
//!
//! Core types, errors, and traits for the ENSM encrypted configuration store.
//!
//! This crate provides the foundational building blocks used by all other ENSM crates:
//!
//! - **Types**: Providers, private keys, Ethereum addresses, tracked ENS names
//! - **Errors**: The error taxonomy surfaced to the CLI, with next-step hints
//! - **Constants**: File format, key sizes and KDF defaults
//! - **Traits**: The storage backend seam used by the config manager
//!
//! ## Example
//!
//! ```rust
//! use ensm_core::{ProviderEndpoint, ProviderKind};
//!
//! let endpoint = ProviderEndpoint::new(ProviderKind::Infura, "abc123").unwrap();
//! assert_eq!(endpoint.url(), "https://mainnet.infura.io/v3/abc123");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{EnsmError, EntryKind, Result};
pub use traits::*;
pub use types::*;
