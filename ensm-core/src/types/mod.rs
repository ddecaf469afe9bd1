//! Domain types for ENSM.
//!
//! - [`PrivateKey`]: secp256k1 account key (zeroized on drop)
//! - [`EthAddress`]: 20-byte account address with EIP-55 display
//! - [`ProviderKind`], [`ProviderEndpoint`], [`Provider`]: RPC endpoint configuration
//! - [`Network`]: named chain endpoint with its chain ID
//! - [`TrackedName`], [`NotificationSettings`]: ENS expiry tracking
//! - [`ConnectionInfo`]: what the name-service client needs from the store

mod keys;
mod address;
mod provider;
mod names;
mod network;

pub use keys::*;
pub use address::*;
pub use provider::*;
pub use names::*;
pub use network::*;
