//! # ENSM Config
//!
//! Encrypted, password-protected storage of RPC providers, signing accounts,
//! chain networks and ENS name tracking for the ENSM command-line tool.
//!
//! This crate provides:
//!
//! - **ConfigStore**: the in-memory model and its JSON record
//! - **ConfigManager**: bootstrap/unlock lifecycle and persist-after-every-change
//! - **Backends**: [`FileBackend`] for `~/.ens_manager/config.enc`, [`MemoryBackend`] for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use ensm_config::{ConfigManager, FileBackend, ManagerState};
//! use ensm_core::types::ProviderKind;
//!
//! let manager = ConfigManager::new(FileBackend::open_default()?);
//! if manager.initialize()? == ManagerState::Bootstrapping {
//!     manager.bootstrap("pw1")?;
//! } else {
//!     manager.unlock("pw1")?;
//! }
//!
//! manager.add_provider("infura1", ProviderKind::Infura, "abc123")?;
//! manager.set_active_provider("infura1")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod account;
mod envelope;
mod file;
mod manager;
mod memory;
mod store;

pub use account::Account;
pub use envelope::ConfigFile;
pub use file::{default_config_dir, FileBackend};
pub use manager::{ConfigManager, ConfigSummary, ManagerState};
pub use memory::MemoryBackend;
pub use store::ConfigStore;

// Re-export the trait from core
pub use ensm_core::traits::ConfigBackend;
