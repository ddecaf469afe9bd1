//! Error types for ENSM.
//!
//! This module provides the error hierarchy using `thiserror`.
//! Every variant carries enough context to print, and [`EnsmError::user_hint`]
//! tells the user what to do next.

use std::fmt;

use thiserror::Error;

/// Result type alias using `EnsmError`.
pub type Result<T> = std::result::Result<T, EnsmError>;

/// Kind of named entry held by the configuration store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// An RPC provider.
    Provider,
    /// A signing account.
    Account,
    /// A tracked ENS name.
    TrackedName,
    /// A chain network.
    Network,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Provider => write!(f, "provider"),
            EntryKind::Account => write!(f, "account"),
            EntryKind::TrackedName => write!(f, "tracked name"),
            EntryKind::Network => write!(f, "network"),
        }
    }
}

/// Main error type for all ENSM operations.
#[derive(Debug, Error)]
pub enum EnsmError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CRYPTOGRAPHIC ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Password key derivation failed (bad parameters).
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Ciphertext failed authentication (wrong key, truncation, or tampering).
    #[error("Ciphertext failed integrity check")]
    Integrity,

    /// Encryption could not be performed.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // AUTHENTICATION & LIFECYCLE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Unable to unlock the configuration with the supplied password.
    #[error("Unable to unlock configuration: wrong password or corrupted file")]
    Authentication,

    /// Operation called in the wrong lifecycle state (programming error).
    #[error("Operation '{operation}' is not allowed while the configuration is {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the manager was in
        state: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// An entry with this name already exists.
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName {
        /// Kind of entry
        kind: EntryKind,
        /// Conflicting name
        name: String,
    },

    /// No entry with this name exists.
    #[error("No {kind} named '{name}'")]
    NotFound {
        /// Kind of entry
        kind: EntryKind,
        /// Missing name
        name: String,
    },

    /// Entry name is empty or malformed.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Provider type, API key or URL is malformed.
    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    /// Private key is malformed or outside the secp256k1 range.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Ethereum address is malformed or fails its EIP-55 checksum.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Setting value is out of range or malformed.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// Network chain ID or provider URL is malformed.
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Decrypted bytes are not a valid configuration store.
    #[error("Configuration data is corrupt: {0}")]
    CorruptData(String),

    /// File format version mismatch.
    #[error("Config file version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Supported version
        expected: u8,
        /// Version found on disk
        actual: u8,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Writing the configuration failed; the in-memory change was rolled back.
    #[error("Failed to save configuration: {0}")]
    Persistence(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration directory cannot be created or located.
    #[error("Configuration directory '{path}' is unavailable: {reason}")]
    ConfigDirUnavailable {
        /// Directory path
        path: String,
        /// Underlying cause
        reason: String,
    },
}

impl EnsmError {
    /// Returns a short instruction telling the user what to do next.
    pub fn user_hint(&self) -> &'static str {
        match self {
            EnsmError::Authentication | EnsmError::Integrity => {
                "Check your password and try again."
            }
            EnsmError::DuplicateName { .. } => "Choose a different name, or remove the existing entry first.",
            EnsmError::NotFound { .. } => "List the configured entries to see which names exist.",
            EnsmError::InvalidName(_) => "Use a non-empty name without leading or trailing spaces.",
            EnsmError::InvalidProvider(_) => "Check the API key or URL for this provider type.",
            EnsmError::InvalidKey(_) => "Enter the 32-byte private key as 64 hex characters.",
            EnsmError::InvalidAddress(_) => "Enter the address as 40 hex characters with a 0x prefix.",
            EnsmError::InvalidSetting(_) => "Check the value and try again.",
            EnsmError::InvalidNetwork(_) => "Give an http(s) or ws(s) URL and a non-zero chain ID.",
            EnsmError::Persistence(_) | EnsmError::IoError(_) => {
                "Free disk space or fix the permissions of the configuration directory, then retry."
            }
            EnsmError::CorruptData(_) | EnsmError::VersionMismatch { .. } => {
                "Restore the configuration file from a backup or remove it to start over."
            }
            EnsmError::ConfigDirUnavailable { .. } => {
                "Make sure your home directory is writable, or pass --config-dir."
            }
            EnsmError::InvalidState { .. } => "Unlock the configuration before using this command.",
            EnsmError::KeyDerivation(_) | EnsmError::EncryptionFailed(_) => {
                "This is unexpected; please report it."
            }
        }
    }

    /// Returns true if this error was caused by invalid user input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            EnsmError::InvalidName(_)
                | EnsmError::InvalidProvider(_)
                | EnsmError::InvalidKey(_)
                | EnsmError::InvalidAddress(_)
                | EnsmError::InvalidSetting(_)
                | EnsmError::InvalidNetwork(_)
                | EnsmError::DuplicateName { .. }
                | EnsmError::NotFound { .. }
        )
    }

    /// Shorthand for [`EnsmError::NotFound`].
    pub fn not_found(kind: EntryKind, name: &str) -> Self {
        EnsmError::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    /// Shorthand for [`EnsmError::DuplicateName`].
    pub fn duplicate(kind: EntryKind, name: &str) -> Self {
        EnsmError::DuplicateName {
            kind,
            name: name.to_string(),
        }
    }
}
