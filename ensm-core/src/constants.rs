//! Constants for ENSM.
//!
//! Key sizes, the on-disk envelope layout, and default KDF costs live here so
//! that the crypto and config crates agree on them.

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of Ethereum address in bytes (20 bytes = 160 bits).
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of Ethereum private key in bytes (32 bytes = 256 bits).
pub const ETH_PRIVATE_KEY_SIZE: usize = 32;

/// Size of keccak256 hash output.
pub const KECCAK256_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// CIPHER SIZES (AES-256-GCM)
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of the symmetric key derived from the password.
pub const CIPHER_KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce prepended to every ciphertext.
pub const CIPHER_NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag appended to every ciphertext.
pub const CIPHER_TAG_SIZE: usize = 16;

/// Size of the per-installation KDF salt.
pub const KDF_SALT_SIZE: usize = 16;

// ═══════════════════════════════════════════════════════════════════════════════
// KDF DEFAULTS (Argon2id)
// ═══════════════════════════════════════════════════════════════════════════════

/// Default Argon2id memory cost in KiB (64 MiB).
pub const DEFAULT_KDF_MEMORY_KIB: u32 = 65_536;

/// Default Argon2id iteration count.
pub const DEFAULT_KDF_ITERATIONS: u32 = 3;

/// Default Argon2id parallelism.
pub const DEFAULT_KDF_PARALLELISM: u32 = 4;

/// Largest accepted Argon2id memory cost in KiB (1 GiB).
pub const MAX_KDF_MEMORY_KIB: u32 = 1_048_576;

/// Largest accepted Argon2id iteration count.
pub const MAX_KDF_ITERATIONS: u32 = 16;

/// Largest accepted Argon2id parallelism.
pub const MAX_KDF_PARALLELISM: u32 = 16;

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTED FILE
// ═══════════════════════════════════════════════════════════════════════════════

/// Directory under the user's home that holds the configuration.
pub const CONFIG_DIR_NAME: &str = ".ens_manager";

/// File name of the encrypted configuration.
pub const CONFIG_FILE_NAME: &str = "config.enc";

/// Magic bytes at the start of the encrypted configuration file.
pub const CONFIG_FILE_MAGIC: &[u8; 4] = b"ENSM";

/// Current envelope format version.
/// Increment when the header layout changes.
pub const CONFIG_FILE_VERSION: u8 = 1;

/// Size of the envelope header:
/// magic (4) + version (1) + m_cost (4) + t_cost (4) + p_cost (4) + salt (16).
pub const CONFIG_HEADER_SIZE: usize = 4 + 1 + 4 + 4 + 4 + KDF_SALT_SIZE;

/// Version of the serialized store record inside the ciphertext.
pub const STORE_RECORD_VERSION: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// ENS NAMES & NOTIFICATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Top-level domains accepted for tracked names.
pub const ENS_ALLOWED_TLDS: &[&str] = &["eth", "xyz", "test"];

/// Days before expiry at which a tracked name is reported as expiring.
pub const DEFAULT_EXPIRY_THRESHOLD_DAYS: u32 = 30;

/// Largest accepted expiry threshold.
pub const MAX_EXPIRY_THRESHOLD_DAYS: u32 = 365;
