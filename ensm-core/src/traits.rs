//! Trait definitions for ENSM.
//!
//! The config manager never touches the filesystem directly; it talks to a
//! [`ConfigBackend`], which lets tests swap in an in-memory store and simulate
//! write failures.

use crate::error::Result;

/// Storage for the encrypted configuration envelope.
///
/// Implementations hold exactly one opaque blob. They never see plaintext.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct NullBackend;
///
/// impl ConfigBackend for NullBackend {
///     fn exists(&self) -> Result<bool> { Ok(false) }
///     fn read(&self) -> Result<Vec<u8>> { Ok(Vec::new()) }
///     fn write_atomic(&self, _bytes: &[u8]) -> Result<()> { Ok(()) }
///     fn location(&self) -> String { "null".into() }
/// }
/// ```
pub trait ConfigBackend: Send + Sync {
    /// Returns true if a persisted envelope is present.
    fn exists(&self) -> Result<bool>;

    /// Reads the whole persisted envelope.
    fn read(&self) -> Result<Vec<u8>>;

    /// Replaces the persisted envelope.
    ///
    /// Either the old or the new contents must survive a crash, never a
    /// partial write.
    fn write_atomic(&self, bytes: &[u8]) -> Result<()>;

    /// Human-readable location, for logs and status output.
    fn location(&self) -> String;
}

impl<B: ConfigBackend + ?Sized> ConfigBackend for Box<B> {
    fn exists(&self) -> Result<bool> {
        (**self).exists()
    }

    fn read(&self) -> Result<Vec<u8>> {
        (**self).read()
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        (**self).write_atomic(bytes)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
