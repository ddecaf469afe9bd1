//! In-memory configuration backend.
//!
//! Holds the encrypted envelope in process memory. Used by tests and by
//! callers that manage persistence themselves.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use ensm_core::error::{EnsmError, Result};
use ensm_core::traits::ConfigBackend;

/// In-memory configuration backend.
///
/// Clones share the same storage, so a test can keep a handle to inspect or
/// corrupt the bytes after handing the backend to a manager.
///
/// # Failure Injection
///
/// [`MemoryBackend::fail_writes`] makes every following write fail with
/// [`EnsmError::Persistence`], leaving the stored bytes untouched.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    bytes: RwLock<Option<Vec<u8>>>,
    fail_writes: AtomicBool,
    writes: AtomicU64,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that already holds `bytes`.
    pub fn with_contents(bytes: Vec<u8>) -> Self {
        let backend = Self::new();
        *backend.inner.bytes.write() = Some(bytes);
        backend
    }

    /// Enables or disables write failures.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the stored bytes.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.inner.bytes.read().clone()
    }

    /// Overwrites the stored bytes directly, bypassing failure injection.
    pub fn replace_contents(&self, bytes: Vec<u8>) {
        *self.inner.bytes.write() = Some(bytes);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("len", &self.inner.bytes.read().as_ref().map(Vec::len))
            .field("writes", &self.write_count())
            .finish()
    }
}

impl ConfigBackend for MemoryBackend {
    fn exists(&self) -> Result<bool> {
        Ok(self.inner.bytes.read().is_some())
    }

    fn read(&self) -> Result<Vec<u8>> {
        self.inner.bytes.read().clone().ok_or_else(|| {
            EnsmError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no configuration stored",
            ))
        })
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            warn!("Simulated write failure");
            return Err(EnsmError::Persistence("simulated write failure".into()));
        }

        *self.inner.bytes.write() = Some(bytes.to_vec());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        debug!(len = bytes.len(), "Stored configuration in memory");
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}
