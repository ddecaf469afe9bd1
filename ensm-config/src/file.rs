//! File-based configuration backend.
//!
//! Stores the encrypted envelope in a single owner-only file, by default
//! `~/.ens_manager/config.enc`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use ensm_core::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use ensm_core::error::{EnsmError, Result};
use ensm_core::traits::ConfigBackend;

/// File-based configuration backend.
///
/// Writes go to a sibling temp file which is synced and then renamed over
/// the target, so a crash leaves either the old or the new file.
#[derive(Clone, Debug)]
pub struct FileBackend {
    /// Path to the config file
    path: PathBuf,
}

impl FileBackend {
    /// Opens the backend for `dir/config.enc`, creating `dir` if needed.
    ///
    /// # Errors
    /// [`EnsmError::ConfigDirUnavailable`] if the directory cannot be created.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        ensure_private_dir(dir)?;
        Ok(Self {
            path: dir.join(CONFIG_FILE_NAME),
        })
    }

    /// Opens the backend at the default per-user location.
    pub fn open_default() -> Result<Self> {
        Self::open_dir(default_config_dir()?)
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

/// Returns `~/.ens_manager`.
pub fn default_config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or_else(|| EnsmError::ConfigDirUnavailable {
            path: format!("~/{}", CONFIG_DIR_NAME),
            reason: "home directory could not be determined".into(),
        })
}

/// Creates `dir` owner-only, or tightens an existing one to owner-only.
fn ensure_private_dir(dir: &Path) -> Result<()> {
    let unavailable = |e: std::io::Error| EnsmError::ConfigDirUnavailable {
        path: dir.display().to_string(),
        reason: e.to_string(),
    };

    if !dir.exists() {
        info!(path = %dir.display(), "Creating configuration directory");
        fs::create_dir_all(dir).map_err(unavailable)?;
    } else if !dir.is_dir() {
        return Err(EnsmError::ConfigDirUnavailable {
            path: dir.display().to_string(),
            reason: "not a directory".into(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(dir).map_err(unavailable)?.permissions().mode() & 0o777;
        if mode != 0o700 {
            info!(
                path = %dir.display(),
                mode = %format!("{:o}", mode),
                "Restricting configuration directory to owner"
            );
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700)).map_err(unavailable)?;
        }
    }

    Ok(())
}

/// Flushes the directory entry of `path` so a completed rename survives a crash.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn open_private_file(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

impl ConfigBackend for FileBackend {
    fn exists(&self) -> Result<bool> {
        Ok(self.path.try_exists()?)
    }

    fn read(&self) -> Result<Vec<u8>> {
        let bytes = fs::read(&self.path).map_err(|e| {
            EnsmError::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", self.path.display(), e),
            ))
        })?;
        debug!(len = bytes.len(), "Read config file");
        Ok(bytes)
    }

    #[instrument(skip(self, bytes), fields(path = %self.path.display(), len = bytes.len()))]
    fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        let temp_path = self.temp_path();

        let written = (|| -> std::io::Result<()> {
            let mut file = open_private_file(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        })();

        if let Err(e) = written {
            if fs::remove_file(&temp_path).is_err() {
                debug!("No temp file to clean up");
            }
            warn!(error = %e, "Config write failed");
            return Err(EnsmError::Persistence(format!(
                "{}: {}",
                self.path.display(),
                e
            )));
        }

        // The rename is the commit point; the new file is in place either way
        if let Err(e) = sync_parent_dir(&self.path) {
            warn!(error = %e, "Failed to sync configuration directory");
        }

        debug!("Config file saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_dir() {
        let root = tempdir().unwrap();
        let dir = root.path().join("nested").join(".ens_manager");

        let backend = FileBackend::open_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(backend.path(), dir.join("config.enc"));
        assert!(!backend.exists().unwrap()); // File not created until first write
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open_dir(dir.path()).unwrap();

        backend.write_atomic(b"first").unwrap();
        backend.write_atomic(b"second").unwrap();

        assert!(backend.exists().unwrap());
        assert_eq!(backend.read().unwrap(), b"second");
        assert!(!dir.path().join("config.tmp").exists());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open_dir(dir.path()).unwrap();
        assert!(matches!(backend.read(), Err(EnsmError::IoError(_))));
    }

    #[test]
    fn test_dir_path_is_a_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("occupied");
        fs::write(&file_path, b"x").unwrap();

        assert!(matches!(
            FileBackend::open_dir(&file_path),
            Err(EnsmError::ConfigDirUnavailable { .. })
        ));
    }

    #[test]
    fn test_failed_write_keeps_old_file() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open_dir(dir.path()).unwrap();
        backend.write_atomic(b"original").unwrap();

        // A directory in the temp file's place makes the write fail
        fs::create_dir(dir.path().join("config.tmp")).unwrap();

        assert!(matches!(
            backend.write_atomic(b"replacement"),
            Err(EnsmError::Persistence(_))
        ));
        assert_eq!(backend.read().unwrap(), b"original");
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempdir().unwrap();
        let dir = root.path().join(".ens_manager");
        let backend = FileBackend::open_dir(&dir).unwrap();
        backend.write_atomic(b"secret").unwrap();

        let dir_mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        let file_mode = fs::metadata(backend.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
        assert_eq!(file_mode, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_dir_restricted_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempdir().unwrap();
        let dir = root.path().join(".ens_manager");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        let backend = FileBackend::open_dir(&dir).unwrap();
        let dir_mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);

        backend.write_atomic(b"secret").unwrap();
        assert_eq!(backend.read().unwrap(), b"secret");
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_parent_dir() {
        let dir = tempdir().unwrap();
        sync_parent_dir(&dir.path().join("config.enc")).unwrap();
        assert!(sync_parent_dir(Path::new("config.enc")).is_ok());
    }
}
