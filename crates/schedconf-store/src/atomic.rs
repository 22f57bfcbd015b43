//! Lock-scoped mutation of a configuration file.

use crate::error::StoreError;
use crate::model::Configuration;
use crate::persist::read_config_unchecked;
use crate::store::{ConfigStore, SaveOutcome};
use chrono::Utc;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn config_lock_path(config_path: &Path) -> PathBuf {
    let mut path: OsString = config_path.as_os_str().to_os_string();
    path.push(".lock");
    PathBuf::from(path)
}

#[derive(Debug, thiserror::Error)]
pub enum AtomicMutationError {
    #[error("configuration lock busy: {lock_path}")]
    LockBusy { lock_path: String },

    #[error("failed to acquire configuration lock {lock_path}: {message}")]
    LockIo { lock_path: String, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AtomicMutationError {
    fn lock_busy(lock_path: &Path) -> Self {
        Self::LockBusy {
            lock_path: lock_path.display().to_string(),
        }
    }

    fn lock_io(lock_path: &Path, message: impl Into<String>) -> Self {
        Self::LockIo {
            lock_path: lock_path.display().to_string(),
            message: message.into(),
        }
    }
}

/// Load `path`, run one staged edit, save and reload, all while holding the
/// configuration lock.
///
/// The file is read without running the oracle, so an edit can repair a
/// malformed document; the staged result still has to validate before it
/// commits or reaches disk.
///
/// Returns the edit's value, the save outcome, and the configuration as it
/// stands in memory afterwards.
pub fn mutate_config_file<T, F>(
    path: impl AsRef<Path>,
    edit: F,
) -> Result<(T, SaveOutcome, Configuration), AtomicMutationError>
where
    F: FnOnce(&mut Configuration) -> Result<T, StoreError>,
{
    let path = path.as_ref();
    let _guard = ConfigFileLockGuard::acquire(path)?;

    let current = read_config_unchecked(path).map_err(StoreError::from)?;
    let mut store = ConfigStore::new(current);
    let (value, outcome) = store.apply(path, edit)?;
    Ok((value, outcome, store.into_config()))
}

struct ConfigFileLockGuard {
    lock_path: PathBuf,
    _file: File,
}

impl ConfigFileLockGuard {
    fn acquire(path: &Path) -> Result<Self, AtomicMutationError> {
        let lock_path = config_lock_path(path);
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| AtomicMutationError::lock_io(&lock_path, e.to_string()))?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                let owner = format!(
                    "pid={}\nutc={}\n",
                    std::process::id(),
                    Utc::now().to_rfc3339()
                );
                if let Err(err) = file.write_all(owner.as_bytes()) {
                    tracing::warn!(
                        lock = %lock_path.display(),
                        error = %err,
                        "lock acquired but owner record could not be written"
                    );
                }
                Ok(Self {
                    lock_path,
                    _file: file,
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(AtomicMutationError::lock_busy(&lock_path))
            }
            Err(err) => Err(AtomicMutationError::lock_io(&lock_path, err.to_string())),
        }
    }
}

impl Drop for ConfigFileLockGuard {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.lock_path) {
            tracing::warn!(
                lock = %self.lock_path.display(),
                error = %err,
                "failed to release configuration lock"
            );
        }
    }
}
