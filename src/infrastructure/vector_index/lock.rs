//! Advisory lock serializing writers of one index directory

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::domain::DomainError;

/// Exclusive `flock` on a lock file, released on drop.
///
/// Held across processes as well as between handles in one process. On
/// platforms without `flock` the file is only opened.
pub(super) struct DirLock {
    #[cfg(unix)]
    _lock: nix::fcntl::Flock<File>,
    #[cfg(not(unix))]
    _file: File,
}

impl DirLock {
    /// Block until the lock on `path` is held
    pub(super) fn acquire(path: &Path) -> Result<Self, DomainError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|e| {
                DomainError::storage(format!("Failed to open {}: {}", path.display(), e))
            })?;

        Self::lock_file(file, path)
    }

    #[cfg(unix)]
    fn lock_file(file: File, path: &Path) -> Result<Self, DomainError> {
        let lock = nix::fcntl::Flock::lock(file, nix::fcntl::FlockArg::LockExclusive).map_err(
            |(_, errno)| DomainError::storage(format!("Failed to lock {}: {}", path.display(), errno)),
        )?;

        Ok(Self { _lock: lock })
    }

    #[cfg(not(unix))]
    fn lock_file(file: File, _path: &Path) -> Result<Self, DomainError> {
        Ok(Self { _file: file })
    }

    /// [`DirLock::acquire`] on the blocking pool
    pub(super) async fn acquire_async(path: PathBuf) -> Result<Self, DomainError> {
        tokio::task::spawn_blocking(move || Self::acquire(&path))
            .await
            .map_err(|e| DomainError::internal(format!("Lock task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_second_holder_waits_for_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.lock");

        let first = DirLock::acquire(&path).unwrap();

        let (tx, rx) = mpsc::channel();
        let waiter_path = path.clone();
        let waiter = std::thread::spawn(move || {
            let _second = DirLock::acquire(&waiter_path).unwrap();
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

        drop(first);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        waiter.join().unwrap();
    }

    #[test]
    fn test_missing_directory_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = DirLock::acquire(&dir.path().join("absent").join("index.lock"));

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
