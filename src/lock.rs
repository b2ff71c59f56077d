//! File-based locking to prevent concurrent execution.
//!
//! Uses flock-style advisory locking so only one update at a time touches
//! the feed cache, run state and output files of a data directory.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::HostfoldError;

const LOCK_FILE: &str = "hostfold.lock";

/// A guard that holds an exclusive lock on `<data_dir>/hostfold.lock`.
/// The lock is released when the guard is dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Attempt to acquire the lock without blocking.
    ///
    /// Opens with create+read+write (no truncate) to avoid a race between
    /// file creation and lock acquisition.
    pub fn acquire(data_dir: &Path) -> Result<Self, HostfoldError> {
        fs::create_dir_all(data_dir).map_err(|e| HostfoldError::fs(data_dir, e))?;

        let path = data_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| HostfoldError::fs(&path, e))?;

        file.try_lock_exclusive()
            .map_err(|_| HostfoldError::Locked(path.clone()))?;

        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
