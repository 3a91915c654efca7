//! Per-extension mutual exclusion
//!
//! At most one install or uninstall runs per extension name. The lock is an
//! exclusive advisory lock on `<work-dir>/.locks/<name>.lock`, released when
//! the guard is dropped. Lock files live outside the scanned extensions
//! directories and are reused by later runs.

use extman_core::{Error, Result};
use fs4::fs_std::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

const LOCK_DIR: &str = ".locks";

/// Held lock for one extension name
#[derive(Debug)]
pub struct ExtensionLock {
    path: PathBuf,
    _file: File,
}

impl ExtensionLock {
    /// Block until the lock for `name` under `root` is held
    pub fn acquire(root: &Path, name: &str) -> Result<Self> {
        let (path, file) = open_lock_file(root, name)?;
        debug!("Waiting for lock {}", path.display());
        FileExt::lock_exclusive(&file).map_err(|e| lock_error(&path, e))?;
        debug!("Acquired lock {}", path.display());
        Ok(Self { path, _file: file })
    }

    /// Take the lock only if nobody else holds it
    pub fn try_acquire(root: &Path, name: &str) -> Result<Option<Self>> {
        let (path, file) = open_lock_file(root, name)?;
        match FileExt::try_lock_exclusive(&file) {
            Ok(true) => Ok(Some(Self { path, _file: file })),
            Ok(false) => Ok(None),
            Err(e) => Err(lock_error(&path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_lock_file(root: &Path, name: &str) -> Result<(PathBuf, File)> {
    let dir = root.join(LOCK_DIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.lock", name));
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)?;
    Ok((path, file))
}

fn lock_error(path: &Path, e: std::io::Error) -> Error {
    Error::Io(std::io::Error::new(
        e.kind(),
        format!("Failed to lock {}: {}", path.display(), e),
    ))
}
