// src/rotation/lock.rs
//! Advisory lock held for the whole of a rotation

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, VaultError};

/// Lock file created with `create_new`; removed on drop, including error paths.
#[derive(Debug)]
pub(crate) struct RotationLock {
    path: PathBuf,
}

impl RotationLock {
    pub(crate) fn acquire(path: &Path) -> Result<Self> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(VaultError::Locked),
            Err(e) => return Err(e.into()),
        };
        writeln!(file, "{}", std::process::id())?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Drop a lock left behind by a process that died mid-rotation.
    /// Only valid while no other rotation can be running.
    pub(crate) fn clear_stale(path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => {
                warn!(path = %path.display(), "removed stale rotation lock");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for RotationLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
