// src/store/mod.rs
//! File-backed record store
//!
//! One opaque encrypted blob per record inside the vault directory. The
//! filename is the record's identity; there is no index file, so directory
//! enumeration order is the only natural ordering and it differs between
//! platforms. Callers needing row-stable identity pin a [`VaultStore::snapshot`]
//! and keep working with the returned ids.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::aliases::VaultKey32;
use crate::consts::RECORD_NAME_ATTEMPTS;
use crate::core::crypto::{decrypt_record, encrypt_record};
use crate::core::record::{Record, RecordId};
use crate::core::util::{is_record_name, random_record_name, sync_dir_best_effort};
use crate::error::{Result, VaultError};

#[derive(Debug, Clone)]
pub struct VaultStore {
    dir: PathBuf,
}

impl VaultStore {
    /// Open (creating if needed) the vault directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Encrypt and write under a fresh random filename. Never overwrites.
    pub fn save(&self, key: &VaultKey32, record: &Record) -> Result<RecordId> {
        let blob = encrypt_record(key, record)?;
        let id = self.write_new_blob(&blob)?;
        debug!(record_id = %id, "record saved");
        Ok(id)
    }

    /// Ids of every record blob currently in the directory, in enumeration order
    pub fn list(&self) -> Result<Vec<RecordId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            match name.to_str() {
                Some(name) if is_record_name(name) => {
                    ids.push(RecordId::from_generated(name.to_string()))
                }
                _ => warn!(file = ?name, "ignoring foreign file in vault directory"),
            }
        }
        Ok(ids)
    }

    /// [`list`](Self::list) sorted by id: same order on every call and platform
    pub fn snapshot(&self) -> Result<Vec<RecordId>> {
        let mut ids = self.list()?;
        ids.sort();
        Ok(ids)
    }

    pub fn load(&self, key: &VaultKey32, id: &RecordId) -> Result<Record> {
        let blob = self.read_blob(id)?;
        decrypt_record(key, &blob)
    }

    /// Remove the blob immediately. No soft delete.
    pub fn delete(&self, id: &RecordId) -> Result<()> {
        match fs::remove_file(self.path_of(id)) {
            Ok(()) => {
                debug!(record_id = %id, "record deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn read_blob(&self, id: &RecordId) -> Result<Vec<u8>> {
        match fs::read(self.path_of(id)) {
            Ok(blob) => Ok(blob),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn path_of(&self, id: &RecordId) -> PathBuf {
        self.dir.join(id.as_str())
    }

    fn write_new_blob(&self, blob: &[u8]) -> Result<RecordId> {
        for _ in 0..RECORD_NAME_ATTEMPTS {
            let name = random_record_name();
            let path = self.dir.join(&name);

            let mut options = OpenOptions::new();
            options.write(true).create_new(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }

            let mut file = match options.open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    warn!("record filename collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = file.write_all(blob).and_then(|()| file.sync_all()) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(e.into());
            }
            sync_dir_best_effort(&self.dir);
            return Ok(RecordId::from_generated(name));
        }

        Err(VaultError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "could not find a free record filename",
        )))
    }
}

fn not_found(id: &RecordId) -> VaultError {
    VaultError::NotFound(format!("no such record: {id}"))
}
