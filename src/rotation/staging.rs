// src/rotation/staging.rs
//! Staging area for a two-phase rotation
//!
//! Phase one writes every re-encrypted blob as `<id>.new` (plus a copy of the
//! current blob as `<id>.old`) and the next credential as `meta.new`. The
//! `COMMIT` marker ends phase one. Phase two renames each `<id>.new` over the
//! live blob, then `meta.new` over `meta.dat`, and only then removes the
//! directory together with the old-key copies.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{
    ROTATION_COMMIT_MARKER, ROTATION_STAGED_CREDENTIAL, STAGED_NEW_SUFFIX, STAGED_OLD_SUFFIX,
};
use crate::core::credential::MasterCredential;
use crate::core::record::RecordId;
use crate::core::util::{sync_dir_best_effort, write_atomic};
use crate::error::{Result, VaultError};

#[derive(Debug)]
pub(crate) struct Staging {
    dir: PathBuf,
}

impl Staging {
    /// Start an empty staging area. A leftover one must be resolved first.
    pub(crate) fn create(dir: PathBuf) -> Result<Self> {
        match fs::create_dir(&dir) {
            Ok(()) => Ok(Self { dir }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(VaultError::Integrity(format!(
                "unresolved rotation staging at {}",
                dir.display()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn existing(dir: PathBuf) -> Option<Self> {
        dir.is_dir().then_some(Self { dir })
    }

    pub(crate) fn stage_record(&self, id: &RecordId, current: &[u8], rotated: &[u8]) -> Result<()> {
        write_atomic(&self.staged(id, STAGED_OLD_SUFFIX), current)?;
        write_atomic(&self.staged(id, STAGED_NEW_SUFFIX), rotated)
    }

    pub(crate) fn stage_credential(&self, credential: &MasterCredential) -> Result<()> {
        credential.store(&self.dir.join(ROTATION_STAGED_CREDENTIAL))
    }

    /// Point of no return: after this, recovery rolls forward instead of back.
    pub(crate) fn commit(&self) -> Result<()> {
        write_atomic(&self.dir.join(ROTATION_COMMIT_MARKER), b"")
    }

    pub(crate) fn is_committed(&self) -> bool {
        self.dir.join(ROTATION_COMMIT_MARKER).is_file()
    }

    /// Flip every staged blob into `vault_dir`, then the credential, then clean up.
    /// Idempotent: entries already flipped by an interrupted run are simply gone.
    pub(crate) fn roll_forward(self, vault_dir: &Path, credential_path: &Path) -> Result<usize> {
        let mut flipped = 0;
        for id in self.staged_new_records()? {
            fs::rename(self.staged(&id, STAGED_NEW_SUFFIX), vault_dir.join(id.as_str()))?;
            flipped += 1;
        }
        sync_dir_best_effort(vault_dir);

        let staged_credential = self.dir.join(ROTATION_STAGED_CREDENTIAL);
        if staged_credential.is_file() {
            fs::rename(&staged_credential, credential_path)?;
            if let Some(parent) = credential_path.parent() {
                sync_dir_best_effort(parent);
            }
        }

        debug!(records = flipped, "rotation flipped");
        self.discard()?;
        Ok(flipped)
    }

    pub(crate) fn discard(self) -> Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn staged(&self, id: &RecordId, suffix: &str) -> PathBuf {
        self.dir.join(format!("{id}.{suffix}"))
    }

    fn staged_new_records(&self) -> Result<Vec<RecordId>> {
        let suffix = format!(".{STAGED_NEW_SUFFIX}");
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(id) = name.to_str().and_then(|n| n.strip_suffix(suffix.as_str())) else {
                continue;
            };
            let id = RecordId::parse(id)
                .map_err(|_| VaultError::Integrity(format!("foreign file in staging: {id}")))?;
            ids.push(id);
        }
        Ok(ids)
    }
}
