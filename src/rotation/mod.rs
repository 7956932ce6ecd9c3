// src/rotation/mod.rs
//! Master password rotation
//!
//! Verifies the old passphrase, derives a new credential and key, re-encrypts
//! every record and swaps the credential last. Runs two-phase through
//! [`staging`] so a crash at any point leaves the vault readable with exactly
//! the passphrase whose credential is in `meta.dat` once
//! [`RotationCoordinator::recover_interrupted`] has run.

mod lock;
mod staging;

use tracing::{info, warn};

use crate::aliases::{MasterPassphrase, VaultKey32};
use crate::config::Paths;
use crate::core::credential::MasterCredential;
use crate::core::crypto::reencrypt_blob;
use crate::core::kdf::KdfParams;
use crate::error::Result;
use crate::store::VaultStore;

use lock::RotationLock;
use staging::Staging;

/// Result of a successful rotation. Holds the new key for the caller's next session.
pub struct RotationOutcome {
    pub key: VaultKey32,
    pub records: usize,
}

/// What [`RotationCoordinator::recover_interrupted`] had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// The interrupted rotation had committed; it was completed.
    RolledForward { records: usize },
    /// It had not committed; staged work was thrown away.
    RolledBack,
}

pub struct RotationCoordinator<'a> {
    paths: &'a Paths,
    store: &'a VaultStore,
    params: KdfParams,
}

impl<'a> RotationCoordinator<'a> {
    pub fn new(paths: &'a Paths, store: &'a VaultStore, params: KdfParams) -> Self {
        Self {
            paths,
            store,
            params,
        }
    }

    /// Rotate from `old` to `new`. A wrong `old` fails with no side effects.
    pub fn rotate(
        &self,
        old: &MasterPassphrase,
        new: &MasterPassphrase,
    ) -> Result<RotationOutcome> {
        let _lock = RotationLock::acquire(&self.paths.lock_file())?;
        let current = MasterCredential::load(&self.paths.credential_file())?;
        let mut old_key = current.verify(old, self.params)?;

        // Leftover staging is normally resolved by `Vault::open`
        if let Some(RecoveryAction::RolledForward { .. }) = self.resolve_staging()? {
            let current = MasterCredential::load(&self.paths.credential_file())?;
            old_key = current.verify(old, self.params)?;
        }
        let (next, new_key) = MasterCredential::create_with_key(new, self.params)?;

        let staging = Staging::create(self.paths.staging_dir())?;
        let staged = self
            .stage_all(&staging, &old_key, &new_key, &next)
            .and_then(|count| staging.commit().map(|()| count));
        let records = match staged {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "rotation aborted before commit, vault unchanged");
                if let Err(cleanup) = staging.discard() {
                    warn!(error = %cleanup, "could not remove rotation staging");
                }
                return Err(e);
            }
        };

        staging.roll_forward(self.store.dir(), &self.paths.credential_file())?;
        info!(records, "master password rotated");
        Ok(RotationOutcome {
            key: new_key,
            records,
        })
    }

    /// Finish or undo a rotation a previous process did not complete, then
    /// clear its stale lock. Call before any other access to the vault.
    pub fn recover_interrupted(&self) -> Result<Option<RecoveryAction>> {
        let action = self.resolve_staging()?;
        RotationLock::clear_stale(&self.paths.lock_file())?;
        Ok(action)
    }

    fn resolve_staging(&self) -> Result<Option<RecoveryAction>> {
        let Some(staging) = Staging::existing(self.paths.staging_dir()) else {
            return Ok(None);
        };

        if staging.is_committed() {
            let records =
                staging.roll_forward(self.store.dir(), &self.paths.credential_file())?;
            warn!(records, "completed interrupted master password rotation");
            Ok(Some(RecoveryAction::RolledForward { records }))
        } else {
            staging.discard()?;
            warn!("discarded uncommitted master password rotation");
            Ok(Some(RecoveryAction::RolledBack))
        }
    }

    /// Phase one: nothing under the vault directory or `meta.dat` is touched.
    fn stage_all(
        &self,
        staging: &Staging,
        old_key: &VaultKey32,
        new_key: &VaultKey32,
        next: &MasterCredential,
    ) -> Result<usize> {
        let ids = self.store.list()?;
        for id in &ids {
            let current = self.store.read_blob(id)?;
            let rotated = reencrypt_blob(&current, old_key, new_key)?;
            staging.stage_record(id, &current, &rotated)?;
        }
        staging.stage_credential(next)?;
        Ok(ids.len())
    }
}
