// src/vault.rs
//! High-level vault workflows
//!
//! [`Vault`] is the whole upstream call surface: registration, login, record
//! CRUD, master password change and recovery keys. It coordinates the
//! credential, the record store, the rotation coordinator and the recovery
//! registry. Secrets only ever flow through [`Session`] and the secure-gate
//! aliases.

use std::io::ErrorKind;

use tracing::{debug, info, instrument, warn};

use crate::aliases::{MasterPassphrase, RecoverySecret};
use crate::config::VaultConfig;
use crate::core::credential::MasterCredential;
use crate::core::kdf::KdfParams;
use crate::core::record::{Record, RecordId};
use crate::core::util::write_atomic;
use crate::error::{Result, VaultError};
use crate::recovery::{RecoveryKeyRegistry, RecoveryStatus};
use crate::rotation::{RecoveryAction, RotationCoordinator};
use crate::session::Session;
use crate::store::VaultStore;

#[derive(Debug)]
pub struct Vault {
    config: VaultConfig,
    store: VaultStore,
    recovery: RecoveryKeyRegistry,
}

impl Vault {
    /// Create the directory layout if needed and finish or undo any rotation
    /// a previous process left behind.
    pub fn open(config: VaultConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.paths.root)?;
        let store = VaultStore::open(config.paths.vault_dir())?;
        let recovery = RecoveryKeyRegistry::from_config(&config);
        let vault = Self {
            config,
            store,
            recovery,
        };

        match vault.coordinator().recover_interrupted()? {
            Some(RecoveryAction::RolledForward { records }) => {
                warn!(records, "vault opened after an interrupted rotation; completed it")
            }
            Some(RecoveryAction::RolledBack) => {
                warn!("vault opened after an interrupted rotation; old password still applies")
            }
            None => {}
        }
        debug!(root = %vault.config.paths.root.display(), "vault opened");
        Ok(vault)
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn is_registered(&self) -> bool {
        self.config.paths.credential_file().is_file()
    }

    /// Create the master credential. Refuses to overwrite an existing one.
    #[instrument(skip(self, passphrase))]
    pub fn register(&self, username: &str, passphrase: &MasterPassphrase) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(VaultError::InvalidInput("username cannot be empty".into()));
        }
        if passphrase.expose_secret().is_empty() {
            return Err(VaultError::InvalidInput("password cannot be empty".into()));
        }
        if self.is_registered() {
            return Err(VaultError::AlreadyRegistered);
        }

        let credential = MasterCredential::create(passphrase, self.kdf())?;
        write_atomic(&self.config.paths.username_file(), username.as_bytes())?;
        credential.store(&self.config.paths.credential_file())?;
        info!("vault registered");
        Ok(())
    }

    /// Every failure to prove the passphrase surfaces as `Authentication`.
    pub fn login(&self, passphrase: &MasterPassphrase) -> Result<Session> {
        let key = MasterCredential::load(&self.config.paths.credential_file())
            .and_then(|credential| credential.verify(passphrase, self.kdf()))
            .map_err(VaultError::into_login_denial);
        match key {
            Ok(key) => {
                info!("login succeeded");
                Ok(Session::new(key))
            }
            Err(e) => {
                warn!("login failed");
                Err(e)
            }
        }
    }

    /// Stored username, if registration wrote one
    pub fn username(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(self.config.paths.username_file()) {
            Ok(name) => Ok(Some(name.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stable, sorted snapshot of record ids
    pub fn list_records(&self) -> Result<Vec<RecordId>> {
        self.store.snapshot()
    }

    pub fn add_record(&self, session: &Session, record: Record) -> Result<RecordId> {
        let record = record.normalized()?;
        self.store.save(session.key(), &record)
    }

    pub fn get_record(&self, session: &Session, id: &RecordId) -> Result<Record> {
        self.store.load(session.key(), id)
    }

    /// Replace a record. The old blob must decrypt under the session key first;
    /// the replacement gets a new id.
    pub fn update_record(&self, session: &Session, id: &RecordId, record: Record) -> Result<RecordId> {
        let record = record.normalized()?;
        self.store.load(session.key(), id)?;
        let new_id = self.store.save(session.key(), &record)?;
        self.store.delete(id)?;
        debug!(old = %id, new = %new_id, "record updated");
        Ok(new_id)
    }

    pub fn delete_record(&self, id: &RecordId) -> Result<()> {
        self.store.delete(id)
    }

    /// Rotate every record to a key derived from `new`. The old session is
    /// consumed; use the returned one from here on.
    #[instrument(skip_all)]
    pub fn change_master_password(
        &self,
        session: Session,
        old: &MasterPassphrase,
        new: &MasterPassphrase,
    ) -> Result<Session> {
        if new.expose_secret().is_empty() {
            return Err(VaultError::InvalidInput("password cannot be empty".into()));
        }
        let outcome = self.coordinator().rotate(old, new)?;
        session.logout();
        info!(records = outcome.records, "master password changed");
        Ok(Session::new(outcome.key))
    }

    /// New batch of `recovery.key_count` keys, invalidating any earlier batch
    pub fn issue_recovery_keys(&self) -> Result<Vec<RecoverySecret>> {
        self.recovery.issue(self.config.recovery.key_count)
    }

    /// `false` for unknown, already used or never-issued keys alike
    pub fn redeem_recovery_key(&self, presented: &str) -> Result<bool> {
        match self.recovery.consume(presented) {
            Err(VaultError::NotFound(_)) => {
                warn!("recovery key presented but none were ever issued");
                Ok(false)
            }
            other => other,
        }
    }

    pub fn recovery_status(&self) -> Result<Vec<RecoveryStatus>> {
        self.recovery.status()
    }

    pub fn recovery_registry(&self) -> &RecoveryKeyRegistry {
        &self.recovery
    }

    fn kdf(&self) -> KdfParams {
        KdfParams::new(self.config.kdf.iterations)
    }

    fn coordinator(&self) -> RotationCoordinator<'_> {
        RotationCoordinator::new(&self.config.paths, &self.store, self.kdf())
    }
}
