// src/recovery/mod.rs
//! One-time recovery keys
//!
//! A batch of random secrets is handed to the user once; only an HMAC
//! commitment of each (keyed by a per-batch salt) is persisted. Each secret
//! verifies at most once. Every redemption attempt is appended to the audit log.

mod audit;
mod registry;

pub use audit::AuditEntry;

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDateTime, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::aliases::RecoverySecret;
use crate::config::VaultConfig;
use crate::consts::{
    RECOVERY_KEY_ALPHABET, RECOVERY_KEY_MAX_LEN, RECOVERY_KEY_MIN_LEN, SALT_LEN,
};
use crate::core::kdf::{keyed_hash, verify_keyed_hash};
use crate::core::util::{random_bytes, random_string};
use crate::enums::AuditMode;
use crate::error::{Result, VaultError};

use registry::{RegistryEntry, RegistryFile};

/// Read-only view of one issued key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryStatus {
    pub index: usize,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct RecoveryKeyRegistry {
    registry_path: PathBuf,
    log_path: PathBuf,
    audit_mode: AuditMode,
}

impl RecoveryKeyRegistry {
    pub fn new(registry_path: PathBuf, log_path: PathBuf, audit_mode: AuditMode) -> Self {
        Self {
            registry_path,
            log_path,
            audit_mode,
        }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(
            config.paths.recovery_file(),
            config.paths.recovery_log(),
            config.recovery.audit_mode,
        )
    }

    /// Issue a fresh batch, replacing any previous one. The returned secrets
    /// exist nowhere else.
    pub fn issue(&self, count: usize) -> Result<Vec<RecoverySecret>> {
        if count == 0 {
            return Err(VaultError::InvalidInput(
                "recovery key count must be at least 1".into(),
            ));
        }

        let salt = random_bytes::<SALT_LEN>();
        let mut file = RegistryFile::new(&salt);
        let mut secrets = Vec::with_capacity(count);
        let mut rng = rand::rng();

        for _ in 0..count {
            let len = rng.random_range(RECOVERY_KEY_MIN_LEN..=RECOVERY_KEY_MAX_LEN);
            let secret = RecoverySecret::new(random_string(RECOVERY_KEY_ALPHABET, len));
            let commitment = keyed_hash(&salt, secret.expose_secret().as_bytes())?;
            file.entries.push(RegistryEntry::issued(&commitment, Utc::now()));
            secrets.push(secret);
        }

        file.store(&self.registry_path)?;
        info!(count, "issued recovery keys");
        Ok(secrets)
    }

    /// Mark the first unused entry matching `presented` as used.
    ///
    /// `Ok(false)` when nothing unused matches. Fails with `NotFound` if no
    /// batch was ever issued. An `Err` never follows a burned key: audit log
    /// failures are reported through tracing, not the return value.
    pub fn consume(&self, presented: &str) -> Result<bool> {
        let mut file = RegistryFile::load(&self.registry_path)?;
        let salt = file.salt_bytes()?;

        let mut matched = None;
        for (index, entry) in file.entries.iter().enumerate() {
            if entry.used {
                continue;
            }
            if verify_keyed_hash(&salt, presented.as_bytes(), &entry.commitment()?) {
                matched = Some(index);
                break;
            }
        }

        if let Some(index) = matched {
            let entry = &mut file.entries[index];
            entry.used = true;
            entry.used_at = Some(Utc::now());
            file.store(&self.registry_path)?;
        }

        let success = matched.is_some();
        // A matched key is already burned on disk; the outcome stands even if the log write fails
        if let Err(e) = self.audit(&salt, presented, success) {
            warn!(error = %e, success, "could not append to recovery audit log");
        }
        if success {
            info!("recovery key redeemed");
        } else {
            warn!("recovery key rejected");
        }
        Ok(success)
    }

    pub fn status(&self) -> Result<Vec<RecoveryStatus>> {
        let file = RegistryFile::load(&self.registry_path)?;
        Ok(file
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| RecoveryStatus {
                index,
                used: entry.used,
                created_at: entry.created,
                used_at: entry.used_at,
            })
            .collect())
    }

    pub fn audit_entries(&self) -> Result<Vec<AuditEntry>> {
        audit::read(&self.log_path)
    }

    /// Whether a batch exists on disk
    pub fn is_issued(&self) -> bool {
        self.registry_path.is_file()
    }

    fn audit(&self, salt: &[u8; SALT_LEN], presented: &str, success: bool) -> Result<()> {
        match self.audit_mode {
            AuditMode::RawKey => audit::append(&self.log_path, presented, success),
            AuditMode::Commitment => {
                let commitment = keyed_hash(salt, presented.as_bytes())?;
                audit::append(&self.log_path, &STANDARD.encode(commitment), success)
            }
        }
    }
}

/// RFC 3339, or an offset-less ISO 8601 string (as older registries and logs
/// were written) read as UTC
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}
