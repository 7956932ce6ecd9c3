// src/export/json.rs
//! Pretty JSON array of `{name, user, pwd, cat, note}` objects

use std::path::Path;

use tracing::{info, warn};
use zeroize::Zeroize;

use crate::core::record::{Record, RecordId};
use crate::core::util::write_atomic;
use crate::error::{Result, VaultError};
use crate::session::Session;
use crate::vault::Vault;

/// Decrypt every record and write them to `path`.
///
/// SECURITY WARNING: the output holds every secret in cleartext.
pub fn export_to_json(vault: &Vault, session: &Session, path: &Path) -> Result<usize> {
    let mut records = Vec::new();
    for id in vault.list_records()? {
        records.push(vault.get_record(session, &id)?);
    }

    let mut json = serde_json::to_vec_pretty(&records)
        .map_err(|e| VaultError::Integrity(format!("export encoding failed: {e}")))?;
    let written = write_atomic(path, &json);
    json.zeroize();
    written?;

    info!(count = records.len(), path = %path.display(), "exported records");
    warn!("export file contains every secret in plaintext");
    Ok(records.len())
}

/// Read an array written by [`export_to_json`] and store each entry as a new record.
///
/// The whole file is validated before anything is written.
pub fn import_from_json(vault: &Vault, session: &Session, path: &Path) -> Result<Vec<RecordId>> {
    let mut raw = std::fs::read(path)?;
    let parsed: std::result::Result<Vec<Record>, _> = serde_json::from_slice(&raw);
    raw.zeroize();
    let records = parsed.map_err(|e| VaultError::Integrity(format!("import {}: {e}", path.display())))?;

    let records = records
        .iter()
        .map(Record::normalized)
        .collect::<Result<Vec<_>>>()?;

    let mut ids = Vec::with_capacity(records.len());
    for record in records {
        ids.push(vault.add_record(session, record)?);
    }
    info!(count = ids.len(), path = %path.display(), "imported records");
    Ok(ids)
}
