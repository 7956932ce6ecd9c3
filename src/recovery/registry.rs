// src/recovery/registry.rs
//! On-disk shape of `recovery.json`
//!
//! `{ "salt": b64, "entries": [{ "hash": b64, "used": bool, "created": ts, "used_at": ts? }] }`

use std::io::ErrorKind;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::consts::{SALT_LEN, TAG_LEN};
use crate::core::util::write_atomic;
use crate::error::{Result, VaultError};

use super::parse_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegistryFile {
    pub salt: String,
    pub entries: Vec<RegistryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegistryEntry {
    pub hash: String,
    #[serde(default)]
    pub used: bool,
    #[serde(deserialize_with = "timestamp")]
    pub created: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub used_at: Option<DateTime<Utc>>,
}

impl RegistryFile {
    pub(crate) fn new(salt: &[u8; SALT_LEN]) -> Self {
        Self {
            salt: STANDARD.encode(salt),
            entries: Vec::new(),
        }
    }

    /// Missing file means keys were never issued.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(VaultError::NotFound("no recovery keys have been issued".into()))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&data)
            .map_err(|e| VaultError::Integrity(format!("recovery registry: {e}")))
    }

    pub(crate) fn store(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| VaultError::Integrity(format!("recovery registry: {e}")))?;
        write_atomic(path, &json)
    }

    pub(crate) fn salt_bytes(&self) -> Result<[u8; SALT_LEN]> {
        decode_fixed(&self.salt, "salt")
    }
}

impl RegistryEntry {
    pub(crate) fn issued(commitment: &[u8; TAG_LEN], created: DateTime<Utc>) -> Self {
        Self {
            hash: STANDARD.encode(commitment),
            used: false,
            created,
            used_at: None,
        }
    }

    pub(crate) fn commitment(&self) -> Result<[u8; TAG_LEN]> {
        decode_fixed(&self.hash, "hash")
    }
}

fn timestamp<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn optional_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
        None => Ok(None),
    }
}

fn decode_fixed<const N: usize>(encoded: &str, field: &str) -> Result<[u8; N]> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| VaultError::Integrity(format!("recovery registry {field}: {e}")))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        VaultError::Integrity(format!(
            "recovery registry {field} must be {N} bytes (got {})",
            bytes.len()
        ))
    })
}
