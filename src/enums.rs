// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the #[derive(...)] enums that represent
//! user-visible choices: recovery audit policy, export formats.

use serde::{Deserialize, Serialize};

/// What the recovery audit log records for the presented key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AuditMode {
    /// Base64 commitment of the presented key under the batch salt
    #[default]
    Commitment,
    /// The presented string verbatim. Sensitive: the log then holds live secrets.
    RawKey,
}

/// Export formats for decrypted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum ExportFormat {
    /// Pretty JSON array of `{name, user, pwd, cat, note}` objects
    #[default]
    JsonV1,
}
