// src/export/mod.rs
//! Export / import of decrypted records
//!
//! Exports are plaintext by nature: every secret in the vault lands in the
//! output file. Callers should warn users heavily.

pub use json::{export_to_json, import_from_json};

pub mod json;

use std::path::Path;

use crate::enums::ExportFormat;
use crate::error::Result;
use crate::session::Session;
use crate::vault::Vault;

/// Export every record in `format`. Returns how many were written.
pub fn export(vault: &Vault, session: &Session, format: ExportFormat, path: &Path) -> Result<usize> {
    match format {
        ExportFormat::JsonV1 => export_to_json(vault, session, path),
    }
}
