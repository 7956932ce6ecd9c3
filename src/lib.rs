// src/lib.rs
//! encrypted-record-vault — A local, single-user encrypted record vault
//!
//! Features:
//! - PBKDF2-HMAC-SHA256 master key, verified by an HMAC tag (`meta.dat`)
//! - One AES-256-GCM blob per record under an unpredictable filename
//! - Crash-safe two-phase master password rotation
//! - One-time recovery keys stored only as HMAC commitments
//! - Full secure-gate integration: every secret zeroizes on drop

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod enums;
pub mod export;
pub mod recovery;
pub mod rotation;
pub mod session;
pub mod store;
pub mod vault;

pub mod error;

// Re-export everything users need at the crate root
pub use crate::aliases::{MasterPassphrase, PlainText, RecoverySecret, VaultKey32};
pub use crate::config::load as load_config;
pub use crate::config::VaultConfig;
pub use crate::core::{KdfParams, MasterCredential, Record, RecordId};
pub use crate::enums::{AuditMode, ExportFormat};
pub use crate::error::{Result, VaultError};
pub use crate::export::{export_to_json, import_from_json};
pub use crate::recovery::{AuditEntry, RecoveryKeyRegistry, RecoveryStatus};
pub use crate::rotation::{RecoveryAction, RotationCoordinator, RotationOutcome};
pub use crate::session::Session;
pub use crate::store::VaultStore;
pub use crate::vault::Vault;
