// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{KdfSettings, Paths, RecoverySettings};
use crate::consts::{DEFAULT_RECOVERY_KEY_COUNT, KDF_ITERATIONS};
use crate::enums::AuditMode;

pub const DEFAULT_CONFIG_FILE: &str = "securevault.toml";
pub const DEFAULT_ROOT_DIR_NAME: &str = ".securevault";

pub fn default_paths() -> Paths {
    let root = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_ROOT_DIR_NAME);
    Paths { root }
}

pub fn default_kdf() -> KdfSettings {
    KdfSettings {
        iterations: KDF_ITERATIONS,
    }
}

pub fn default_recovery() -> RecoverySettings {
    RecoverySettings {
        key_count: DEFAULT_RECOVERY_KEY_COUNT,
        audit_mode: AuditMode::default(),
    }
}
