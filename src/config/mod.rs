// src/config/mod.rs
//! Configuration system for encrypted-record-vault
//!
//! TOML file + env overrides. The loaded value is handed to [`crate::Vault::open`]
//! explicitly; nothing here is process-global.

pub use app::{load, load_from, KdfSettings, Paths, RecoverySettings, VaultConfig};

mod app;
mod defaults;
