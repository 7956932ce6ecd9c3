// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout encrypted-record-vault.
//! Every alias zeroizes its backing buffer on drop.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(VaultKey32, 32); // PBKDF2-derived record key, session lifetime only

// Dynamic secrets
dynamic_alias!(MasterPassphrase, String); // vault unlock passphrase as typed by the user
dynamic_alias!(RecoverySecret, String); // one-time recovery key handed out by `Issue`
dynamic_alias!(PlainText, Vec<u8>); // serialized record before sealing / after opening
