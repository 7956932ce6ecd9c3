// src/core/crypto/rotate.rs
use super::{open_blob, seal_blob};
use crate::aliases::VaultKey32;
use crate::error::Result;

/// Pure in-memory re-encryption: open under `old_key`, seal under `new_key` with a fresh nonce
pub fn reencrypt_blob(blob: &[u8], old_key: &VaultKey32, new_key: &VaultKey32) -> Result<Vec<u8>> {
    let plaintext = open_blob(old_key, blob)?;
    seal_blob(new_key, plaintext.expose_secret())
}
