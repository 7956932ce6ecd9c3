// src/core/crypto/encrypt.rs
use aes_gcm::aead::Aead;
use aes_gcm::Nonce;

use super::cipher_for;
use crate::aliases::VaultKey32;
use crate::consts::NONCE_LEN;
use crate::core::record::Record;
use crate::core::util::random_bytes;
use crate::error::{Result, VaultError};

/// Serialize + seal one record under `key`
pub fn encrypt_record(key: &VaultKey32, record: &Record) -> Result<Vec<u8>> {
    let plaintext = record.to_plaintext()?;
    seal_blob(key, plaintext.expose_secret())
}

/// Seal raw bytes → `nonce || ciphertext+tag`
///
/// The nonce always comes from the CSPRNG; callers cannot supply one.
pub fn seal_blob(key: &VaultKey32, plaintext: &[u8]) -> Result<Vec<u8>> {
    let nonce = random_bytes::<NONCE_LEN>();
    let sealed = cipher_for(key)?
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| VaultError::Integrity("AEAD encryption failed".into()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(blob)
}
