// src/core/crypto/decrypt.rs
use aes_gcm::aead::Aead;
use aes_gcm::Nonce;

use super::cipher_for;
use crate::aliases::{PlainText, VaultKey32};
use crate::consts::{AEAD_TAG_LEN, NONCE_LEN};
use crate::core::record::Record;
use crate::error::{Result, VaultError};

/// Open + deserialize one record. Nothing is parsed unless the tag verifies.
pub fn decrypt_record(key: &VaultKey32, blob: &[u8]) -> Result<Record> {
    let plaintext = open_blob(key, blob)?;
    Record::from_plaintext(plaintext.expose_secret())
}

/// Split nonce from ciphertext+tag and run AEAD decryption
pub fn open_blob(key: &VaultKey32, blob: &[u8]) -> Result<PlainText> {
    if blob.len() < NONCE_LEN + AEAD_TAG_LEN {
        return Err(VaultError::Integrity(format!(
            "blob truncated: {} bytes",
            blob.len()
        )));
    }
    let (nonce, sealed) = blob.split_at(NONCE_LEN);
    cipher_for(key)?
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map(|bytes| PlainText::new(bytes))
        .map_err(|_| VaultError::Authentication)
}
