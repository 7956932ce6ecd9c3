// src/core/crypto/mod.rs
//! Record cipher — pure AEAD operations, no I/O
//!
//! All functions work exclusively on in-memory buffers.
//! Blob layout: `nonce (12) || AES-256-GCM ciphertext || tag (16)`, no associated data.
mod decrypt;
mod encrypt;
mod rotate;

pub use decrypt::{decrypt_record, open_blob};
pub use encrypt::{encrypt_record, seal_blob};
pub use rotate::reencrypt_blob;

use aes_gcm::aead::KeyInit;
use aes_gcm::Aes256Gcm;

use crate::aliases::VaultKey32;
use crate::error::{Result, VaultError};

fn cipher_for(key: &VaultKey32) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(&key.expose_secret()[..])
        .map_err(|_| VaultError::InvalidInput("AES-256-GCM needs a 32-byte key".into()))
}
