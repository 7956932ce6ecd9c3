// src/core/kdf.rs
//! Password-based key derivation and keyed hashing
//!
//! PBKDF2-HMAC-SHA256 turns a passphrase + 16-byte salt into the 32-byte
//! record key. HMAC-SHA256 is the keyed hash behind both the master
//! verification tag and the recovery-key commitments.

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::aliases::{MasterPassphrase, VaultKey32};
use crate::consts::{KDF_ITERATIONS, KEY_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, VaultError};

type HmacSha256 = Hmac<Sha256>;

/// Tunable part of the derivation. Only the round count varies; output length is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: KDF_ITERATIONS,
        }
    }
}

impl KdfParams {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }
}

/// Derive the record key. Deterministic and slow by construction.
///
/// Fails only when `salt` is not exactly [`SALT_LEN`] bytes.
pub fn derive_key(
    passphrase: &MasterPassphrase,
    salt: &[u8],
    params: KdfParams,
) -> Result<VaultKey32> {
    if salt.len() != SALT_LEN {
        return Err(VaultError::InvalidInput(format!(
            "salt must be {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }

    let mut out = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(
        passphrase.expose_secret().as_bytes(),
        salt,
        params.iterations,
        &mut out,
    );
    let key = VaultKey32::new(out);
    out.zeroize();
    Ok(key)
}

/// HMAC-SHA256 of `message` under `key`
pub fn keyed_hash(key: &[u8], message: &[u8]) -> Result<[u8; TAG_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|_| VaultError::InvalidInput("unusable HMAC key".into()))?;
    mac.update(message);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Constant-time check of `tag` against HMAC-SHA256 of `message` under `key`
pub fn verify_keyed_hash(key: &[u8], message: &[u8], tag: &[u8]) -> bool {
    match <HmacSha256 as Mac>::new_from_slice(key) {
        Ok(mut mac) => {
            mac.update(message);
            mac.verify_slice(tag).is_ok()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams { iterations: 1_000 };

    fn pass(s: &str) -> MasterPassphrase {
        MasterPassphrase::new(s.to_string())
    }

    #[test]
    fn derivation_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(&pass("hunter2"), &salt, FAST).unwrap();
        let b = derive_key(&pass("hunter2"), &salt, FAST).unwrap();
        assert_eq!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn salt_and_passphrase_both_matter() {
        let base = derive_key(&pass("hunter2"), &[1u8; SALT_LEN], FAST).unwrap();
        let other_salt = derive_key(&pass("hunter2"), &[2u8; SALT_LEN], FAST).unwrap();
        let other_pass = derive_key(&pass("hunter3"), &[1u8; SALT_LEN], FAST).unwrap();
        assert_ne!(base.expose_secret(), other_salt.expose_secret());
        assert_ne!(base.expose_secret(), other_pass.expose_secret());
    }

    #[test]
    fn rejects_wrong_salt_length() {
        let err = derive_key(&pass("x"), &[0u8; 8], FAST);
        assert!(matches!(err, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn matches_pbkdf2_reference_vector() {
        // RFC 7914 §11, PBKDF2-HMAC-SHA256 ("passwd", "salt", c = 1), first 32 bytes
        let mut out = [0u8; 32];
        pbkdf2_hmac::<Sha256>(b"passwd", b"salt", 1, &mut out);
        assert_eq!(
            hex::encode(out),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn keyed_hash_verifies_only_matching_tag() {
        let tag = keyed_hash(b"key", b"master-check").unwrap();
        assert!(verify_keyed_hash(b"key", b"master-check", &tag));
        assert!(!verify_keyed_hash(b"other", b"master-check", &tag));
        assert!(!verify_keyed_hash(b"key", b"master-check", &tag[..31]));
    }
}
