// src/core/credential.rs
//! Master credential — salt + verification tag persisted as `meta.dat`
//!
//! Proves a passphrase is correct without storing the passphrase or the key.
//! Layout is fixed: `[0:16)` salt, `[16:48)` HMAC-SHA256(key, "master-check").

use std::io::ErrorKind;
use std::path::Path;

use crate::aliases::{MasterPassphrase, VaultKey32};
use crate::consts::{CREDENTIAL_LEN, MASTER_CHECK_LABEL, SALT_LEN, TAG_LEN};
use crate::core::kdf::{derive_key, keyed_hash, verify_keyed_hash, KdfParams};
use crate::core::util::{random_bytes, write_atomic};
use crate::error::{Result, VaultError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterCredential {
    salt: [u8; SALT_LEN],
    tag: [u8; TAG_LEN],
}

impl MasterCredential {
    /// Fresh salt, derived key, verification tag. The key is discarded.
    pub fn create(passphrase: &MasterPassphrase, params: KdfParams) -> Result<Self> {
        Self::create_with_key(passphrase, params).map(|(credential, _key)| credential)
    }

    /// Like [`create`](Self::create) but hands back the derived key as well,
    /// saving a second slow derivation when the caller needs it immediately.
    pub fn create_with_key(
        passphrase: &MasterPassphrase,
        params: KdfParams,
    ) -> Result<(Self, VaultKey32)> {
        let salt = random_bytes::<SALT_LEN>();
        let key = derive_key(passphrase, &salt, params)?;
        let tag = keyed_hash(key.expose_secret(), MASTER_CHECK_LABEL)?;
        Ok((Self { salt, tag }, key))
    }

    /// Re-derive the key from the stored salt and compare tags in constant time.
    pub fn verify(&self, passphrase: &MasterPassphrase, params: KdfParams) -> Result<VaultKey32> {
        let key = derive_key(passphrase, &self.salt, params)?;
        if verify_keyed_hash(key.expose_secret(), MASTER_CHECK_LABEL, &self.tag) {
            Ok(key)
        } else {
            Err(VaultError::Authentication)
        }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn to_bytes(&self) -> [u8; CREDENTIAL_LEN] {
        let mut out = [0u8; CREDENTIAL_LEN];
        out[..SALT_LEN].copy_from_slice(&self.salt);
        out[SALT_LEN..].copy_from_slice(&self.tag);
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != CREDENTIAL_LEN {
            return Err(VaultError::Integrity(format!(
                "credential must be {CREDENTIAL_LEN} bytes (got {})",
                data.len()
            )));
        }
        let mut salt = [0u8; SALT_LEN];
        let mut tag = [0u8; TAG_LEN];
        salt.copy_from_slice(&data[..SALT_LEN]);
        tag.copy_from_slice(&data[SALT_LEN..]);
        Ok(Self { salt, tag })
    }

    /// Read `meta.dat`. A missing file means the vault was never registered.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read(path) {
            Ok(data) => Self::from_bytes(&data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(VaultError::NotRegistered),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace `meta.dat` atomically; a reader sees either the old or the new credential.
    pub fn store(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams { iterations: 1_000 };

    #[test]
    fn layout_is_salt_then_tag() {
        let pass = MasterPassphrase::new("layout".to_string());
        let (cred, key) = MasterCredential::create_with_key(&pass, FAST).unwrap();
        let bytes = cred.to_bytes();

        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[..16], cred.salt());
        let expected = keyed_hash(key.expose_secret(), b"master-check").unwrap();
        assert_eq!(&bytes[16..], &expected);
    }

    #[test]
    fn fresh_salt_every_time() {
        let pass = MasterPassphrase::new("same".to_string());
        let a = MasterCredential::create(&pass, FAST).unwrap();
        let b = MasterCredential::create(&pass, FAST).unwrap();
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a, b);
    }
}
