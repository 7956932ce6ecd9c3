// src/core/record.rs
//! The credential entry stored in each encrypted blob, and the opaque id naming that blob

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::aliases::PlainText;
use crate::core::util::is_record_name;
use crate::error::{Result, VaultError};

/// One credential entry.
///
/// Serialized with the short keys `user`, `pwd`, `cat` so exported files stay
/// interchangeable with older exports. Identity lives in [`RecordId`], never here.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Record {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "user", default)]
    pub username: String,
    #[serde(rename = "pwd", default)]
    pub secret: String,
    #[serde(rename = "cat", default)]
    pub category: String,
    #[serde(default)]
    pub note: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
        category: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            secret: secret.into(),
            category: category.into(),
            note: note.into(),
        }
    }

    /// Trim every field except the secret, then require a name and a secret.
    pub fn normalized(&self) -> Result<Self> {
        let record = Self {
            name: self.name.trim().to_string(),
            username: self.username.trim().to_string(),
            secret: self.secret.clone(),
            category: self.category.trim().to_string(),
            note: self.note.trim().to_string(),
        };
        if record.name.is_empty() {
            return Err(VaultError::InvalidInput("name cannot be empty".into()));
        }
        if record.secret.is_empty() {
            return Err(VaultError::InvalidInput("password cannot be empty".into()));
        }
        Ok(record)
    }

    /// Canonical byte encoding sealed by the record cipher
    pub fn to_plaintext(&self) -> Result<PlainText> {
        serde_json::to_vec(self)
            .map(|bytes| PlainText::new(bytes))
            .map_err(|e| VaultError::Integrity(format!("record encoding failed: {e}")))
    }

    /// Inverse of [`to_plaintext`](Self::to_plaintext). Only ever called on authenticated bytes.
    pub fn from_plaintext(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| VaultError::Integrity(format!("record decoding failed: {e}")))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .field("category", &self.category)
            .field("note", &self.note)
            .finish()
    }
}

/// Filename of one encrypted blob inside the vault directory.
///
/// Only values with the generated shape are constructible, so an id can never
/// point outside the vault directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn parse(raw: &str) -> Result<Self> {
        if is_record_name(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(VaultError::NotFound(format!("no such record: {raw}")))
        }
    }

    pub(crate) fn from_generated(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
