// src/session.rs
//! Explicit session state
//!
//! The derived key lives here and nowhere else: it is handed to every record
//! operation by reference and wiped when the session is dropped.

use std::fmt;

use crate::aliases::VaultKey32;

pub struct Session {
    key: VaultKey32,
}

impl Session {
    pub(crate) fn new(key: VaultKey32) -> Self {
        Self { key }
    }

    pub(crate) fn key(&self) -> &VaultKey32 {
        &self.key
    }

    /// End the session. The key is zeroized on drop.
    pub fn logout(self) {}
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("key", &"[REDACTED]").finish()
    }
}
