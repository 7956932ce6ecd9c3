// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    /// Wrong passphrase, wrong key or tampered ciphertext. Deliberately carries
    /// nothing that would tell these apart.
    #[error("authentication failed")]
    Authentication,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("integrity error: {0}")]
    Integrity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("vault is already registered")]
    AlreadyRegistered,

    #[error("vault is not registered")]
    NotRegistered,

    #[error("a master password rotation is already in progress")]
    Locked,

    #[error("configuration error: {0}")]
    Config(String),
}

impl VaultError {
    /// Collapse every credential failure into the single denial shown upstream.
    pub fn into_login_denial(self) -> Self {
        match self {
            VaultError::NotRegistered
            | VaultError::NotFound(_)
            | VaultError::Integrity(_)
            | VaultError::Authentication => VaultError::Authentication,
            other => other,
        }
    }
}

impl From<tempfile::PersistError> for VaultError {
    fn from(err: tempfile::PersistError) -> Self {
        VaultError::Io(err.error)
    }
}
