// src/core/mod.rs
pub mod credential;
pub mod crypto;
pub mod kdf;
pub mod record;
pub mod util;

pub use credential::MasterCredential;
pub use crypto::*;
pub use kdf::{derive_key, keyed_hash, verify_keyed_hash, KdfParams};
pub use record::{Record, RecordId};
