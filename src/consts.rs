// src/consts.rs
//! Shared constants — security parameters and on-disk names

/// PBKDF2-HMAC-SHA256 rounds for the master key
// ~0.2–0.4s on modern hardware; the credential file does not record it,
// so every vault opened with a given config must use the same value
pub const KDF_ITERATIONS: u32 = 200_000;

/// Salt length for both the master credential and the recovery registry
pub const SALT_LEN: usize = 16;

/// Derived key length, matches AES-256-GCM
pub const KEY_LEN: usize = 32;

/// HMAC-SHA256 output length
pub const TAG_LEN: usize = 32;

/// AES-GCM nonce length
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag appended to every ciphertext
pub const AEAD_TAG_LEN: usize = 16;

/// Fixed size of `meta.dat`: salt || verification tag
pub const CREDENTIAL_LEN: usize = SALT_LEN + TAG_LEN;

/// Message keyed by the derived key to prove a passphrase is correct
pub const MASTER_CHECK_LABEL: &[u8] = b"master-check";

/// Random bytes in the identifier part of a record filename (32 hex chars)
pub const RECORD_ID_BYTES: usize = 16;

/// Inclusive bounds of the random record filename extension
pub const RECORD_EXT_MIN: usize = 4;
pub const RECORD_EXT_MAX: usize = 6;

/// Alphabet of the record filename extension
pub const RECORD_EXT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// How many fresh names `save` tries before giving up
pub const RECORD_NAME_ATTEMPTS: usize = 8;

/// Recovery keys handed out per batch unless configured otherwise
pub const DEFAULT_RECOVERY_KEY_COUNT: usize = 10;

/// Inclusive bounds of a recovery secret's length
pub const RECOVERY_KEY_MIN_LEN: usize = 4;
pub const RECOVERY_KEY_MAX_LEN: usize = 7;

/// Alphabet recovery secrets are drawn from
pub const RECOVERY_KEY_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-";

// On-disk layout under the configured root
pub const CREDENTIAL_FILE: &str = "meta.dat";
pub const USERNAME_FILE: &str = "username.txt";
pub const VAULT_DIR: &str = "vault";
pub const RECOVERY_FILE: &str = "recovery.json";
pub const RECOVERY_LOG_FILE: &str = "recovery.log";
pub const ROTATION_STAGING_DIR: &str = ".rotation";
pub const ROTATION_LOCK_FILE: &str = ".rotation.lock";

/// Marker written once every rotated blob and the new credential are staged
pub const ROTATION_COMMIT_MARKER: &str = "COMMIT";

/// Staged credential inside the rotation directory
pub const ROTATION_STAGED_CREDENTIAL: &str = "meta.new";

/// Suffixes of staged record blobs
pub const STAGED_NEW_SUFFIX: &str = "new";
pub const STAGED_OLD_SUFFIX: &str = "old";

