//! Small utility functions used across the crate
//!
//! Randomness, record filename generation and atomic file writes.
//! Keep this light. If it grows, split further.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use rand::{Rng, RngCore};
use tempfile::NamedTempFile;

use crate::consts::{RECORD_EXT_ALPHABET, RECORD_EXT_MAX, RECORD_EXT_MIN, RECORD_ID_BYTES};
use crate::error::{Result, VaultError};

/// Fill a fixed array from the thread-local CSPRNG
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    rand::rng().fill_bytes(&mut out);
    out
}

/// `len` characters drawn uniformly from `alphabet`
pub fn random_string(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Unpredictable record filename: 32 hex chars, a dot, 4–6 of `[a-z0-9]`
pub fn random_record_name() -> String {
    let id = hex::encode(random_bytes::<RECORD_ID_BYTES>());
    let ext_len = rand::rng().random_range(RECORD_EXT_MIN..=RECORD_EXT_MAX);
    format!("{id}.{}", random_string(RECORD_EXT_ALPHABET, ext_len))
}

/// Does `name` have the exact shape produced by [`random_record_name`]?
pub fn is_record_name(name: &str) -> bool {
    let Some((id, ext)) = name.split_once('.') else {
        return false;
    };
    id.len() == RECORD_ID_BYTES * 2
        && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        && (RECORD_EXT_MIN..=RECORD_EXT_MAX).contains(&ext.len())
        && ext.bytes().all(|b| RECORD_EXT_ALPHABET.contains(&b))
}

/// Write `data` to a temp file next to `path`, fsync, then rename over `path`
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| VaultError::InvalidInput(format!("{} has no parent", path.display())))?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    restrict_permissions(tmp.path())?;
    tmp.persist(path)?;
    sync_dir_best_effort(parent);
    Ok(())
}

/// Owner-only permissions on Unix; no-op elsewhere
pub fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Flush directory entries so renames survive a crash. Not supported on every platform.
pub fn sync_dir_best_effort(dir: &Path) {
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_names_have_expected_shape() {
        for _ in 0..200 {
            let name = random_record_name();
            assert!(is_record_name(&name), "{name}");
        }
    }

    #[test]
    fn record_names_are_unpredictable() {
        assert_ne!(random_record_name(), random_record_name());
    }

    #[test]
    fn rejects_foreign_names() {
        assert!(!is_record_name("notes.txt"));
        assert!(!is_record_name("../../etc/passwd"));
        assert!(!is_record_name("0123456789abcdef0123456789abcdef"));
        assert!(!is_record_name("0123456789abcdef0123456789abcdef.abc"));
        assert!(!is_record_name("0123456789abcdef0123456789abcdef.abcdefg"));
        assert!(!is_record_name("0123456789ABCDEF0123456789abcdef.abcd"));
        assert!(is_record_name("0123456789abcdef0123456789abcdef.a1b2"));
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.dat");
        fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
