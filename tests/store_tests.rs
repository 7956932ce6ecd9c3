// tests/store_tests.rs
//! File-backed record store

mod common;

use encrypted_record_vault::{Record, RecordId, VaultError, VaultKey32, VaultStore};

fn key() -> VaultKey32 {
    VaultKey32::new([0x11; 32])
}

#[test]
fn save_list_load_delete() {
    common::setup();
    let dir = tempfile::tempdir().unwrap();
    let store = VaultStore::open(dir.path().join("vault")).unwrap();

    let id = store.save(&key(), &common::bank_record()).unwrap();
    assert_eq!(store.list().unwrap(), vec![id.clone()]);
    assert_eq!(store.load(&key(), &id).unwrap(), common::bank_record());

    store.delete(&id).unwrap();
    assert!(store.list().unwrap().is_empty());
    assert!(matches!(store.load(&key(), &id), Err(VaultError::NotFound(_))));
    assert!(matches!(store.delete(&id), Err(VaultError::NotFound(_))));
}

#[test]
fn identical_records_get_distinct_ids_and_blobs() {
    let dir = tempfile::tempdir().unwrap();
    let store = VaultStore::open(dir.path()).unwrap();

    let a = store.save(&key(), &common::bank_record()).unwrap();
    let b = store.save(&key(), &common::bank_record()).unwrap();

    assert_ne!(a, b);
    assert_ne!(store.read_blob(&a).unwrap(), store.read_blob(&b).unwrap());
    assert_eq!(store.list().unwrap().len(), 2);
}

#[test]
fn filenames_reveal_nothing_about_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = VaultStore::open(dir.path()).unwrap();

    let id = store.save(&key(), &common::bank_record()).unwrap();
    let name = id.as_str();
    assert!(!name.contains("bank"));
    assert!(RecordId::parse(name).is_ok());

    let blob = std::fs::read(dir.path().join(name)).unwrap();
    assert!(!blob.windows(6).any(|w| w == b"s3cret"));
}

#[test]
fn foreign_files_are_not_listed() {
    let dir = tempfile::tempdir().unwrap();
    let store = VaultStore::open(dir.path()).unwrap();
    store.save(&key(), &Record::new("a", "", "p", "", "")).unwrap();

    std::fs::write(dir.path().join("notes.txt"), b"hi").unwrap();
    std::fs::write(dir.path().join(".DS_Store"), b"").unwrap();
    std::fs::create_dir(dir.path().join("0123456789abcdef0123456789abcdef.abcd")).unwrap();

    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn corrupted_blob_fails_authentication() {
    let dir = tempfile::tempdir().unwrap();
    let store = VaultStore::open(dir.path()).unwrap();
    let id = store.save(&key(), &common::bank_record()).unwrap();

    let path = dir.path().join(id.as_str());
    let mut blob = std::fs::read(&path).unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0x80;
    std::fs::write(&path, blob).unwrap();

    assert!(matches!(store.load(&key(), &id), Err(VaultError::Authentication)));
}

#[cfg(unix)]
#[test]
fn blobs_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = VaultStore::open(dir.path()).unwrap();
    let id = store.save(&key(), &common::bank_record()).unwrap();

    let mode = std::fs::metadata(dir.path().join(id.as_str()))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn snapshot_is_sorted_and_stable() {
    let dir = tempfile::tempdir().unwrap();
    let store = VaultStore::open(dir.path()).unwrap();
    for i in 0..6 {
        store
            .save(&key(), &Record::new(format!("r{i}"), "", "p", "", ""))
            .unwrap();
    }

    let first = store.snapshot().unwrap();
    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(first, sorted);
    assert_eq!(store.snapshot().unwrap(), first);
}
