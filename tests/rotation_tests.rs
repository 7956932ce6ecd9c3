// tests/rotation_tests.rs
//! Master password change through the facade

mod common;
use common::{pass, TestVault};

use encrypted_record_vault::{MasterCredential, Record, VaultError};

#[test]
fn every_record_survives_rotation() {
    let tv = TestVault::registered("old-pass");
    let session = tv.login("old-pass");
    let records: Vec<Record> = (0..5)
        .map(|i| Record::new(format!("site{i}"), "bob", format!("pw{i}"), "web", ""))
        .collect();
    for record in &records {
        tv.vault.add_record(&session, record.clone()).unwrap();
    }

    let session = tv
        .vault
        .change_master_password(session, &pass("old-pass"), &pass("new-pass"))
        .unwrap();

    let mut after: Vec<Record> = tv
        .vault
        .list_records()
        .unwrap()
        .iter()
        .map(|id| tv.vault.get_record(&session, id).unwrap())
        .collect();
    after.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(after, records);

    assert!(matches!(
        tv.vault.login(&pass("old-pass")),
        Err(VaultError::Authentication)
    ));
    assert!(tv.vault.login(&pass("new-pass")).is_ok());
}

#[test]
fn new_credential_rejects_old_passphrase() {
    let tv = TestVault::registered("old-pass");
    let session = tv.login("old-pass");
    let before = MasterCredential::load(&tv.vault.config().paths.credential_file()).unwrap();

    tv.vault
        .change_master_password(session, &pass("old-pass"), &pass("new-pass"))
        .unwrap();

    let after = MasterCredential::load(&tv.vault.config().paths.credential_file()).unwrap();
    assert_ne!(before.salt(), after.salt());
}

#[test]
fn wrong_old_passphrase_changes_nothing() {
    let tv = TestVault::registered("old-pass");
    let session = tv.login("old-pass");
    let id = tv.vault.add_record(&session, common::bank_record()).unwrap();
    let blob_path = tv.vault.config().paths.vault_dir().join(id.as_str());
    let blob = std::fs::read(&blob_path).unwrap();
    let cred = std::fs::read(tv.vault.config().paths.credential_file()).unwrap();

    let result = tv
        .vault
        .change_master_password(session, &pass("guess"), &pass("new-pass"));

    assert!(matches!(result, Err(VaultError::Authentication)));
    assert_eq!(std::fs::read(&blob_path).unwrap(), blob);
    assert_eq!(
        std::fs::read(tv.vault.config().paths.credential_file()).unwrap(),
        cred
    );
    assert!(!tv.vault.config().paths.staging_dir().exists());
    assert!(!tv.vault.config().paths.lock_file().exists());
}

#[test]
fn held_lock_refuses_a_second_rotation() {
    let tv = TestVault::registered("old-pass");
    let session = tv.login("old-pass");
    std::fs::write(tv.vault.config().paths.lock_file(), b"99999\n").unwrap();

    let result = tv
        .vault
        .change_master_password(session, &pass("old-pass"), &pass("new-pass"));
    assert!(matches!(result, Err(VaultError::Locked)));
}

#[test]
fn reopening_clears_a_stale_lock() {
    let tv = TestVault::registered("old-pass");
    std::fs::write(tv.vault.config().paths.lock_file(), b"99999\n").unwrap();

    let vault = tv.reopen();
    assert!(!vault.config().paths.lock_file().exists());

    let session = vault.login(&pass("old-pass")).unwrap();
    assert!(vault
        .change_master_password(session, &pass("old-pass"), &pass("new-pass"))
        .is_ok());
}

#[test]
fn empty_vault_rotates() {
    let tv = TestVault::registered("old-pass");
    let session = tv.login("old-pass");
    tv.vault
        .change_master_password(session, &pass("old-pass"), &pass("new-pass"))
        .unwrap();
    assert!(tv.vault.login(&pass("new-pass")).is_ok());
}
