// tests/common.rs
//! Shared test utilities — logging setup and fast vault fixtures
#![allow(dead_code)]

use std::path::Path;

use encrypted_record_vault::{MasterPassphrase, Record, Session, Vault, VaultConfig};
use tempfile::TempDir;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Low enough to keep the suite fast; production uses 200_000
pub const FAST_ITERATIONS: u32 = 1_000;

/// Initialize test-friendly logging. Idempotent; respects RUST_LOG.
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

pub fn fast_config(root: &Path) -> VaultConfig {
    VaultConfig::with_root(root).with_kdf_iterations(FAST_ITERATIONS)
}

pub fn pass(s: &str) -> MasterPassphrase {
    MasterPassphrase::new(s.to_string())
}

pub fn bank_record() -> Record {
    Record::new("bank", "alice", "s3cret", "finance", "")
}

/// A registered vault in a fresh temp dir. Keep the `TempDir` alive.
pub struct TestVault {
    pub dir: TempDir,
    pub vault: Vault,
}

impl TestVault {
    pub fn new() -> Self {
        setup();
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(fast_config(dir.path())).unwrap();
        Self { dir, vault }
    }

    pub fn registered(passphrase: &str) -> Self {
        let tv = Self::new();
        tv.vault.register("alice", &pass(passphrase)).unwrap();
        tv
    }

    pub fn login(&self, passphrase: &str) -> Session {
        self.vault.login(&pass(passphrase)).unwrap()
    }

    /// Fresh `Vault` over the same directory, as after a restart
    pub fn reopen(&self) -> Vault {
        Vault::open(fast_config(self.dir.path())).unwrap()
    }
}
