// src/config/app.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::*;
use crate::consts::{
    CREDENTIAL_FILE, KDF_ITERATIONS, RECOVERY_FILE, RECOVERY_LOG_FILE, ROTATION_LOCK_FILE,
    ROTATION_STAGING_DIR, USERNAME_FILE, VAULT_DIR,
};
use crate::enums::AuditMode;
use crate::error::{Result, VaultError};

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_paths")]
    pub paths: Paths,
    #[serde(default = "default_kdf")]
    pub kdf: KdfSettings,
    #[serde(default = "default_recovery")]
    pub recovery: RecoverySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    /// Config directory; records live in `<root>/vault`
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KdfSettings {
    pub iterations: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecoverySettings {
    pub key_count: usize,
    #[serde(default)]
    pub audit_mode: AuditMode,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            kdf: default_kdf(),
            recovery: default_recovery(),
        }
    }
}

impl VaultConfig {
    /// Defaults rooted at `root` instead of the home directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: Paths { root: root.into() },
            ..Self::default()
        }
    }

    /// Override the PBKDF2 round count. Only reachable from code, never from
    /// the config file or environment; meant for test suites.
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf.iterations = iterations;
        self
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(root) = std::env::var("ERV_ROOT") {
            self.paths.root = PathBuf::from(root);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        // meta.dat does not record the round count; any other value locks the user out
        if self.kdf.iterations != KDF_ITERATIONS {
            return Err(VaultError::Config(format!(
                "kdf.iterations is fixed at {KDF_ITERATIONS} (got {})",
                self.kdf.iterations
            )));
        }
        if self.recovery.key_count == 0 {
            return Err(VaultError::Config("recovery.key_count must be > 0".into()));
        }
        Ok(())
    }
}

impl Paths {
    pub fn credential_file(&self) -> PathBuf {
        self.root.join(CREDENTIAL_FILE)
    }

    pub fn username_file(&self) -> PathBuf {
        self.root.join(USERNAME_FILE)
    }

    pub fn vault_dir(&self) -> PathBuf {
        self.root.join(VAULT_DIR)
    }

    pub fn recovery_file(&self) -> PathBuf {
        self.root.join(RECOVERY_FILE)
    }

    pub fn recovery_log(&self) -> PathBuf {
        self.root.join(RECOVERY_LOG_FILE)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(ROTATION_STAGING_DIR)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(ROTATION_LOCK_FILE)
    }
}

/// Load config from `ERV_CONFIG` (or `securevault.toml`), falling back to defaults if missing
pub fn load() -> Result<VaultConfig> {
    let config_path =
        std::env::var("ERV_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    load_from(config_path)
}

/// Load config from an explicit path, falling back to defaults if missing
pub fn load_from(path: impl AsRef<Path>) -> Result<VaultConfig> {
    let path = path.as_ref();

    let mut conf = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded vault config");
        toml::from_str(&content)
            .map_err(|e| VaultError::Config(format!("{}: {e}", path.display())))?
    } else {
        warn!(path = %path.display(), "config not found — using built-in defaults");
        VaultConfig::default()
    };

    conf.apply_env_overrides()?;
    conf.validate()?;
    Ok(conf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let conf: VaultConfig = toml::from_str(
            r#"
            [paths]
            root = "/tmp/sv"

            [recovery]
            key_count = 4
            audit_mode = "raw_key"
            "#,
        )
        .unwrap();

        assert_eq!(conf.paths.root, PathBuf::from("/tmp/sv"));
        assert_eq!(conf.kdf.iterations, crate::consts::KDF_ITERATIONS);
        assert_eq!(conf.recovery.key_count, 4);
        assert_eq!(conf.recovery.audit_mode, AuditMode::RawKey);
    }

    #[test]
    fn layout_hangs_off_root() {
        let conf = VaultConfig::with_root("/data/sv");
        assert_eq!(conf.paths.vault_dir(), PathBuf::from("/data/sv/vault"));
        assert_eq!(conf.paths.credential_file(), PathBuf::from("/data/sv/meta.dat"));
        assert_eq!(conf.paths.recovery_log(), PathBuf::from("/data/sv/recovery.log"));
    }

    #[test]
    fn rejects_zero_iterations() {
        let conf = VaultConfig::with_root("/x").with_kdf_iterations(0);
        assert!(matches!(conf.validate(), Err(VaultError::Config(_))));
    }

    #[test]
    fn config_file_cannot_change_kdf_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("securevault.toml");

        for rounds in [1, 1_000, 500_000] {
            std::fs::write(&path, format!("[kdf]\niterations = {rounds}\n")).unwrap();
            assert!(matches!(load_from(&path), Err(VaultError::Config(_))));
        }

        std::fs::write(&path, format!("[kdf]\niterations = {KDF_ITERATIONS}\n")).unwrap();
        assert_eq!(load_from(&path).unwrap().kdf.iterations, KDF_ITERATIONS);
    }
}
