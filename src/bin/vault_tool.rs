// src/bin/vault_tool.rs
//! Operator tool — thin prompt-driven wrapper over `Vault`
//!
//! Usage: vault_tool <status|register USER|list|show ID|rotate|issue-recovery|redeem KEY|export PATH|import PATH>

use std::path::Path;

use anyhow::{bail, Context, Result};
use encrypted_record_vault::{load_config, MasterPassphrase, RecordId, Session, Vault};
use rpassword::prompt_password;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config().context("Failed to load config — check ERV_CONFIG")?;
    let vault = Vault::open(config).context("Failed to open vault")?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["status"] => status(&vault)?,
        ["register", username] => {
            let pass = prompt_new_passphrase("New master password: ")?;
            vault.register(username, &pass)?;
            println!("Registered {username}");
        }
        ["list"] => {
            for id in vault.list_records()? {
                println!("{id}");
            }
        }
        ["show", id] => {
            let session = login(&vault)?;
            let record = vault.get_record(&session, &RecordId::parse(id)?)?;
            println!("name:     {}", record.name);
            println!("user:     {}", record.username);
            println!("category: {}", record.category);
            println!("note:     {}", record.note);
            println!("password: {}", record.secret);
        }
        ["rotate"] => {
            let old = MasterPassphrase::new(prompt_password("Current master password: ")?);
            let session = vault.login(&old).context("Login failed")?;
            let new = prompt_new_passphrase("New master password: ")?;
            let session = vault.change_master_password(session, &old, &new)?;
            session.logout();
            println!("Master password changed");
        }
        ["issue-recovery"] => {
            let keys = vault.issue_recovery_keys()?;
            println!("Store these somewhere safe. They will not be shown again:");
            for (i, key) in keys.iter().enumerate() {
                println!("  {:>2}. {}", i + 1, key.expose_secret());
            }
        }
        ["redeem", key] => {
            if vault.redeem_recovery_key(key)? {
                println!("Recovery key accepted");
            } else {
                bail!("Recovery key rejected");
            }
        }
        ["export", path] => {
            let session = login(&vault)?;
            let count = encrypted_record_vault::export_to_json(&vault, &session, Path::new(path))?;
            println!("Exported {count} record(s) → {path}");
            println!("SECURITY: This file holds every password in plaintext — encrypt or delete it!");
        }
        ["import", path] => {
            let session = login(&vault)?;
            let ids = encrypted_record_vault::import_from_json(&vault, &session, Path::new(path))?;
            println!("Imported {} record(s)", ids.len());
        }
        other => bail!("unknown command: {}", other.join(" ")),
    }

    Ok(())
}

fn status(vault: &Vault) -> Result<()> {
    let root = &vault.config().paths.root;
    info!("vault root: {}", root.display());

    if !vault.is_registered() {
        println!("Not registered. Run: vault_tool register <username>");
        return Ok(());
    }
    let user = vault.username()?.unwrap_or_else(|| "<unknown>".into());
    println!("User:    {user}");
    println!("Records: {}", vault.list_records()?.len());

    if vault.recovery_registry().is_issued() {
        let status = vault.recovery_status()?;
        let used = status.iter().filter(|s| s.used).count();
        println!("Recovery keys: {} issued, {used} used", status.len());
    } else {
        println!("Recovery keys: none issued");
    }
    Ok(())
}

fn login(vault: &Vault) -> Result<Session> {
    let pass = MasterPassphrase::new(prompt_password("Master password: ")?);
    vault.login(&pass).context("Login failed")
}

fn prompt_new_passphrase(prompt: &str) -> Result<MasterPassphrase> {
    let first = MasterPassphrase::new(prompt_password(prompt)?);
    let again = MasterPassphrase::new(prompt_password("Repeat: ")?);
    if first.expose_secret() != again.expose_secret() {
        bail!("Passwords do not match");
    }
    Ok(first)
}
