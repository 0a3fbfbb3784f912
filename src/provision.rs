// src/provision.rs
//! Directory provisioning collaborators: install, setup, uninstall
//!
//! Ordinary file/directory bookkeeping around the transactional core.
//! `install` leaves a fresh vault in its settled state (an empty
//! compressed archive, an empty ledger, and a config record) so the very
//! first push runs through the same decompress/compress cycle as any
//! other.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::archive::ArchiveStore;
use crate::config::{default_vault_dir, VaultConfig};
use crate::error::{Result, VaultError};
use crate::layout::VaultLayout;
use crate::ledger::StackLedger;

/// Create a new vault and its config record. `dir` defaults to
/// `~/.stackvault`.
pub fn install(record_path: &Path, dir: Option<PathBuf>) -> Result<VaultConfig> {
    if record_path.exists() {
        return Err(VaultError::AlreadyInstalled(record_path.to_path_buf()));
    }
    let vault_dir = dir.unwrap_or_else(default_vault_dir);
    fs::create_dir_all(&vault_dir)?;

    let layout = VaultLayout::new(&vault_dir);
    ArchiveStore::new(layout.clone()).init()?;
    StackLedger::new(layout.ledger()).init()?;

    let config = VaultConfig::new(record_path, &vault_dir);
    config.store()?;
    info!(dir = %vault_dir.display(), "vault installed");
    Ok(config)
}

/// Relocate the vault directory and update the record.
pub fn setup(config: &mut VaultConfig, new_dir: &Path) -> Result<()> {
    if new_dir == config.vault_dir {
        return Ok(());
    }
    if new_dir.exists() {
        return Err(VaultError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", new_dir.display()),
        )));
    }
    if let Some(parent) = new_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::rename(&config.vault_dir, new_dir)?;
    config.vault_dir = new_dir.to_path_buf();
    config.store()?;
    info!(dir = %new_dir.display(), "vault relocated");
    Ok(())
}

/// Remove the vault directory and its config record.
pub fn uninstall(config: &VaultConfig) -> Result<()> {
    match fs::remove_dir_all(&config.vault_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    config.remove_record()?;
    info!("vault uninstalled");
    Ok(())
}
