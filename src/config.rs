// src/config.rs
//! Persisted vault configuration
//!
//! One explicit `VaultConfig` value, loaded once and passed by reference;
//! no ambient globals. The on-disk record is line-oriented `KEY=VALUE`:
//!
//! ```text
//! VAULT_DIR=/home/user/.stackvault
//! ENCRYPTED=0
//! ```
//!
//! `ENCRYPTED` must be exactly `0` or `1`; anything else is a config error.
//! Rewrites go through a temp file + rename so the record is never left
//! half-written.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::consts::{
    CONFIG_FILENAME, CONFIG_SUBDIR, DEFAULT_VAULT_DIRNAME, KEY_ENCRYPTED, KEY_VAULT_DIR,
};
use crate::error::{Result, VaultError};

#[derive(Debug, Clone)]
pub struct VaultConfig {
    record_path: PathBuf,
    pub vault_dir: PathBuf,
    pub encrypted: bool,
}

impl VaultConfig {
    pub fn new<R: Into<PathBuf>, V: Into<PathBuf>>(record_path: R, vault_dir: V) -> Self {
        Self {
            record_path: record_path.into(),
            vault_dir: vault_dir.into(),
            encrypted: false,
        }
    }

    /// Load the record at `record_path`.
    pub fn load<P: AsRef<Path>>(record_path: P) -> Result<Self> {
        let record_path = record_path.as_ref();
        let content = fs::read_to_string(record_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VaultError::Config(format!(
                    "no vault installed (missing config record at {})",
                    record_path.display()
                ))
            } else {
                VaultError::Io(e)
            }
        })?;

        let mut vault_dir: Option<PathBuf> = None;
        let mut encrypted: Option<bool> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| VaultError::Config(format!("malformed line: {line:?}")))?;
            match key {
                KEY_VAULT_DIR => vault_dir = Some(PathBuf::from(value)),
                KEY_ENCRYPTED => {
                    encrypted = Some(match value {
                        "0" => false,
                        "1" => true,
                        other => {
                            return Err(VaultError::Config(format!(
                                "{KEY_ENCRYPTED} must be 0 or 1, got {other:?}"
                            )))
                        }
                    })
                }
                other => {
                    return Err(VaultError::Config(format!("unknown key: {other:?}")));
                }
            }
        }

        Ok(Self {
            record_path: record_path.to_path_buf(),
            vault_dir: vault_dir
                .ok_or_else(|| VaultError::Config(format!("missing {KEY_VAULT_DIR}")))?,
            encrypted: encrypted
                .ok_or_else(|| VaultError::Config(format!("missing {KEY_ENCRYPTED}")))?,
        })
    }

    /// Persist the record atomically.
    pub fn store(&self) -> Result<()> {
        let parent = self
            .record_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        writeln!(tmp, "{KEY_VAULT_DIR}={}", self.vault_dir.display())?;
        writeln!(tmp, "{KEY_ENCRYPTED}={}", if self.encrypted { 1 } else { 0 })?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.record_path)?;
        Ok(())
    }

    /// Delete the record (uninstall). Missing record is fine.
    pub fn remove_record(&self) -> Result<()> {
        match fs::remove_file(&self.record_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    pub fn exists<P: AsRef<Path>>(record_path: P) -> bool {
        record_path.as_ref().exists()
    }
}

/// `<config dir>/stackvault/config`, falling back to the home directory.
pub fn default_record_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_SUBDIR)
        .join(CONFIG_FILENAME)
}

/// `~/.stackvault`
pub fn default_vault_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_VAULT_DIRNAME)
}
