// src/backup.rs
//! Snapshot / commit / rollback for one in-flight operation
//!
//! The backup set is the `*.bak` sibling of every file an operation may
//! touch: whichever archive representation currently exists, the ledger,
//! and the config record. It exists solely for atomicity: created at
//! operation start, deleted on commit, copied back over live state on any
//! failure. A failed restore is the one condition this crate cannot
//! recover from and is surfaced as `FatalRecovery`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, VaultError};
use crate::layout::VaultLayout;

pub struct BackupManager {
    layout: VaultLayout,
    config_record: PathBuf,
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

impl BackupManager {
    pub fn new(layout: VaultLayout, config_record: PathBuf) -> Self {
        Self {
            layout,
            config_record,
        }
    }

    /// Every file a push/pop may mutate, live path order fixed.
    fn protected_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .layout
            .representation_paths()
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        paths.push(self.layout.ledger());
        paths.push(self.config_record.clone());
        paths
    }

    /// Copy the current persisted state aside. Idempotent: a repeated
    /// snapshot replaces the previous backup set wholesale, so no stale
    /// `.bak` from an earlier representation can survive.
    pub fn snapshot(&self) -> Result<()> {
        for path in self.protected_paths() {
            remove_if_exists(&VaultLayout::backup_of(&path))?;
        }
        for path in self.protected_paths() {
            if path.exists() {
                let bak = VaultLayout::backup_of(&path);
                fs::copy(&path, &bak)?;
                debug!(file = %path.display(), "snapshotted");
            }
        }
        Ok(())
    }

    pub fn has_backup(&self) -> bool {
        self.protected_paths()
            .iter()
            .any(|path| VaultLayout::backup_of(path).exists())
    }

    /// Drop the backup set. Must be the last action of a successful
    /// operation.
    pub fn commit(&self) -> Result<()> {
        for path in self.protected_paths() {
            remove_if_exists(&VaultLayout::backup_of(&path))?;
        }
        debug!("backups committed away");
        Ok(())
    }

    /// Restore the snapshotted state verbatim and drop the backup set.
    ///
    /// With no backup present this is an informational no-op (first-ever
    /// push has nothing to roll back to). A restore failure leaves the
    /// vault possibly inconsistent and is escalated to `FatalRecovery`.
    pub fn rollback(&self) -> Result<()> {
        if !self.has_backup() {
            info!("rollback requested but no backup exists; nothing to do");
            return Ok(());
        }
        warn!("rolling back to the last committed state");
        self.restore().map_err(|e| {
            VaultError::FatalRecovery(format!(
                "restoring {} failed: {e}",
                self.layout.dir().display()
            ))
        })
    }

    fn restore(&self) -> std::io::Result<()> {
        // partially-written representations go first; the backup set then
        // decides which single form comes back
        for (_, path) in self.layout.representation_paths() {
            remove_if_exists(&path)?;
        }
        for path in self.protected_paths() {
            let bak = VaultLayout::backup_of(&path);
            if bak.exists() {
                fs::copy(&bak, &path)?;
                debug!(file = %path.display(), "restored");
            }
        }
        for path in self.protected_paths() {
            remove_if_exists(&VaultLayout::backup_of(&path))?;
        }
        Ok(())
    }
}
