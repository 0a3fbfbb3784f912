// src/controller.rs
//! Push/pop orchestration
//!
//! One controller drives one vault through the operation state machine:
//! Validating → Backed-up → (Decrypting) → Decompressed → Mutating →
//! Compressed → (Encrypting) → Committed. Every failure between snapshot
//! and commit takes the rollback path, so the caller either sees the
//! operation fully applied or the vault byte-identical to its pre-call
//! state. The cancellation token is checked at each transition and joins
//! the same rollback path.

use std::path::Path;

use tracing::{info, warn};

use crate::archive::{entry_name_for, ArchiveStore};
use crate::backup::BackupManager;
use crate::cancel::CancelToken;
use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::gate::EncryptionGate;
use crate::layout::VaultLayout;
use crate::ledger::StackLedger;

pub struct VaultController {
    config: VaultConfig,
    store: ArchiveStore,
    ledger: StackLedger,
    backups: BackupManager,
    gate: EncryptionGate,
    cancel: CancelToken,
}

impl VaultController {
    pub fn new(config: VaultConfig) -> Self {
        let layout = VaultLayout::new(&config.vault_dir);
        let store = ArchiveStore::new(layout.clone());
        let gate = EncryptionGate::new(layout);
        Self::with_parts(config, store, gate, CancelToken::new())
    }

    /// Construct with substitute seams (fakes, scripted prompts, a shared
    /// cancellation token).
    pub fn with_parts(
        config: VaultConfig,
        store: ArchiveStore,
        gate: EncryptionGate,
        cancel: CancelToken,
    ) -> Self {
        let layout = VaultLayout::new(&config.vault_dir);
        let ledger = StackLedger::new(layout.ledger());
        let backups = BackupManager::new(layout, config.record_path().to_path_buf());
        Self {
            config,
            store,
            ledger,
            backups,
            gate,
            cancel,
        }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Roll back any backup set left by an interrupted operation, restoring
    /// the last committed state. Runs before every push/pop.
    pub fn recover(&mut self) -> Result<()> {
        if self.backups.has_backup() {
            warn!("backup set found at operation start; recovering last committed state");
            self.backups.rollback()?;
            // the restored record may disagree with what we loaded
            self.config = VaultConfig::load(self.config.record_path())?;
        }
        Ok(())
    }

    /// Push `item` (file or directory) onto the vault stack.
    pub fn push(&mut self, item: &Path, use_password: bool) -> Result<()> {
        let outcome = self.push_guarded(item, use_password);
        self.gate.clear_passphrase();
        outcome
    }

    fn push_guarded(&mut self, item: &Path, use_password: bool) -> Result<()> {
        self.recover()?;
        self.cancel.check()?;

        if !item.exists() {
            return Err(VaultError::ItemNotFound(item.to_path_buf()));
        }
        let name = entry_name_for(item)?;
        info!(item = %item.display(), entry = %name, "push");

        self.backups.snapshot()?;
        let outcome = self.push_steps(item, &name, use_password);
        self.finish(outcome)
    }

    fn push_steps(&mut self, item: &Path, name: &str, use_password: bool) -> Result<()> {
        self.cancel.check()?;
        if self.config.encrypted {
            if !use_password {
                return Err(VaultError::PasswordRequired);
            }
            self.gate.decrypt()?;
        }

        self.cancel.check()?;
        self.store.decompress()?;
        self.check_counts()?;

        self.cancel.check()?;
        if self.store.list_entries()?.iter().any(|n| n == name) {
            return Err(VaultError::DuplicateEntry(name.to_owned()));
        }

        self.store.add_entry(name, item)?;
        self.cancel.check()?;
        self.ledger.append(name)?;

        self.cancel.check()?;
        self.store.compress()?;

        self.cancel.check()?;
        if use_password {
            self.gate.encrypt()?;
            if !self.config.encrypted {
                self.config.encrypted = true;
                self.config.store()?;
            }
        }
        Ok(())
    }

    /// Pop the most recently pushed item into `dest_dir`, returning its
    /// entry name.
    pub fn pop(&mut self, use_password: bool, dest_dir: &Path) -> Result<String> {
        let outcome = self.pop_guarded(use_password, dest_dir);
        self.gate.clear_passphrase();
        outcome
    }

    fn pop_guarded(&mut self, use_password: bool, dest_dir: &Path) -> Result<String> {
        self.recover()?;
        self.cancel.check()?;

        self.backups.snapshot()?;
        let outcome = self.pop_steps(use_password, dest_dir);
        self.finish(outcome)
    }

    fn pop_steps(&mut self, use_password: bool, dest_dir: &Path) -> Result<String> {
        self.cancel.check()?;
        if self.config.encrypted {
            if !use_password {
                return Err(VaultError::PasswordRequired);
            }
            self.gate.decrypt()?;
        }

        let name = match self.ledger.peek_last()? {
            Some(name) => name,
            None => return Err(VaultError::EmptyVault),
        };
        info!(entry = %name, "pop");

        self.cancel.check()?;
        self.store.decompress()?;
        self.check_counts()?;

        self.cancel.check()?;
        self.store.extract_entry(&name, dest_dir)?;
        self.store.remove_entry(&name)?;
        self.cancel.check()?;
        self.ledger.pop_last()?;

        self.cancel.check()?;
        self.store.compress()?;

        self.cancel.check()?;
        if self.config.encrypted {
            self.gate.encrypt()?;
        }
        Ok(name)
    }

    /// Commit on success, roll back on failure. A rollback failure
    /// supersedes the original error; at that point the vault's
    /// invariants are no longer guaranteed.
    fn finish<T>(&mut self, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.backups.commit()?;
                info!("committed");
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "operation failed; rolling back");
                self.backups.rollback()?;
                Err(err)
            }
        }
    }

    /// Ledger lines and archive entries must agree at every settled state;
    /// divergence means a previous crash slipped past recovery.
    fn check_counts(&self) -> Result<()> {
        let ledger = self.ledger.len()?;
        let archive = self.store.entry_count()?;
        if ledger != archive {
            return Err(VaultError::CountMismatch { ledger, archive });
        }
        Ok(())
    }
}
