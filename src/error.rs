// src/error.rs
//! Public error type for the entire crate

use std::path::PathBuf;

use aescrypt_rs::AescryptError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    // ── validation ────────────────────────────────────────────
    #[error("item not found: {0}")]
    ItemNotFound(PathBuf),

    #[error("duplicate entry: {0:?} is already in the vault")]
    DuplicateEntry(String),

    #[error("the vault is empty")]
    EmptyVault,

    #[error("the vault is encrypted; password required")]
    PasswordRequired,

    #[error("entry not found in archive: {0:?}")]
    EntryNotFound(String),

    #[error("invalid entry name: {0:?}")]
    InvalidEntryName(String),

    #[error("ledger is empty")]
    EmptyLedger,

    #[error("a vault is already installed (config record at {0})")]
    AlreadyInstalled(PathBuf),

    #[error("operation interrupted")]
    Interrupted,

    // ── representation preconditions ──────────────────────────
    #[error("no archive representation found at {0}")]
    NoArchive(PathBuf),

    #[error("no ciphertext archive present")]
    NoCiphertext,

    #[error("no compressed-plaintext archive present")]
    NoPlaintext,

    // ── config ────────────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── crypto ────────────────────────────────────────────────
    #[error("crypto operation failed: {0}")]
    Crypto(AescryptError),

    #[error("wrong passphrase")]
    WrongPassphrase,

    #[error("passphrase confirmation did not match")]
    PassphraseMismatch,

    // ── state / io ────────────────────────────────────────────
    #[error("ledger/archive mismatch: ledger has {ledger} entries, archive has {archive}")]
    CountMismatch { ledger: usize, archive: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ── the one error after which no guarantee holds ──────────
    #[error("ROLLBACK FAILED, vault may be inconsistent: {0}")]
    FatalRecovery(String),
}

impl From<AescryptError> for VaultError {
    fn from(err: AescryptError) -> Self {
        VaultError::Crypto(err)
    }
}

impl From<tempfile::PersistError> for VaultError {
    fn from(err: tempfile::PersistError) -> Self {
        VaultError::Io(err.error)
    }
}

impl VaultError {
    /// Process exit code for the CLI: 1 validation/config, 2 io/state,
    /// 3 crypto, 4 rollback failure.
    pub fn exit_code(&self) -> u8 {
        use VaultError::*;
        match self {
            ItemNotFound(_) | DuplicateEntry(_) | EmptyVault | PasswordRequired
            | EntryNotFound(_) | InvalidEntryName(_) | EmptyLedger | AlreadyInstalled(_)
            | Interrupted | NoArchive(_) | NoCiphertext | NoPlaintext | Config(_) => 1,
            Io(_) | CountMismatch { .. } => 2,
            Crypto(_) | WrongPassphrase | PassphraseMismatch => 3,
            FatalRecovery(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
