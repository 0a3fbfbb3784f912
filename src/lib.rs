// src/lib.rs
//! stackvault: a personal LIFO file vault
//!
//! Push files or directories into a single archive container (plain or
//! passphrase-encrypted), pop the most recently pushed one back out.
//! Every push/pop is transactional: state is snapshotted before the
//! decrypt → modify → recompress → re-encrypt cycle and restored verbatim
//! on any failure or interruption.
//!
//! Features:
//! - AES-Crypt v3 encryption of the compressed container
//! - gzip'd tar container, flat entry namespace
//! - line-oriented stack ledger mirroring push order
//! - crash-safe `.bak` snapshot/rollback around every mutation

pub mod aliases;
pub mod archive;
pub mod backup;
pub mod cancel;
pub mod compress;
pub mod config;
pub mod consts;
pub mod controller;
pub mod crypto;
pub mod error;
pub mod gate;
pub mod layout;
pub mod ledger;
pub mod provision;

// Re-export everything users need at the crate root
pub use aliases::Password;
pub use archive::{entry_name_for, ArchiveStore, Archiver, TarArchiver};
pub use backup::BackupManager;
pub use cancel::CancelToken;
pub use compress::{Compressor, GzipCompressor};
pub use config::{default_record_path, default_vault_dir, VaultConfig};
pub use controller::VaultController;
pub use crypto::{AescryptCipher, Cipher};
pub use error::{Result, VaultError};
pub use gate::{EncryptionGate, PassphrasePrompt, TerminalPrompt};
pub use layout::{Representation, VaultLayout};
pub use ledger::StackLedger;
pub use provision::{install, setup, uninstall};
