// src/layout.rs
//! Canonical file layout of a vault directory
//!
//! Exactly one of the three archive representations exists at any settled
//! (non-mid-operation) time; `*.bak` siblings exist only while an operation
//! is in flight.

use std::path::{Path, PathBuf};

use crate::consts::{BACKUP_EXT, CIPHER_EXT, COMPRESSED_ARCHIVE, LEDGER_FILE, RAW_ARCHIVE};

/// Which on-disk form the archive container currently takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Raw,
    Compressed,
    Encrypted,
}

#[derive(Debug, Clone)]
pub struct VaultLayout {
    dir: PathBuf,
}

impl VaultLayout {
    pub fn new<P: Into<PathBuf>>(vault_dir: P) -> Self {
        Self {
            dir: vault_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn raw(&self) -> PathBuf {
        self.dir.join(RAW_ARCHIVE)
    }

    pub fn compressed(&self) -> PathBuf {
        self.dir.join(COMPRESSED_ARCHIVE)
    }

    pub fn encrypted(&self) -> PathBuf {
        self.dir
            .join(format!("{COMPRESSED_ARCHIVE}.{CIPHER_EXT}"))
    }

    pub fn ledger(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    /// `<file>.bak` sibling for any path inside the vault directory.
    pub fn backup_of(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(BACKUP_EXT);
        PathBuf::from(name)
    }

    pub fn representation_path(&self, repr: Representation) -> PathBuf {
        match repr {
            Representation::Raw => self.raw(),
            Representation::Compressed => self.compressed(),
            Representation::Encrypted => self.encrypted(),
        }
    }

    /// All three candidate representation paths, raw first.
    pub fn representation_paths(&self) -> [(Representation, PathBuf); 3] {
        [
            (Representation::Raw, self.raw()),
            (Representation::Compressed, self.compressed()),
            (Representation::Encrypted, self.encrypted()),
        ]
    }

    /// The representation present on disk right now, if any.
    ///
    /// Mid-operation more than one form may transiently exist; precedence
    /// raw > compressed > encrypted matches the order an operation unpacks
    /// them, so callers see the "most unpacked" form.
    pub fn current_representation(&self) -> Option<Representation> {
        self.representation_paths()
            .into_iter()
            .find(|(_, path)| path.exists())
            .map(|(repr, _)| repr)
    }
}
