// src/archive/mod.rs
//! The archive container and its on-disk representations
//!
//! `ArchiveStore` owns the container file set and the raw ⇄ compressed
//! toggle; the entry format itself sits behind the narrow `Archiver` trait
//! (default: tar). Every rewrite of a persisted file goes through a temp
//! file in the vault directory followed by a rename, so a crash never
//! leaves a half-written container in place of a good one.

mod tar;

pub use self::tar::TarArchiver;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::compress::{Compressor, GzipCompressor};
use crate::error::{Result, VaultError};
use crate::layout::VaultLayout;

/// Entry-format seam. Implementations rewrite the container into `out`;
/// `ArchiveStore` is responsible for swapping `out` into place atomically.
pub trait Archiver {
    /// Write an empty container into `out`.
    fn init(&self, out: &mut fs::File) -> Result<()>;

    /// Copy `container` into `out` and append `source` under `name`.
    fn append(&self, container: &Path, out: &mut fs::File, name: &str, source: &Path)
        -> Result<()>;

    /// Copy `container` into `out`, dropping the entry named `name`.
    /// Fails with `EntryNotFound` if nothing was dropped.
    fn remove(&self, container: &Path, out: &mut fs::File, name: &str) -> Result<()>;

    /// Ordered top-level entry names, first-appearance order.
    fn list(&self, container: &Path) -> Result<Vec<String>>;

    /// Unpack the entry named `name` (file or subtree) under `dest`.
    fn extract(&self, container: &Path, name: &str, dest: &Path) -> Result<()>;
}

/// Derive the archive entry name for a pushed item: its base name.
pub fn entry_name_for(item: &Path) -> Result<String> {
    let name = item
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| VaultError::InvalidEntryName(item.display().to_string()))?;
    validate_entry_name(name)?;
    Ok(name.to_owned())
}

/// Entry names are a flat namespace; reject anything that could traverse
/// out of it or confuse the underlying container.
pub fn validate_entry_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(VaultError::InvalidEntryName(name.to_owned()));
    }
    Ok(())
}

pub struct ArchiveStore {
    layout: VaultLayout,
    archiver: Box<dyn Archiver>,
    compressor: Box<dyn Compressor>,
}

impl ArchiveStore {
    pub fn new(layout: VaultLayout) -> Self {
        Self::with_parts(layout, Box::new(TarArchiver), Box::new(GzipCompressor))
    }

    /// Construct with substitute primitives (deterministic fakes in tests).
    pub fn with_parts(
        layout: VaultLayout,
        archiver: Box<dyn Archiver>,
        compressor: Box<dyn Compressor>,
    ) -> Self {
        Self {
            layout,
            archiver,
            compressor,
        }
    }

    pub fn layout(&self) -> &VaultLayout {
        &self.layout
    }

    /// Create an empty container and settle it in compressed form.
    /// Used by `install`; the vault directory must already exist.
    pub fn init(&self) -> Result<()> {
        let raw = self.layout.raw();
        let mut tmp = self.scratch()?;
        self.archiver.init(tmp.as_file_mut())?;
        Self::settle(tmp, &raw)?;
        self.compress()
    }

    pub fn add_entry(&self, name: &str, source: &Path) -> Result<()> {
        validate_entry_name(name)?;
        let raw = self.require(self.layout.raw())?;
        if self.archiver.list(&raw)?.iter().any(|n| n == name) {
            return Err(VaultError::DuplicateEntry(name.to_owned()));
        }
        let mut tmp = self.scratch()?;
        self.archiver.append(&raw, tmp.as_file_mut(), name, source)?;
        Self::settle(tmp, &raw)
    }

    pub fn remove_entry(&self, name: &str) -> Result<()> {
        let raw = self.require(self.layout.raw())?;
        let mut tmp = self.scratch()?;
        self.archiver.remove(&raw, tmp.as_file_mut(), name)?;
        Self::settle(tmp, &raw)
    }

    pub fn list_entries(&self) -> Result<Vec<String>> {
        let raw = self.require(self.layout.raw())?;
        self.archiver.list(&raw)
    }

    pub fn entry_count(&self) -> Result<usize> {
        Ok(self.list_entries()?.len())
    }

    pub fn extract_entry(&self, name: &str, dest: &Path) -> Result<()> {
        let raw = self.require(self.layout.raw())?;
        self.archiver.extract(&raw, name, dest)
    }

    /// raw → compressed. Exactly one of the two forms exists afterwards.
    pub fn compress(&self) -> Result<()> {
        let raw = self.require(self.layout.raw())?;
        let mut tmp = self.scratch()?;
        self.compressor.compress(&raw, tmp.as_file_mut())?;
        Self::settle(tmp, &self.layout.compressed())?;
        fs::remove_file(&raw)?;
        Ok(())
    }

    /// compressed → raw.
    pub fn decompress(&self) -> Result<()> {
        let compressed = self.require(self.layout.compressed())?;
        let mut tmp = self.scratch()?;
        self.compressor.decompress(&compressed, tmp.as_file_mut())?;
        Self::settle(tmp, &self.layout.raw())?;
        fs::remove_file(&compressed)?;
        Ok(())
    }

    fn require(&self, path: PathBuf) -> Result<PathBuf> {
        if path.exists() {
            Ok(path)
        } else {
            Err(VaultError::NoArchive(path))
        }
    }

    fn scratch(&self) -> Result<NamedTempFile> {
        Ok(NamedTempFile::new_in(self.layout.dir())?)
    }

    /// fsync, then rename over the destination.
    fn settle(tmp: NamedTempFile, dest: &Path) -> Result<()> {
        tmp.as_file().sync_all()?;
        tmp.persist(dest)?;
        Ok(())
    }
}
