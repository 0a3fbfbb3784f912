// src/ledger.rs
//! The stack ledger, an ordered record of entry names
//!
//! `stack.vault` holds one name per line, oldest first; the last line is
//! the next candidate for pop. Every mutation is persisted immediately via
//! a temp-file rewrite and rename, never an in-place edit, so the file is
//! always either the old list or the new one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, VaultError};

#[derive(Debug, Clone)]
pub struct StackLedger {
    path: PathBuf,
}

impl StackLedger {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty ledger file (install time).
    pub fn init(&self) -> Result<()> {
        self.write(&[])
    }

    /// All names, push order. A missing file reads as empty.
    pub fn names(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_owned).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.names()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.names()?.is_empty())
    }

    /// Append `name` as the new last element; persisted before returning.
    pub fn append(&self, name: &str) -> Result<()> {
        let mut names = self.names()?;
        names.push(name.to_owned());
        self.write(&names)
    }

    /// Non-mutating read of the last element.
    pub fn peek_last(&self) -> Result<Option<String>> {
        Ok(self.names()?.pop())
    }

    /// Remove and return the last element.
    pub fn pop_last(&self) -> Result<String> {
        let mut names = self.names()?;
        let last = names.pop().ok_or(VaultError::EmptyLedger)?;
        self.write(&names)?;
        Ok(last)
    }

    fn write(&self, names: &[String]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(parent)?;
        for name in names {
            writeln!(tmp, "{name}")?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}
