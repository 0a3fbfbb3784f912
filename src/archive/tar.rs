// src/archive/tar.rs
//! Tar implementation of the `Archiver` seam
//!
//! Entries keep their append order on every rewrite: `append` copies the
//! existing members first, `remove` copies the survivors in order. The
//! ledger relies on that (its line order mirrors the container's member
//! order at all settled states).

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tar::{Archive, Builder};

use super::Archiver;
use crate::error::{Result, VaultError};

#[derive(Debug, Default)]
pub struct TarArchiver;

/// First path component of a container member, as the flat entry name.
fn top_level_of(path: &Path) -> Option<String> {
    path.components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
}

/// Copy every member whose top-level name passes `keep` into `builder`.
/// Returns (members seen, members kept).
fn copy_members<W: Write>(
    container: &Path,
    builder: &mut Builder<W>,
    keep: impl Fn(&str) -> bool,
) -> Result<(usize, usize)> {
    let mut archive = Archive::new(File::open(container)?);
    let (mut seen, mut kept) = (0, 0);
    for entry in archive.entries()? {
        let mut entry = entry?;
        seen += 1;
        let path = entry.path()?.into_owned();
        let top = match top_level_of(&path) {
            Some(top) => top,
            None => continue,
        };
        if keep(&top) {
            // append_data rewrites the name, so long paths survive the copy
            let mut header = entry.header().clone();
            builder.append_data(&mut header, &path, &mut entry)?;
            kept += 1;
        }
    }
    Ok((seen, kept))
}

impl Archiver for TarArchiver {
    fn init(&self, out: &mut File) -> Result<()> {
        let mut builder = Builder::new(out);
        builder.finish()?;
        Ok(())
    }

    fn append(
        &self,
        container: &Path,
        out: &mut File,
        name: &str,
        source: &Path,
    ) -> Result<()> {
        let mut builder = Builder::new(out);
        builder.follow_symlinks(false);
        copy_members(container, &mut builder, |_| true)?;
        if fs::symlink_metadata(source)?.is_dir() {
            builder.append_dir_all(name, source)?;
        } else {
            builder.append_path_with_name(source, name)?;
        }
        builder.finish()?;
        Ok(())
    }

    fn remove(&self, container: &Path, out: &mut File, name: &str) -> Result<()> {
        let mut builder = Builder::new(out);
        let (seen, kept) = copy_members(container, &mut builder, |top| top != name)?;
        builder.finish()?;
        if seen == kept {
            return Err(VaultError::EntryNotFound(name.to_owned()));
        }
        Ok(())
    }

    fn list(&self, container: &Path) -> Result<Vec<String>> {
        let mut archive = Archive::new(File::open(container)?);
        let mut names: Vec<String> = Vec::new();
        for entry in archive.entries()? {
            let entry = entry?;
            if let Some(top) = top_level_of(&entry.path()?) {
                if !names.iter().any(|n| n == &top) {
                    names.push(top);
                }
            }
        }
        Ok(names)
    }

    fn extract(&self, container: &Path, name: &str, dest: &Path) -> Result<()> {
        let mut archive = Archive::new(File::open(container)?);
        archive.set_preserve_permissions(true);
        let mut found = false;
        for entry in archive.entries()? {
            let mut entry = entry?;
            let is_ours = top_level_of(&entry.path()?).as_deref() == Some(name);
            if is_ours {
                // unpack_in refuses paths that escape dest
                entry.unpack_in(dest)?;
                found = true;
            }
        }
        if !found {
            return Err(VaultError::EntryNotFound(name.to_owned()));
        }
        Ok(())
    }
}
