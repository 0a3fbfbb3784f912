// src/compress.rs
//! Compression seam for the archive container
//!
//! The store never talks to flate2 directly; it goes through `Compressor`
//! so tests can substitute a deterministic fake.

use std::fs::File;
use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::Result;

pub trait Compressor {
    /// Compress `src` into `dst`. `dst` is truncated if it exists.
    fn compress(&self, src: &Path, dst: &mut File) -> Result<()>;

    /// Decompress `src` into `dst`.
    fn decompress(&self, src: &Path, dst: &mut File) -> Result<()>;
}

/// gzip via flate2, matching the container's `.gz` form.
#[derive(Debug, Default)]
pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn compress(&self, src: &Path, dst: &mut File) -> Result<()> {
        let mut input = File::open(src)?;
        let mut encoder = GzEncoder::new(dst, Compression::default());
        io::copy(&mut input, &mut encoder)?;
        encoder.finish()?;
        Ok(())
    }

    fn decompress(&self, src: &Path, dst: &mut File) -> Result<()> {
        let input = File::open(src)?;
        let mut decoder = GzDecoder::new(input);
        io::copy(&mut decoder, dst)?;
        Ok(())
    }
}
