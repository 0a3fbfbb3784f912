// src/crypto/mod.rs
//! Cipher seam for the compressed archive
//!
//! All primitives work on in-memory buffers over `Cursor`; file I/O stays
//! in the callers. `AescryptCipher` is the production implementation;
//! anything implementing `Cipher` can stand in for deterministic tests.

mod aescrypt;

pub use aescrypt::AescryptCipher;

use std::fs::File;
use std::path::Path;

use crate::aliases::Password;
use crate::error::Result;

pub trait Cipher {
    /// Extension appended to the compressed archive's ciphertext form.
    fn extension(&self) -> &'static str;

    /// Encrypt the file at `plaintext` into `out`.
    fn encrypt(&self, plaintext: &Path, out: &mut File, passphrase: &Password) -> Result<()>;

    /// Decrypt the file at `ciphertext` into `out`. A wrong passphrase
    /// must fail deterministically with `WrongPassphrase` and write nothing
    /// durable.
    fn decrypt(&self, ciphertext: &Path, out: &mut File, passphrase: &Password) -> Result<()>;
}
