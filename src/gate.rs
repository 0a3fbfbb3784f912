// src/gate.rs
//! Encryption state machine over the persisted archive
//!
//! Two settled states: compressed-plaintext (`archive.vault.gz`) and
//! compressed-ciphertext (`archive.vault.gz.aes`). The gate moves between
//! them, caching the session passphrase for at most one operation. The
//! cache is an `Option<Password>` that zeroizes on drop; `encrypt` takes it
//! out up front so it is cleared on every exit path, success or failure.

use std::fs;
use std::io::Write;

use tempfile::NamedTempFile;

use crate::aliases::{Password, RevealSecret};
use crate::crypto::{AescryptCipher, Cipher};
use crate::error::{Result, VaultError};
use crate::layout::VaultLayout;

/// Interactive passphrase entry, faked in tests.
pub trait PassphrasePrompt {
    /// Ask for the vault's existing passphrase.
    fn existing(&mut self) -> Result<Password>;

    /// Ask for a brand-new passphrase and its confirmation
    /// (first-time encryption).
    fn new_passphrase(&mut self) -> Result<(Password, Password)>;
}

/// Reads from the terminal without echo.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn read(label: &str) -> Result<Password> {
        print!("{label}: ");
        std::io::stdout().flush()?;
        let input = rpassword::read_password()?;
        Ok(Password::new(input))
    }
}

impl PassphrasePrompt for TerminalPrompt {
    fn existing(&mut self) -> Result<Password> {
        Self::read("Vault passphrase")
    }

    fn new_passphrase(&mut self) -> Result<(Password, Password)> {
        let first = Self::read("New vault passphrase")?;
        let confirm = Self::read("Confirm passphrase")?;
        Ok((first, confirm))
    }
}

pub struct EncryptionGate {
    layout: VaultLayout,
    cipher: Box<dyn Cipher>,
    prompt: Box<dyn PassphrasePrompt>,
    cached: Option<Password>,
}

impl EncryptionGate {
    pub fn new(layout: VaultLayout) -> Self {
        Self::with_parts(layout, Box::new(AescryptCipher), Box::new(TerminalPrompt))
    }

    pub fn with_parts(
        layout: VaultLayout,
        cipher: Box<dyn Cipher>,
        prompt: Box<dyn PassphrasePrompt>,
    ) -> Self {
        Self {
            layout,
            cipher,
            prompt,
            cached: None,
        }
    }

    /// ciphertext → compressed-plaintext.
    ///
    /// Prompts for the session passphrase and caches it for the rest of the
    /// operation. The ciphertext form is removed only after the plaintext
    /// has been synced and renamed into place; a wrong passphrase leaves
    /// the vault untouched.
    pub fn decrypt(&mut self) -> Result<()> {
        let ciphertext = self.layout.encrypted();
        if !ciphertext.exists() {
            return Err(VaultError::NoCiphertext);
        }

        let passphrase = self.prompt.existing()?;

        let mut tmp = NamedTempFile::new_in(self.layout.dir())?;
        self.cipher
            .decrypt(&ciphertext, tmp.as_file_mut(), &passphrase)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.layout.compressed())?;
        fs::remove_file(&ciphertext)?;

        self.cached = Some(passphrase);
        Ok(())
    }

    /// compressed-plaintext → ciphertext.
    ///
    /// Uses the passphrase cached by `decrypt`; with nothing cached this is
    /// first-time encryption and the user is asked for a new passphrase
    /// plus confirmation. A confirmation mismatch mutates nothing.
    pub fn encrypt(&mut self) -> Result<()> {
        // taken immediately: cleared no matter how we leave this function
        let cached = self.cached.take();

        let plaintext = self.layout.compressed();
        if !plaintext.exists() {
            return Err(VaultError::NoPlaintext);
        }

        let passphrase = match cached {
            Some(passphrase) => passphrase,
            None => {
                let (first, confirm) = self.prompt.new_passphrase()?;
                if first.expose_secret() != confirm.expose_secret() {
                    return Err(VaultError::PassphraseMismatch);
                }
                first
            }
        };

        let mut tmp = NamedTempFile::new_in(self.layout.dir())?;
        self.cipher
            .encrypt(&plaintext, tmp.as_file_mut(), &passphrase)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.layout.encrypted())?;
        fs::remove_file(&plaintext)?;
        Ok(())
    }

    pub fn has_cached_passphrase(&self) -> bool {
        self.cached.is_some()
    }

    /// Drop the session passphrase. Called on both exits of push/pop; the
    /// secret also zeroizes when the gate itself is dropped.
    pub fn clear_passphrase(&mut self) {
        self.cached = None;
    }
}
