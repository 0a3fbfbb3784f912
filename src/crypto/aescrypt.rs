// src/crypto/aescrypt.rs
//! AES-Crypt v3 implementation of the `Cipher` seam

use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;

use aescrypt_rs::{decrypt, encrypt};

use super::Cipher;
use crate::aliases::{CipherBytes, Password, PlainBytes, RevealSecret};
use crate::consts::PASSPHRASE_KDF_ITERATIONS;
use crate::error::{Result, VaultError};

#[derive(Debug, Default)]
pub struct AescryptCipher;

impl Cipher for AescryptCipher {
    fn extension(&self) -> &'static str {
        crate::consts::CIPHER_EXT
    }

    fn encrypt(&self, plaintext: &Path, out: &mut File, passphrase: &Password) -> Result<()> {
        let plain = PlainBytes::new(fs::read(plaintext)?);
        let mut ciphertext = Vec::new();
        encrypt(
            Cursor::new(plain.expose_secret()),
            &mut ciphertext,
            passphrase,
            PASSPHRASE_KDF_ITERATIONS,
        )
        .map_err(VaultError::Crypto)?;
        out.write_all(&ciphertext)?;
        Ok(())
    }

    fn decrypt(&self, ciphertext: &Path, out: &mut File, passphrase: &Password) -> Result<()> {
        let cipher = CipherBytes::new(fs::read(ciphertext)?);
        let mut plain = Vec::new();
        // AES-Crypt v3 is authenticated; a bad passphrase is rejected here,
        // before anything reaches the output file
        decrypt(
            Cursor::new(cipher.expose_secret()),
            &mut plain,
            passphrase,
        )
        .map_err(|_| VaultError::WrongPassphrase)?;
        out.write_all(&plain)?;
        Ok(())
    }
}
