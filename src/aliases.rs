// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout stackvault.
//! The session passphrase is aescrypt's own `Password` alias so it can be
//! handed to the cipher without conversion; it zeroizes on drop.

pub use secure_gate::{dynamic_alias, RevealSecret};

pub use aescrypt_rs::aliases::PasswordString as Password;

// In-memory archive bytes while the container is being re-encrypted
dynamic_alias!(pub PlainBytes, Vec<u8>);
dynamic_alias!(pub CipherBytes, Vec<u8>);
