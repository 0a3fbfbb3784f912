// src/consts.rs
//! Shared constants: on-disk names and security parameters

/// Raw (uncompressed) archive container inside the vault directory
pub const RAW_ARCHIVE: &str = "archive.vault";

/// Compressed-plaintext form of the container
pub const COMPRESSED_ARCHIVE: &str = "archive.vault.gz";

/// Extension appended to the compressed form once encrypted
/// (AES-Crypt output, so `archive.vault.gz.aes`)
pub const CIPHER_EXT: &str = "aes";

/// Stack ledger: one entry name per line, order = push order
pub const LEDGER_FILE: &str = "stack.vault";

/// Extension for the transient mid-operation backup copies
pub const BACKUP_EXT: &str = "bak";

/// Config record keys
pub const KEY_VAULT_DIR: &str = "VAULT_DIR";
pub const KEY_ENCRYPTED: &str = "ENCRYPTED";

/// KDF iterations for user-chosen passphrases (AES-Crypt v3)
// 600_000 ≈ 0.5-1 second on typical CPU, a defense against GPU cracking
pub const PASSPHRASE_KDF_ITERATIONS: u32 = 600_000;

/// Default vault directory name under the user's home
pub const DEFAULT_VAULT_DIRNAME: &str = ".stackvault";

/// Config record location: `<config dir>/stackvault/config`
pub const CONFIG_SUBDIR: &str = "stackvault";
pub const CONFIG_FILENAME: &str = "config";
