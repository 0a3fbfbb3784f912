// tests/encryption_tests.rs
//! Encryption-state transitions: first-time encryption, the password
//! requirement, wrong-passphrase containment, confirmation mismatch

mod common;
mod support;

use std::fs;

use stackvault::{Representation, VaultError};
use support::{ScriptedPrompt, TestVault};

#[test]
fn first_password_push_encrypts_the_vault() {
    common::setup();
    let vault = TestVault::install();
    let item = vault.work_file("secret.txt", b"classified");

    let prompt = ScriptedPrompt::new().with_fresh("hunter2", "hunter2");
    let mut controller = vault.controller_with_prompt(prompt);
    controller.push(&item, true).unwrap();

    assert!(vault.config().encrypted);
    assert_eq!(
        vault.layout().current_representation(),
        Some(Representation::Encrypted)
    );
    assert!(!vault.layout().compressed().exists());
}

#[test]
fn encrypted_vault_requires_the_password_flag() {
    let vault = TestVault::install();
    let item = vault.work_file("secret.txt", b"classified");
    let prompt = ScriptedPrompt::new().with_fresh("hunter2", "hunter2");
    vault.controller_with_prompt(prompt).push(&item, true).unwrap();

    let before = vault.fingerprint();
    let out = vault.out_dir("out");

    let mut controller = vault.controller_with_prompt(ScriptedPrompt::new());
    assert!(matches!(
        controller.pop(false, &out),
        Err(VaultError::PasswordRequired)
    ));
    assert_eq!(vault.fingerprint(), before);

    let other = vault.work_file("other.txt", b"more");
    assert!(matches!(
        vault
            .controller_with_prompt(ScriptedPrompt::new())
            .push(&other, false),
        Err(VaultError::PasswordRequired)
    ));
    assert_eq!(vault.fingerprint(), before);
}

#[test]
fn wrong_passphrase_leaves_the_ciphertext_untouched() {
    let vault = TestVault::install();
    let item = vault.work_file("secret.txt", b"classified");
    let prompt = ScriptedPrompt::new().with_fresh("hunter2", "hunter2");
    vault.controller_with_prompt(prompt).push(&item, true).unwrap();

    let sealed = fs::read(vault.layout().encrypted()).unwrap();
    let out = vault.out_dir("out");

    let prompt = ScriptedPrompt::new().with_existing("wrong password");
    let mut controller = vault.controller_with_prompt(prompt);
    assert!(matches!(
        controller.pop(true, &out),
        Err(VaultError::WrongPassphrase)
    ));

    assert_eq!(fs::read(vault.layout().encrypted()).unwrap(), sealed);
    assert!(vault.config().encrypted);
}

#[test]
fn confirmation_mismatch_fails_without_encrypting() {
    let vault = TestVault::install();
    let item = vault.work_file("secret.txt", b"classified");
    let before = vault.fingerprint();

    let prompt = ScriptedPrompt::new().with_fresh("hunter2", "hunter3");
    let mut controller = vault.controller_with_prompt(prompt);
    assert!(matches!(
        controller.push(&item, true),
        Err(VaultError::PassphraseMismatch)
    ));

    assert_eq!(vault.fingerprint(), before);
    assert!(!vault.config().encrypted);
}

#[test]
fn encrypted_push_pop_round_trip() {
    let vault = TestVault::install();
    let item = vault.work_file("secret.txt", b"classified");

    let prompt = ScriptedPrompt::new().with_fresh("hunter2", "hunter2");
    vault.controller_with_prompt(prompt).push(&item, true).unwrap();

    // pushing more into an encrypted vault re-uses the session passphrase
    let more = vault.work_file("more.txt", b"also secret");
    let prompt = ScriptedPrompt::new().with_existing("hunter2");
    vault.controller_with_prompt(prompt).push(&more, true).unwrap();
    assert_eq!(vault.ledger_names(), ["secret.txt", "more.txt"]);

    let out = vault.out_dir("out");
    let prompt = ScriptedPrompt::new().with_existing("hunter2");
    let mut controller = vault.controller_with_prompt(prompt);
    assert_eq!(controller.pop(true, &out).unwrap(), "more.txt");
    assert_eq!(fs::read(out.join("more.txt")).unwrap(), b"also secret");

    // the vault stays encrypted after a pop
    assert!(vault.config().encrypted);
    assert_eq!(
        vault.layout().current_representation(),
        Some(Representation::Encrypted)
    );

    let prompt = ScriptedPrompt::new().with_existing("hunter2");
    let mut controller = vault.controller_with_prompt(prompt);
    assert_eq!(controller.pop(true, &out).unwrap(), "secret.txt");
    assert_eq!(fs::read(out.join("secret.txt")).unwrap(), b"classified");
}
