// tests/support.rs
//! Test fixture: a throwaway vault with scripted prompts and injectable
//! failure seams

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use stackvault::{
    install, AescryptCipher, ArchiveStore, Archiver, CancelToken, Compressor, EncryptionGate,
    GzipCompressor, Password, PassphrasePrompt, Result, TarArchiver, VaultConfig,
    VaultController, VaultLayout,
};

/// Pops pre-arranged passphrase answers instead of touching a terminal.
#[allow(dead_code)]
pub struct ScriptedPrompt {
    existing: VecDeque<String>,
    fresh: VecDeque<(String, String)>,
}

#[allow(dead_code)]
impl ScriptedPrompt {
    pub fn new() -> Self {
        Self {
            existing: VecDeque::new(),
            fresh: VecDeque::new(),
        }
    }

    pub fn with_existing(mut self, passphrase: &str) -> Self {
        self.existing.push_back(passphrase.to_string());
        self
    }

    pub fn with_fresh(mut self, passphrase: &str, confirmation: &str) -> Self {
        self.fresh
            .push_back((passphrase.to_string(), confirmation.to_string()));
        self
    }
}

impl PassphrasePrompt for ScriptedPrompt {
    fn existing(&mut self) -> Result<Password> {
        Ok(Password::new(
            self.existing.pop_front().expect("unscripted existing prompt"),
        ))
    }

    fn new_passphrase(&mut self) -> Result<(Password, Password)> {
        let (a, b) = self.fresh.pop_front().expect("unscripted new prompt");
        Ok((Password::new(a), Password::new(b)))
    }
}

/// Delegates to the real tar archiver, then fails the append: the archive
/// is mutated but the operation dies before the ledger is touched.
#[allow(dead_code)]
pub struct SabotagedAppend(pub TarArchiver);

impl Archiver for SabotagedAppend {
    fn init(&self, out: &mut File) -> Result<()> {
        self.0.init(out)
    }

    fn append(&self, container: &Path, out: &mut File, name: &str, source: &Path) -> Result<()> {
        self.0.append(container, out, name, source)?;
        Err(io::Error::new(io::ErrorKind::Other, "injected failure after append").into())
    }

    fn remove(&self, container: &Path, out: &mut File, name: &str) -> Result<()> {
        self.0.remove(container, out, name)
    }

    fn list(&self, container: &Path) -> Result<Vec<String>> {
        self.0.list(container)
    }

    fn extract(&self, container: &Path, name: &str, dest: &Path) -> Result<()> {
        self.0.extract(container, name, dest)
    }
}

/// Decompresses fine, fails on re-compress; both archive and ledger have
/// been mutated by the time this trips.
#[allow(dead_code)]
pub struct SabotagedCompress(pub GzipCompressor);

impl Compressor for SabotagedCompress {
    fn compress(&self, _src: &Path, _dst: &mut File) -> Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "injected failure at compress").into())
    }

    fn decompress(&self, src: &Path, dst: &mut File) -> Result<()> {
        self.0.decompress(src, dst)
    }
}

#[allow(dead_code)]
pub struct TestVault {
    root: TempDir,
    pub record: PathBuf,
    pub vault_dir: PathBuf,
    pub work: PathBuf,
}

#[allow(dead_code)]
impl TestVault {
    /// Fresh installed vault plus a scratch work area.
    pub fn install() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let record = root.path().join("config");
        let vault_dir = root.path().join("vault");
        let work = root.path().join("work");
        fs::create_dir_all(&work).expect("work dir");
        install(&record, Some(vault_dir.clone())).expect("install");
        Self {
            root,
            record,
            vault_dir,
            work,
        }
    }

    pub fn config(&self) -> VaultConfig {
        VaultConfig::load(&self.record).expect("load config")
    }

    pub fn layout(&self) -> VaultLayout {
        VaultLayout::new(&self.vault_dir)
    }

    /// Controller with the default seams (never prompts, so only valid for
    /// unencrypted operations).
    pub fn controller(&self) -> VaultController {
        VaultController::new(self.config())
    }

    /// Controller whose passphrase entry is scripted.
    pub fn controller_with_prompt(&self, prompt: ScriptedPrompt) -> VaultController {
        self.controller_with(
            Box::new(TarArchiver),
            Box::new(GzipCompressor),
            prompt,
            CancelToken::new(),
        )
    }

    pub fn controller_with(
        &self,
        archiver: Box<dyn Archiver>,
        compressor: Box<dyn Compressor>,
        prompt: ScriptedPrompt,
        cancel: CancelToken,
    ) -> VaultController {
        let layout = self.layout();
        let store = ArchiveStore::with_parts(layout.clone(), archiver, compressor);
        let gate = EncryptionGate::with_parts(layout, Box::new(AescryptCipher), Box::new(prompt));
        VaultController::with_parts(self.config(), store, gate, cancel)
    }

    /// Create a file in the scratch area.
    pub fn work_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.work.join(name);
        fs::write(&path, bytes).expect("write work file");
        path
    }

    /// Empty directory in the scratch area for pop destinations.
    pub fn out_dir(&self, name: &str) -> PathBuf {
        let path = self.work.join(name);
        fs::create_dir_all(&path).expect("out dir");
        path
    }

    /// Byte-level snapshot of every persisted vault file plus the config
    /// record, sorted by name. Two equal fingerprints mean bit-identical
    /// vault state.
    pub fn fingerprint(&self) -> Vec<(String, Vec<u8>)> {
        let mut files: Vec<(String, Vec<u8>)> = fs::read_dir(&self.vault_dir)
            .expect("read vault dir")
            .map(|entry| {
                let entry = entry.expect("dir entry");
                let name = entry.file_name().to_string_lossy().into_owned();
                let bytes = fs::read(entry.path()).expect("read vault file");
                (name, bytes)
            })
            .collect();
        files.push((
            "::config".to_string(),
            fs::read(&self.record).expect("read record"),
        ));
        files.sort();
        files
    }

    /// Ledger lines, push order.
    pub fn ledger_names(&self) -> Vec<String> {
        let content = fs::read_to_string(self.layout().ledger()).expect("read ledger");
        content.lines().map(str::to_owned).collect()
    }

    /// Top-level entry names of the settled (compressed) archive, without
    /// disturbing it.
    pub fn archive_names(&self) -> Vec<String> {
        let gz = File::open(self.layout().compressed()).expect("open compressed archive");
        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(gz));
        let mut names: Vec<String> = Vec::new();
        for entry in archive.entries().expect("tar entries") {
            let entry = entry.expect("tar entry");
            let path = entry.path().expect("entry path").into_owned();
            if let Some(top) = path.components().next() {
                let top = top.as_os_str().to_string_lossy().into_owned();
                if !names.iter().any(|n| n == &top) {
                    names.push(top);
                }
            }
        }
        names
    }
}
