//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` owns a root directory and hands out `Vault` handles, one
//! per opened vault.  Each handle holds its own derived key and its own
//! in-memory copy of the record set; every mutation rewrites the whole
//! file.
//!
//! There is no locking.  Two handles writing the same file clobber each
//! other, last write wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::crypto::kdf::{derive_key, VaultKey};
use crate::errors::{Result, VaultError};

use super::format::{self, EXTENSION};
use super::record::{millis_to_datetime, now_millis, RecordSet};

/// Options accepted by `VaultStore::open`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenOptions {
    /// Create the vault if no file exists for it yet.
    ///
    /// An existing file is opened as usual, never overwritten.
    pub create: bool,
}

impl OpenOptions {
    /// Options for opening an existing vault only.
    pub fn existing() -> Self {
        Self { create: false }
    }

    /// Options for opening a vault, creating it first if needed.
    pub fn create() -> Self {
        Self { create: true }
    }
}

/// A directory of `.pv` vault files.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    /// Use `root` as the vault directory, creating it if it is missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The vault directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing vault `name`: `<root>/<name>.pv`.
    pub fn vault_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{EXTENSION}"))
    }

    /// Returns `true` if a file exists for vault `name`.
    pub fn exists(&self, name: &str) -> bool {
        self.vault_path(name).exists()
    }

    /// Names of all vaults in the directory, sorted, without extension.
    pub fn list_vaults(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        debug!(root = %self.root.display(), count = names.len(), "listed vaults");
        Ok(names)
    }

    /// Open vault `name` with `passphrase`.
    ///
    /// With `options.create` and no existing file, a fresh empty vault is
    /// written before returning.  Otherwise the file must exist and decrypt
    /// to a well-formed record set; if it does not, the error is
    /// `InvalidVault` regardless of whether the passphrase or the file is
    /// at fault.
    ///
    /// Callers that must not reuse an existing vault on create should check
    /// `exists` first.
    pub fn open(&self, name: &str, passphrase: &[u8], options: OpenOptions) -> Result<Vault> {
        let path = self.vault_path(name);
        let key = derive_key(passphrase);

        if options.create && !path.exists() {
            let mut vault = Vault {
                path,
                key,
                data: RecordSet::new(),
            };
            vault.save()?;
            debug!(path = %vault.path.display(), "created vault");
            return Ok(vault);
        }

        let contents = format::read_vault(&path)?;
        let data = format::unseal(&key, &contents).inspect_err(|e| {
            if matches!(e, VaultError::InvalidVault) {
                warn!(path = %path.display(), "rejected vault: wrong passphrase or corrupted file");
            }
        })?;

        debug!(path = %path.display(), records = data.records.len(), "opened vault");
        Ok(Vault { path, key, data })
    }
}

/// An open vault.
///
/// Obtained from `VaultStore::open`.  Holds the derived key for the
/// lifetime of the handle; the key is zeroed when the handle is dropped.
pub struct Vault {
    path: PathBuf,
    key: VaultKey,
    data: RecordSet,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("path", &self.path)
            .field("records", &self.data.records.len())
            .finish_non_exhaustive()
    }
}

impl Vault {
    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// The value stored under `key`, or `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.records.get(key).map(String::as_str)
    }

    /// All stored keys, in insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.data.records.keys().map(String::as_str).collect()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .records
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Store `value` under `key` and save, blocking until written.
    ///
    /// Updating an existing key keeps its position in `keys()`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.records.insert(key.to_string(), value.to_string());
        self.save()
    }

    /// Store `value` under `key` and save in the background.
    ///
    /// `on_complete` receives the outcome of the write.
    pub fn set_then<F>(&mut self, key: &str, value: &str, on_complete: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        self.data.records.insert(key.to_string(), value.to_string());
        self.save_then(on_complete);
    }

    /// Remove `key` and save, blocking until written.
    ///
    /// The file is rewritten even when the key was absent.  Returns whether
    /// a value was removed.
    pub fn unset(&mut self, key: &str) -> Result<bool> {
        let removed = self.data.records.shift_remove(key).is_some();
        self.save()?;
        Ok(removed)
    }

    /// Remove `key` and save in the background.
    pub fn unset_then<F>(&mut self, key: &str, on_complete: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        self.data.records.shift_remove(key);
        self.save_then(on_complete);
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Stamp `updatedAt`, encrypt under a fresh IV, and overwrite the file
    /// on a background thread.
    ///
    /// The record set is encrypted before this returns, so later mutations
    /// do not leak into this write.  Overlapping saves to the same file
    /// finish in no particular order; wait for `on_complete` before issuing
    /// the next one if ordering matters.
    pub fn save_then<F>(&mut self, on_complete: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        self.data.updated_at = now_millis();

        let contents = match format::seal(&self.key, &self.data) {
            Ok(contents) => contents,
            Err(e) => return on_complete(Err(e)),
        };

        let path = self.path.clone();
        thread::spawn(move || {
            let result = format::write_vault(&path, &contents);
            debug!(path = %path.display(), ok = result.is_ok(), "saved vault");
            on_complete(result);
        });
    }

    /// Blocking form of `save_then`: returns once the file is written.
    pub fn save(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        self.save_then(move |result| {
            // The receiver only goes away if this thread is unwinding.
            let _ = tx.send(result);
        });

        rx.recv().map_err(|_| {
            VaultError::CommandFailed("vault writer exited without reporting".into())
        })?
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.data.records.len()
    }

    /// Returns `true` if the vault holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.records.is_empty()
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.records.contains_key(key)
    }

    /// Returns the vault creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        millis_to_datetime(self.data.created_at)
    }

    /// Returns the time of the last save.
    pub fn updated_at(&self) -> DateTime<Utc> {
        millis_to_datetime(self.data.updated_at)
    }
}
