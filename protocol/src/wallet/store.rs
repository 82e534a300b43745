//! Pluggable label-keyed byte storage for serialized credentials.
//!
//! The contract is deliberately tiny: five operations, opaque values,
//! unique labels. `get` is the only operation that can fail on an absent
//! label; `remove` is idempotent; `put` overwrites silently. Durable
//! backends add exactly one failure mode — [`StoreError::Unavailable`] —
//! so callers written against the in-memory store behave identically over
//! a persistent one.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// File extension for entries in a [`FileStore`] directory.
const ENTRY_EXTENSION: &str = "id";

/// Errors from credential store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry exists under the requested label. Only `get` produces this.
    #[error("no credential stored under label {0:?}")]
    NotFound(String),

    /// The durable backend failed (I/O error, permission problem, missing
    /// directory). Retry policy belongs to the caller.
    #[error("credential store unavailable: {0}")]
    Unavailable(#[source] io::Error),

    /// The label cannot be used as a key by this backend (e.g. it would
    /// escape the store directory as a file name).
    #[error("label {0:?} is not usable as a store key")]
    InvalidLabel(String),
}

/// A label-keyed store of opaque credential blobs.
///
/// Implementations must be safe to share across threads; the wallet and
/// session layers hold stores behind shared references.
pub trait CredentialStore: Send + Sync {
    /// Stores `content` under `label`, overwriting any existing entry.
    fn put(&self, label: &str, content: &[u8]) -> Result<(), StoreError>;

    /// Retrieves the entry under `label`, or [`StoreError::NotFound`].
    fn get(&self, label: &str) -> Result<Vec<u8>, StoreError>;

    /// Removes the entry under `label`. Absent labels are not an error.
    fn remove(&self, label: &str) -> Result<(), StoreError>;

    /// Whether an entry exists under `label`.
    fn exists(&self, label: &str) -> bool;

    /// All labels currently present, in no particular order.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

// ---------------------------------------------------------------------------
// InMemoryStore
// ---------------------------------------------------------------------------

/// Volatile in-process store. The default backend: a sign-in session's
/// credentials die with the process, which is exactly the original
/// product's behavior.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryStore {
    fn put(&self, label: &str, content: &[u8]) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(label.to_string(), content.to_vec());
        Ok(())
    }

    fn get(&self, label: &str) -> Result<Vec<u8>, StoreError> {
        self.entries
            .read()
            .get(label)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(label.to_string()))
    }

    fn remove(&self, label: &str) -> Result<(), StoreError> {
        self.entries.write().remove(label);
        Ok(())
    }

    fn exists(&self, label: &str) -> bool {
        self.entries.read().contains_key(label)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// Durable directory-backed store: one `<label>.id` file per entry.
///
/// Labels are restricted to characters that are safe as file names on the
/// platforms we care about; anything else is rejected up front as
/// [`StoreError::InvalidLabel`] instead of surfacing later as a confusing
/// I/O error.
#[derive(Debug)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Opens (creating if necessary) a store rooted at `directory`.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(StoreError::Unavailable)?;
        Ok(Self { directory })
    }

    fn entry_path(&self, label: &str) -> Result<PathBuf, StoreError> {
        if label.is_empty()
            || !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            || label.contains("..")
        {
            return Err(StoreError::InvalidLabel(label.to_string()));
        }
        Ok(self.directory.join(format!("{label}.{ENTRY_EXTENSION}")))
    }
}

impl CredentialStore for FileStore {
    fn put(&self, label: &str, content: &[u8]) -> Result<(), StoreError> {
        let path = self.entry_path(label)?;
        fs::write(path, content).map_err(StoreError::Unavailable)
    }

    fn get(&self, label: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.entry_path(label)?;
        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(label.to_string()))
            }
            Err(e) => Err(StoreError::Unavailable(e)),
        }
    }

    fn remove(&self, label: &str) -> Result<(), StoreError> {
        let path = self.entry_path(label)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Idempotent: removing an absent entry is a no-op.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Unavailable(e)),
        }
    }

    fn exists(&self, label: &str) -> bool {
        self.entry_path(label).map(|p| p.is_file()).unwrap_or(false)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut labels = Vec::new();
        let entries = fs::read_dir(&self.directory).map_err(StoreError::Unavailable)?;
        for entry in entries {
            let entry = entry.map_err(StoreError::Unavailable)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                labels.push(stem.to_string());
            }
        }
        Ok(labels)
    }
}
