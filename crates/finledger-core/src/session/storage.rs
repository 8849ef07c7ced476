//! Durable key/value storage backing the session.
//!
//! The file backend keeps every key in one flat JSON object at
//! `<base>/session.json`. Each commit rewrites the whole object through a
//! temp file + rename, so readers see either the old or the new set of keys,
//! never a mix. On Unix the file ends up with 0600 permissions.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A single mutation applied as part of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<'a> {
    Set(&'a str, String),
    Remove(&'a str),
}

/// Persistent string key/value store that survives process restarts.
pub trait DurableStorage: Send + Sync {
    /// Returns the raw value stored under `key`.
    ///
    /// # Errors
    /// Returns an error only for I/O failures; unreadable content counts as empty.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Applies all changes as one unit.
    ///
    /// # Errors
    /// Returns an error if the changes could not be persisted. Nothing is
    /// applied in that case.
    fn commit(&self, changes: &[Change<'_>]) -> Result<(), StorageError>;
}

type Entries = BTreeMap<String, String>;

fn apply(entries: &mut Entries, changes: &[Change<'_>]) {
    for change in changes {
        match change {
            Change::Set(key, value) => {
                entries.insert((*key).to_string(), value.clone());
            }
            Change::Remove(key) => {
                entries.remove(*key);
            }
        }
    }
}

/// File-backed storage.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "session storage is not valid JSON; treating it as empty"
                );
                Ok(Entries::new())
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(write_err)?;

        let contents = serde_json::to_string_pretty(entries)
            .map_err(|err| write_err(std::io::Error::other(err)))?;

        // NamedTempFile is created 0600 on Unix; persist() keeps the mode.
        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|err| write_err(err.error))?;
        Ok(())
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_entries()?.remove(key))
    }

    fn commit(&self, changes: &[Change<'_>]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries()?;
        apply(&mut entries, changes);
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(StorageError::Write {
                    path: self.path.clone(),
                    source,
                }),
            };
        }
        self.write_entries(&entries)
    }
}

/// In-memory storage, used by tests and short-lived embeddings.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<Entries>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing any session encoding.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn commit(&self, changes: &[Change<'_>]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut entries, changes);
        Ok(())
    }
}
