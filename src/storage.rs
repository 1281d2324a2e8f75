//! Persistence port
//!
//! Every persisted collection lives under its own named key as a JSON blob.
//! The engine never talks to a concrete medium directly; stores and session
//! contexts are handed a [`SharedBackend`] at construction, so tests run
//! against [`MemoryBackend`] and the application wires a [`DirBackend`].

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors that can occur while persisting a collection.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A value could not be encoded as JSON before writing.
    #[error("failed to encode value for key {key:?}")]
    Encode {
        /// The storage key being written.
        key: String,

        /// The underlying serialization error.
        source: serde_json::Error,
    },

    /// The backend failed to write or delete a key.
    #[error("failed to persist key {key:?}")]
    Io {
        /// The storage key being written or deleted.
        key: String,

        /// The underlying I/O error.
        source: io::Error,
    },
}

/// A keyed blob store.
///
/// Reads are best-effort by contract: a backend returns `None` for anything
/// it cannot produce, and [`read_json`] degrades malformed content to the
/// collection's default, so the engine never fails on bad local state.
pub trait StorageBackend: std::fmt::Debug {
    /// Read the raw blob stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError::Io`] if the medium rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the blob stored under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError::Io`] if the medium rejects the removal.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// A backend shared between the stores of one process.
pub type SharedBackend = Arc<dyn StorageBackend + Send + Sync>;

/// Decode the JSON collection stored under `key`.
///
/// Missing keys and malformed blobs both decode to `T::default()`; corrupt
/// local state is discarded with a warning rather than surfaced.
pub fn read_json<T>(backend: &SharedBackend, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = backend.read(key) else {
        return T::default();
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, %error, "discarding unreadable stored value");
            T::default()
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or the backend write fails.
pub fn write_json<T>(backend: &SharedBackend, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_owned(),
        source,
    })?;

    backend.write(key, &raw)
}

/// Volatile backend backed by a process-local map.
///
/// Doubles as the no-op environment (nothing survives the process) and as the
/// injected fake for tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend wrapped for sharing.
    #[must_use]
    pub fn shared() -> SharedBackend {
        Arc::new(Self::default())
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Durable backend keeping one file per key under a root directory.
#[derive(Debug)]
pub struct DirBackend {
    root: PathBuf,
}

impl DirBackend {
    /// Open (creating if needed) a directory-backed store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError::Io`] if the root directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Open the backend and wrap it for sharing.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError::Io`] if the root directory cannot be created.
    pub fn shared(root: impl Into<PathBuf>) -> Result<SharedBackend, StorageError> {
        Ok(Arc::new(Self::open(root)?))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are dotted identifiers chosen by this crate; anything else is
        // flattened so a key can never escape the root.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl StorageBackend for DirBackend {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value).map_err(|source| StorageError::Io {
            key: key.to_owned(),
            source,
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_key_reads_as_default() {
        let backend = MemoryBackend::shared();

        let decoded: Vec<String> = read_json(&backend, "nothing-here");

        assert!(decoded.is_empty(), "missing key must decode to default");
    }

    #[test]
    fn malformed_blob_reads_as_default() -> TestResult {
        let backend = MemoryBackend::shared();
        backend.write("broken", "{not json")?;

        let decoded: Vec<String> = read_json(&backend, "broken");

        assert!(decoded.is_empty(), "corrupt blob must decode to default");

        Ok(())
    }

    #[test]
    fn write_then_read_round_trips() -> TestResult {
        let backend = MemoryBackend::shared();
        write_json(&backend, "list", &vec!["a".to_owned(), "b".to_owned()])?;

        let decoded: Vec<String> = read_json(&backend, "list");

        assert_eq!(decoded, vec!["a".to_owned(), "b".to_owned()]);

        Ok(())
    }

    #[test]
    fn delete_is_idempotent() -> TestResult {
        let backend = MemoryBackend::shared();
        backend.write("k", "1")?;

        backend.delete("k")?;
        backend.delete("k")?;

        assert!(backend.read("k").is_none());

        Ok(())
    }
}
