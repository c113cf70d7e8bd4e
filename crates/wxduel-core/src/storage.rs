//! Persistent key-value storage.
//!
//! Stored values are JSON strings. Reads never fail: a missing, unreadable,
//! or corrupt value degrades to "no data" and is only logged, so stale local
//! state can never take the application down.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// String key-value store with JSON-serialized values.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a key. Removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

impl dyn KeyValueStore + '_ {
    /// Deserialize the value stored under `key`.
    ///
    /// Corrupt JSON is treated as absence, not an error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Discarding corrupt value for key {}: {}", key, e);
                None
            }
        }
    }

    /// Serialize `value` as JSON and store it under `key`.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

/// File-backed store: one file per key under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(StorageError::CreateDir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are simple identifiers; replace separators defensively so a
        // key can never escape the storage directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.map.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("score", r#"{"a":1}"#).unwrap();
        assert_eq!(store.get("score").as_deref(), Some(r#"{"a":1}"#));

        store.remove("score");
        assert!(store.get("score").is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.set("location", r#"{"lat":45.42}"#).unwrap();
        assert_eq!(store.get("location").as_deref(), Some(r#"{"lat":45.42}"#));

        store.remove("location");
        assert!(store.get("location").is_none());
    }

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.set("../escape", "data").unwrap();
        // The write must land inside the storage directory.
        assert!(store.get("../escape").is_some());
        assert!(dir.path().join("___escape.json").exists());
    }

    #[test]
    fn test_get_json_corrupt_value_is_none() {
        let store = MemoryStore::new();
        store.set("history", "not json {").unwrap();

        let store: &dyn KeyValueStore = &store;
        let parsed: Option<Vec<i32>> = store.get_json("history");
        assert!(parsed.is_none());
    }

    #[test]
    fn test_set_json_get_json() {
        let store = MemoryStore::new();
        let store: &dyn KeyValueStore = &store;

        store.set_json("counts", &vec![1, 2, 3]).unwrap();
        let parsed: Option<Vec<i32>> = store.get_json("counts");
        assert_eq!(parsed, Some(vec![1, 2, 3]));
    }
}
