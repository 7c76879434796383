//! Key-value persistence for state that survives restarts.
//!
//! Each store declares the keys it persists, loads them at startup, and
//! flushes on every mutation. The backends are deliberately dumb: one JSON
//! value per key.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// String key-value storage.
pub trait Storage: Send + Sync {
    /// Get the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`
    fn set(&self, key: &str, value: &str);

    /// Remove the value stored under `key`
    fn remove(&self, key: &str);
}

/// Load a JSON value persisted under `key`.
///
/// Unreadable entries are removed rather than surfaced: stale cache is
/// recoverable, a startup failure is not.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Discarding unreadable persisted value");
            storage.remove(key);
            None
        }
    }
}

/// Persist a value as JSON under `key`.
pub fn store_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => storage.set(key, &raw),
        Err(e) => warn!(key, error = %e, "Failed to serialize value for persistence"),
    }
}

/// In-memory storage, used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// File-backed storage: one `<key>.json` file per key under the data dir.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(key, error = %e, "Failed to create storage directory");
            return;
        }
        if let Err(e) = std::fs::write(self.path(key), value) {
            warn!(key, error = %e, "Failed to persist value");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path(key);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(key, error = %e, "Failed to remove persisted value");
            }
        }
    }
}
