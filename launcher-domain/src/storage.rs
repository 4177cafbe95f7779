//! Opaque key-value persistence used by the favorites, settings and usage stores.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use launcher_core::config::LauncherConfig;
use launcher_core::utils::{fs as launcher_fs, paths, run_blocking};
use launcher_core::CoreError;

use crate::error::PersistenceError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Stores each key as a file of the same name inside one directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `launcher.data_dir` if configured, the application data directory otherwise.
    pub fn for_config(config: &LauncherConfig) -> Result<Self, CoreError> {
        let dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => paths::get_app_data_dir()?,
        };
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, operation: &str, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(|c: char| c == '/' || c == '\\')
            && !key.ends_with(".tmp");
        if valid {
            Ok(self.dir.join(key))
        } else {
            Err(PersistenceError::io(
                operation,
                key,
                &CoreError::InvalidInput(format!("'{}' is not a valid storage key", key)),
            ))
        }
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for("get", key)?;
        run_blocking(move || launcher_fs::read_to_string_if_exists(&path))
            .await
            .map_err(|e| PersistenceError::io("get", key, &e))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for("put", key)?;
        let dir = self.dir.clone();
        let value = value.to_string();
        run_blocking(move || {
            launcher_fs::ensure_dir_exists(&dir)?;
            launcher_fs::write_string_atomically(&path, &value)
        })
        .await
        .map_err(|e| PersistenceError::io("put", key, &e))
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for("remove", key)?;
        run_blocking(move || launcher_fs::remove_file_if_exists(&path))
            .await
            .map_err(|e| PersistenceError::io("remove", key, &e))
    }
}

/// Process-local store, for hosts without durable storage and for tests.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.snapshot(key))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}
