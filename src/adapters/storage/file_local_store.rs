//! File-based Local Store Adapter
//!
//! Stores each key as `{key}.json` under a data directory. Writes go to a
//! temp file first and are renamed into place.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{LocalStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileLocalStore {
    base_path: PathBuf,
}

impl FileLocalStore {
    /// # Example
    /// ```ignore
    /// let store = FileLocalStore::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Keys become file names, so only `[A-Za-z0-9_-]` is allowed.
    fn validate_key(key: &str) -> Result<(), StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json.tmp", key))
    }
}

#[async_trait]
impl LocalStore for FileLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::validate_key(key)?;
        match fs::read_to_string(self.file_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        Self::validate_key(key)?;
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StoreError::io(format!(
                "Failed to create data directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let temp = self.temp_path(key);
        fs::write(&temp, value)
            .await
            .map_err(|e| StoreError::io(e.to_string()))?;
        fs::rename(&temp, self.file_path(key))
            .await
            .map_err(|e| StoreError::io(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        Self::validate_key(key)?;
        match fs::remove_file(self.file_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(temp_dir.path().join("nested"));

        store.set("discovery-session-abc", "{\"a\":1}".into()).await.unwrap();

        assert_eq!(
            store.get("discovery-session-abc").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(temp_dir.path().join("nested/discovery-session-abc.json").exists());
        assert!(!temp_dir.path().join("nested/discovery-session-abc.json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(temp_dir.path());
        assert_eq!(store.get("voice-session-x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(temp_dir.path());
        store.set("k", "v".into()).await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn path_like_keys_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(temp_dir.path());
        assert!(matches!(
            store.set("../escape", "v".into()).await,
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get("").await, Err(StoreError::InvalidKey(_))));
    }
}
