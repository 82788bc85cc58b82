//! File-backed persistence for the API key.
//!
//! Replaces the browser-localStorage slot of the original web client. The
//! key lives in one small JSON file under the medox config dir; it is loaded
//! at the CLI boundary and handed to the [`Session`](crate::Session)
//! explicitly, never read ambiently during requests.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A persisted credential with its issuance time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredKey {
    pub key: String,
    pub issued_at: DateTime<Utc>,
}

/// One-key store backed by a JSON file.
pub struct Keystore {
    path: PathBuf,
}

impl Keystore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored key, `None` if none has been saved yet.
    pub fn load(&self) -> Result<Option<StoredKey>, KeystoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Persist a freshly issued key, replacing any previous one.
    pub fn save(&self, key: &str) -> Result<StoredKey, KeystoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let stored = StoredKey {
            key: key.to_string(),
            issued_at: Utc::now(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        debug!("API key saved to {}", self.path.display());
        Ok(stored)
    }

    /// Remove the stored key. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, KeystoreError> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Keystore::new(dir.path().join("api_key.json"));

        assert!(store.load().unwrap().is_none());

        let saved = store.save("k-abc123").unwrap();
        assert_eq!(saved.key, "k-abc123");

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.key, "k-abc123");
        assert_eq!(loaded.issued_at, saved.issued_at);
    }

    #[test]
    fn test_save_replaces_previous_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = Keystore::new(dir.path().join("api_key.json"));
        store.save("old").unwrap();
        store.save("new").unwrap();
        assert_eq!(store.load().unwrap().unwrap().key, "new");
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = Keystore::new(dir.path().join("api_key.json"));
        assert!(!store.clear().unwrap());
        store.save("k").unwrap();
        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = Keystore::new(dir.path().join("nested/deeper/api_key.json"));
        store.save("k").unwrap();
        assert!(store.load().unwrap().is_some());
    }
}
