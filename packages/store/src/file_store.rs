//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists each key
//! as one small file. It is used on desktop and mobile platforms to keep the
//! session snapshot across app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── authToken          # bearer token
//! └── user               # JSON-serialized user snapshot
//! ```
//!
//! ## Platform data directories
//!
//! Use `dirs::data_dir()` to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/skillsmart/` |
//! | Linux | `~/.local/share/skillsmart/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\skillsmart\` |

use std::path::{Path, PathBuf};

use crate::kv::{KeyValueStore, StoreError};

/// Filesystem-backed KeyValueStore for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let io = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.base).map_err(|e| {
            tracing::warn!("Failed to create store directory {}: {}", self.base.display(), e);
            io(e)
        })?;
        std::fs::write(self.key_path(key), value).map_err(|e| {
            tracing::warn!("Failed to write key {}: {}", key, e);
            io(e)
        })
    }

    async fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.key_path(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("skillsmart");

        let store = FileStore::new(base.clone());
        store.set("authToken", "token-123".to_string()).await.unwrap();

        // Re-open from same directory
        let reopened = FileStore::new(base);
        assert_eq!(reopened.get("authToken").await.as_deref(), Some("token-123"));

        reopened.remove("authToken").await;
        assert!(store.get("authToken").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_directory_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("never-created"));

        assert!(store.get("user").await.is_none());
        // Removing an absent key is a no-op
        store.remove("user").await;
    }

    #[tokio::test]
    async fn test_failed_write_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        // A directory where the key file should go makes the write fail
        std::fs::create_dir(dir.path().join("user")).unwrap();

        let err = store.set("user", "{}".to_string()).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { ref key, .. } if key == "user"));
    }
}
