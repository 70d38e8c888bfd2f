//! # Browser `localStorage` store
//!
//! [`LocalStorageStore`] is the [`KeyValueStore`] used on the **web platform**.
//! It writes straight into `window.localStorage`, which is where the session
//! token and user snapshot have always lived for the browser build.
//!
//! Reads and removes degrade silently: no window or storage disabled by the
//! browser behave like an empty store. Writes report the failure, which
//! includes a full quota.

use crate::kv::{KeyValueStore, StoreError};

/// `window.localStorage`-backed KeyValueStore for the web platform.
#[derive(Clone, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorageStore {
    async fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let storage = Self::storage()
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))?;
        storage.set_item(key, &value).map_err(|_| {
            tracing::warn!("localStorage rejected write for key {}", key);
            StoreError::Unavailable(format!("localStorage rejected key {key}"))
        })
    }

    async fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
