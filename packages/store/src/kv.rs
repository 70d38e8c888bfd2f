//! # Key-value store — the durable-storage abstraction
//!
//! SkillSmart keeps very little on the client: an opaque bearer token and a
//! serialized copy of the signed-in user. Both live in a string-keyed,
//! string-valued store that survives restarts. [`KeyValueStore`] is the async
//! interface every backend implements, so the session vault and the HTTP
//! client work unchanged against:
//!
//! | Backend | Module | Used on |
//! |---------|--------|---------|
//! | [`crate::MemoryStore`] | [`crate::memory`] | tests, ephemeral sessions |
//! | [`crate::FileStore`] | [`crate::file_store`] | desktop / mobile |
//! | `LocalStorageStore` | `local` (WASM + `web` feature) | browser |
//!
//! A read that cannot complete is a miss and a failed remove is ignored, but
//! writes report failure: the session vault must know whether the token and
//! user snapshot both landed before it treats them as a pair.

use std::future::Future;

use thiserror::Error;

/// A write the backend could not complete.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Async string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Option<String>>;
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>>;
    fn remove(&self, key: &str) -> impl Future<Output = ()>;
}
