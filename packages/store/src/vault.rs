//! # Session vault — the persisted token + user pair
//!
//! The client persists exactly two values: an opaque bearer token and a JSON
//! snapshot of the signed-in user. [`SessionVault`] owns both keys and keeps
//! them paired: they are written together by [`save`](SessionVault::save) and
//! removed together by [`clear`](SessionVault::clear). The only single-key
//! write, [`save_user`](SessionVault::save_user), refuses to run when no token
//! is stored, so a user snapshot never exists without its token.
//!
//! The vault is generic over the user type; it only needs `serde`. Reading
//! returns a [`VaultRead`] that separates "nothing stored" from "stored but
//! unreadable", because the two are recovered differently by the session
//! store (the latter also revokes the session through the auth collaborator).

use serde::de::DeserializeOwned;
use serde::Serialize;

use thiserror::Error;

use crate::config::StorageConfig;
use crate::kv::{KeyValueStore, StoreError};

/// Outcome of reading the persisted session.
#[derive(Debug)]
pub enum VaultRead<U> {
    /// Token or user snapshot missing (or empty).
    Empty,
    /// Both values present and the snapshot parsed.
    Restored { token: String, user: U },
    /// Both values present but the snapshot could not be parsed.
    Corrupt(serde_json::Error),
}

/// Failure to persist the session.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Failed to serialize user snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Paired storage of the bearer token and the user snapshot.
#[derive(Clone, Debug)]
pub struct SessionVault<S> {
    store: S,
    token_key: String,
    user_key: String,
}

impl<S: KeyValueStore> SessionVault<S> {
    /// Vault using the default `authToken` / `user` keys.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, &StorageConfig::default())
    }

    /// Vault using the key names from configuration.
    pub fn with_keys(store: S, keys: &StorageConfig) -> Self {
        Self {
            store,
            token_key: keys.token_key.clone(),
            user_key: keys.user_key.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored bearer token, if any.
    pub async fn token(&self) -> Option<String> {
        self.store
            .get(&self.token_key)
            .await
            .filter(|t| !t.is_empty())
    }

    /// Read and parse the persisted session.
    pub async fn read<U: DeserializeOwned>(&self) -> VaultRead<U> {
        let Some(token) = self.token().await else {
            return VaultRead::Empty;
        };
        let Some(raw_user) = self
            .store
            .get(&self.user_key)
            .await
            .filter(|u| !u.is_empty())
        else {
            return VaultRead::Empty;
        };

        match serde_json::from_str(&raw_user) {
            Ok(user) => VaultRead::Restored { token, user },
            Err(e) => VaultRead::Corrupt(e),
        }
    }

    /// Persist a token and its user snapshot together.
    ///
    /// The snapshot is written first. If either write fails both keys are
    /// removed, so a token is never left behind without its user.
    pub async fn save<U: Serialize>(&self, token: &str, user: &U) -> Result<(), VaultError> {
        let raw_user = serde_json::to_string(user)?;
        let written = match self.store.set(&self.user_key, raw_user).await {
            Ok(()) => self.store.set(&self.token_key, token.to_string()).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            tracing::warn!("Session write failed, clearing partial session: {}", e);
            self.clear().await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Replace the user snapshot next to the existing token.
    ///
    /// Returns `Ok(false)` without writing when no token is stored. A failed
    /// write leaves the previous snapshot in place.
    pub async fn save_user<U: Serialize>(&self, user: &U) -> Result<bool, VaultError> {
        let raw_user = serde_json::to_string(user)?;
        if self.token().await.is_none() {
            return Ok(false);
        }
        self.store.set(&self.user_key, raw_user).await?;
        Ok(true)
    }

    /// Remove both keys.
    pub async fn clear(&self) {
        self.store.remove(&self.token_key).await;
        self.store.remove(&self.user_key).await;
    }
}
