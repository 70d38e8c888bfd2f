//! # Client configuration — `skillsmart.toml`
//!
//! Defines the TOML configuration file read by the SkillSmart client at
//! startup (filename: [`SkillSmartConfig::filename`] = `"skillsmart.toml"`).
//! It names the REST endpoint the data source talks to and the durable-storage
//! keys the session snapshot is kept under.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000/api"
//! request_timeout_secs = 0       # 0 disables the client-side timeout
//!
//! [storage]
//! token_key = "authToken"
//! user_key = "user"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`SkillSmartConfig`] | Top-level config. Provides builder helpers (`new`, `with_timeout`), TOML (de)serialisation, and the canonical filename. |
//! | [`ApiConfig`] | REST endpoint base URL and optional request timeout. |
//! | [`StorageConfig`] | Keys for the bearer token and the user snapshot. |
//!
//! Every struct implements `Default` with production values, so a missing or
//! empty config file is equivalent to the default configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TOKEN_KEY: &str = "authToken";
pub const DEFAULT_USER_KEY: &str = "user";

/// Top-level configuration stored in `skillsmart.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSmartConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// REST endpoint configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. 0 means requests may wait forever.
    #[serde(default)]
    pub request_timeout_secs: u64,
}

/// Durable-storage key names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_token_key")]
    pub token_key: String,
    #[serde(default = "default_user_key")]
    pub user_key: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

fn default_user_key() -> String {
    DEFAULT_USER_KEY.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: 0,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_key: default_token_key(),
            user_key: default_user_key(),
        }
    }
}

impl SkillSmartConfig {
    /// Create a config pointing at the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                ..ApiConfig::default()
            },
            storage: StorageConfig::default(),
        }
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.api.request_timeout_secs = secs;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "skillsmart.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
