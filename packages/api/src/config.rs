//! Loading `skillsmart.toml` with environment overrides.
//!
//! The file is optional: a missing file yields the default configuration.
//! After the file is read, `SKILLSMART_API_URL` (from the process environment
//! or a `.env` file picked up through `dotenvy`) replaces the API base URL.

use std::path::{Path, PathBuf};

use store::SkillSmartConfig;
use thiserror::Error;

/// Environment variable overriding [`store::ApiConfig::base_url`].
pub const API_URL_VAR: &str = "SKILLSMART_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read the config file (if given) and apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<SkillSmartConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let config = match path {
        Some(path) => read_config(path)?,
        None => SkillSmartConfig::default(),
    };
    Ok(with_env_overrides(config, |name| std::env::var(name).ok()))
}

/// Parse a config file. A missing file is the default configuration.
pub fn read_config(path: &Path) -> Result<SkillSmartConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(SkillSmartConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SkillSmartConfig::from_toml(&text)?)
}

/// Apply overrides looked up by `lookup`. Blank values are ignored.
pub fn with_env_overrides(
    mut config: SkillSmartConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> SkillSmartConfig {
    if let Some(url) = lookup(API_URL_VAR).filter(|u| !u.trim().is_empty()) {
        tracing::debug!("API base URL overridden by {}", API_URL_VAR);
        config.api.base_url = url.trim().to_string();
    }
    config
}
