//! Client configuration: backend location, table name and store policy.

use crate::platform::get_default_config_path;
use crate::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_URL: &str = "VAULTLINE_URL";
const ENV_ANON_KEY: &str = "VAULTLINE_ANON_KEY";
const ENV_TABLE: &str = "VAULTLINE_TABLE";

/// What `delete` does when the target no longer exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// A missing target is `NotFound`.
    #[default]
    Strict,
    /// A missing target is silently accepted.
    Idempotent,
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public API key sent with every request
    pub anon_key: String,
    pub table: String,
    /// Unset leaves timeouts to the transport.
    pub request_timeout_secs: Option<u64>,
    pub delete_policy: DeletePolicy,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: "password_entries".to_string(),
            request_timeout_secs: None,
            delete_policy: DeletePolicy::Strict,
        }
    }
}

impl BackendConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(VaultError::Config(format!(
                "backend url is not set (config file or {})",
                ENV_URL
            )));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(VaultError::Config(format!(
                "backend url must be http(s): {}",
                self.url
            )));
        }
        if self.anon_key.trim().is_empty() {
            return Err(VaultError::Config(format!(
                "backend api key is not set (config file or {})",
                ENV_ANON_KEY
            )));
        }
        if self.table.trim().is_empty() {
            return Err(VaultError::Config("table name is empty".to_string()));
        }
        Ok(())
    }
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| VaultError::Config(e.to_string()))
    }

    /// Load from `path` (or the default location) when it exists, then apply
    /// environment overrides.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let default_path = get_default_config_path();
        let path = path.unwrap_or(&default_path);

        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides looked up by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            self.backend.url = url;
        }
        if let Some(key) = lookup(ENV_ANON_KEY) {
            self.backend.anon_key = key;
        }
        if let Some(table) = lookup(ENV_TABLE) {
            self.backend.table = table;
        }
    }
}
