//! Client configuration loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for one Domo instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Instance name, e.g. `acme` for `acme.domo.com`
    pub instance: String,
    /// Developer access token
    pub access_token: String,
    /// Override for `https://{instance}.domo.com`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn new(instance: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            access_token: access_token.into(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `DOMO_INSTANCE`, `DOMO_ACCESS_TOKEN`, and optionally
    /// `DOMO_BASE_URL` / `DOMO_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let instance = lookup("DOMO_INSTANCE")
            .ok_or_else(|| AppError::Config("DOMO_INSTANCE is not set".to_string()))?;
        let access_token = lookup("DOMO_ACCESS_TOKEN")
            .ok_or_else(|| AppError::Config("DOMO_ACCESS_TOKEN is not set".to_string()))?;
        let timeout_secs = match lookup("DOMO_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("DOMO_TIMEOUT_SECS is invalid: {e}")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config =
            Self { instance, access_token, base_url: lookup("DOMO_BASE_URL"), timeout_secs };
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.instance.trim().is_empty() {
            return Err(AppError::Config("instance must not be empty".to_string()));
        }
        if self.access_token.trim().is_empty() {
            return Err(AppError::Config("access token must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config("timeout_secs must be positive".to_string()));
        }
        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url)
                .map_err(|e| AppError::Config(format!("invalid base_url {base_url}: {e}")))?;
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("instance", &self.instance)
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
