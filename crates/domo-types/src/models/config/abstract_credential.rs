//! Abstract credential store config.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{required_str, ConfigVariant, RawConfig};
use crate::error::ConfigError;

/// Opaque credential blob.
///
/// The API stores the payload as a string even when it holds JSON, so it is
/// kept verbatim rather than parsed.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbstractCredentialConfig {
    /// Credential payload as stored remotely
    pub credentials: String,
}

impl AbstractCredentialConfig {
    /// Wrap a credential payload.
    pub fn new(credentials: impl Into<String>) -> Self {
        Self { credentials: credentials.into() }
    }
}

impl ConfigVariant for AbstractCredentialConfig {
    const DATA_PROVIDER_TYPE: &'static str = "abstract-credential-store";

    fn decode(raw: &RawConfig) -> Result<Self, ConfigError> {
        Ok(Self { credentials: required_str(raw, Self::DATA_PROVIDER_TYPE, "credentials")? })
    }

    fn encode(&self) -> RawConfig {
        let mut raw = RawConfig::new();
        raw.insert("credentials".into(), self.credentials.clone().into());
        raw
    }
}

impl fmt::Debug for AbstractCredentialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbstractCredentialConfig").field("credentials", &"<redacted>").finish()
    }
}
