//! Domo governance connector config.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{required_str, ConfigVariant, RawConfig};
use crate::error::ConfigError;

/// API key and customer id for the governance datasets connector.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomoGovernanceConfig {
    /// Governance API key
    pub api_key: String,
    /// Customer (instance) identifier
    pub customer: String,
}

impl DomoGovernanceConfig {
    /// Create a governance config.
    pub fn new(api_key: impl Into<String>, customer: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), customer: customer.into() }
    }
}

impl ConfigVariant for DomoGovernanceConfig {
    const DATA_PROVIDER_TYPE: &'static str = "domo-governance";

    fn decode(raw: &RawConfig) -> Result<Self, ConfigError> {
        let pt = Self::DATA_PROVIDER_TYPE;
        Ok(Self {
            api_key: required_str(raw, pt, "apikey")?,
            customer: required_str(raw, pt, "customer")?,
        })
    }

    fn encode(&self) -> RawConfig {
        let mut raw = RawConfig::new();
        raw.insert("apikey".into(), self.api_key.clone().into());
        raw.insert("customer".into(), self.customer.clone().into());
        raw
    }
}

impl fmt::Debug for DomoGovernanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomoGovernanceConfig")
            .field("api_key", &"<redacted>")
            .field("customer", &self.customer)
            .finish()
    }
}
