//! Account configuration variants.
//!
//! Each connector kind the client understands is a plain value type
//! implementing [`ConfigVariant`]. [`AccountConfig`] is the closed sum over
//! them, and [`CONFIG_REGISTRY`] maps provider type strings onto decoders.

mod abstract_credential;
mod athena;
mod governance;
mod registry;

pub use abstract_credential::AbstractCredentialConfig;
pub use athena::{AthenaHighBandwidthConfig, DEFAULT_ATHENA_REGION};
pub use governance::DomoGovernanceConfig;
pub use registry::{normalize_provider_type, resolve_config, ConfigRegistration, CONFIG_REGISTRY};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Raw key-value mapping exchanged with the providers endpoint.
pub type RawConfig = serde_json::Map<String, Value>;

/// Capability shared by every config variant.
pub trait ConfigVariant: Sized {
    /// Provider type literal sent when creating an account of this kind.
    const DATA_PROVIDER_TYPE: &'static str;

    /// Decode from the raw map returned by the API.
    ///
    /// Fails with [`ConfigError`] when a required key is missing or mistyped.
    fn decode(raw: &RawConfig) -> Result<Self, ConfigError>;

    /// Encode into the raw map accepted by the API.
    fn encode(&self) -> RawConfig;
}

/// A resolved, strongly-typed account configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountConfig {
    /// Amazon Athena high-bandwidth connector
    AthenaHighBandwidth(AthenaHighBandwidthConfig),
    /// Opaque credential blob store
    AbstractCredential(AbstractCredentialConfig),
    /// Domo governance dataset connector
    DomoGovernance(DomoGovernanceConfig),
}

impl AccountConfig {
    /// Provider type literal of the underlying variant.
    pub const fn data_provider_type(&self) -> &'static str {
        match self {
            Self::AthenaHighBandwidth(_) => AthenaHighBandwidthConfig::DATA_PROVIDER_TYPE,
            Self::AbstractCredential(_) => AbstractCredentialConfig::DATA_PROVIDER_TYPE,
            Self::DomoGovernance(_) => DomoGovernanceConfig::DATA_PROVIDER_TYPE,
        }
    }

    /// Encode the variant into its wire map.
    pub fn encode(&self) -> RawConfig {
        match self {
            Self::AthenaHighBandwidth(c) => c.encode(),
            Self::AbstractCredential(c) => c.encode(),
            Self::DomoGovernance(c) => c.encode(),
        }
    }

    /// Check whether this variant's family prefix-matches a provider type.
    pub fn matches_provider_type(&self, data_provider_type: &str) -> bool {
        normalize_provider_type(data_provider_type)
            .starts_with(&normalize_provider_type(self.data_provider_type()))
    }

    /// Decode a raw config body for the given provider type.
    ///
    /// Returns `Ok(None)` when no registered family matches the provider type.
    pub fn decode(data_provider_type: &str, raw: &Value) -> Result<Option<Self>, ConfigError> {
        let Some(registration) = resolve_config(data_provider_type) else {
            return Ok(None);
        };
        let map = raw.as_object().ok_or_else(|| ConfigError::NotAnObject {
            provider_type: registration.data_provider_type.to_string(),
        })?;
        (registration.decode)(map).map(Some)
    }
}

impl From<AthenaHighBandwidthConfig> for AccountConfig {
    fn from(config: AthenaHighBandwidthConfig) -> Self {
        Self::AthenaHighBandwidth(config)
    }
}

impl From<AbstractCredentialConfig> for AccountConfig {
    fn from(config: AbstractCredentialConfig) -> Self {
        Self::AbstractCredential(config)
    }
}

impl From<DomoGovernanceConfig> for AccountConfig {
    fn from(config: DomoGovernanceConfig) -> Self {
        Self::DomoGovernance(config)
    }
}

/// Read a required string field.
pub(crate) fn required_str(
    raw: &RawConfig,
    provider_type: &str,
    field: &str,
) -> Result<String, ConfigError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(ConfigError::MissingField {
            provider_type: provider_type.to_string(),
            field: field.to_string(),
        }),
        Some(value) => as_string(value, provider_type, field),
    }
}

/// Read an optional string field, substituting `default` when absent.
pub(crate) fn optional_str(
    raw: &RawConfig,
    provider_type: &str,
    field: &str,
    default: &str,
) -> Result<String, ConfigError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(value) => as_string(value, provider_type, field),
    }
}

fn as_string(value: &Value, provider_type: &str, field: &str) -> Result<String, ConfigError> {
    value.as_str().map(str::to_string).ok_or_else(|| ConfigError::InvalidFieldType {
        provider_type: provider_type.to_string(),
        field: field.to_string(),
        expected: "string".to_string(),
    })
}
