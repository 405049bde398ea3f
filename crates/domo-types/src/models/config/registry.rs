//! Provider type → config variant resolution.

use super::{
    AbstractCredentialConfig, AccountConfig, AthenaHighBandwidthConfig, ConfigVariant,
    DomoGovernanceConfig, RawConfig,
};
use crate::error::ConfigError;

/// One entry in the registration table.
#[derive(Debug, Clone, Copy)]
pub struct ConfigRegistration {
    /// Underscore-normalized family name matched as a prefix
    pub family: &'static str,
    /// Provider type literal of the variant
    pub data_provider_type: &'static str,
    /// Decoder producing the variant
    pub decode: fn(&RawConfig) -> Result<AccountConfig, ConfigError>,
}

/// Known config families, scanned in order.
///
/// Remote provider types carry trailing qualifiers (a UUID, a version
/// suffix), so matching is by prefix and the first entry that matches wins.
/// Keep longer, more specific families ahead of any family that is a prefix
/// of them.
pub static CONFIG_REGISTRY: &[ConfigRegistration] = &[
    ConfigRegistration {
        family: "amazon_athena_high_bandwidth",
        data_provider_type: AthenaHighBandwidthConfig::DATA_PROVIDER_TYPE,
        decode: decode_variant::<AthenaHighBandwidthConfig>,
    },
    ConfigRegistration {
        family: "abstract_credential_store",
        data_provider_type: AbstractCredentialConfig::DATA_PROVIDER_TYPE,
        decode: decode_variant::<AbstractCredentialConfig>,
    },
    ConfigRegistration {
        family: "domo_governance",
        data_provider_type: DomoGovernanceConfig::DATA_PROVIDER_TYPE,
        decode: decode_variant::<DomoGovernanceConfig>,
    },
];

fn decode_variant<V>(raw: &RawConfig) -> Result<AccountConfig, ConfigError>
where
    V: ConfigVariant + Into<AccountConfig>,
{
    V::decode(raw).map(Into::into)
}

/// Replace hyphens with underscores.
pub fn normalize_provider_type(data_provider_type: &str) -> String {
    data_provider_type.replace('-', "_")
}

/// Find the first registered family the provider type starts with.
pub fn resolve_config(data_provider_type: &str) -> Option<&'static ConfigRegistration> {
    let normalized = normalize_provider_type(data_provider_type);
    CONFIG_REGISTRY.iter().find(|entry| normalized.starts_with(entry.family))
}
