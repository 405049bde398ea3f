//! Config decoding errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a raw config map into a typed variant.
///
/// These are local validation failures and never carry an HTTP status.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// A required key is absent from the raw config
    #[error("{provider_type} config is missing required field `{field}`")]
    MissingField {
        /// Provider type literal of the variant being decoded
        provider_type: String,
        /// Wire name of the missing key
        field: String,
    },

    /// A key is present but holds a value of the wrong JSON type
    #[error("{provider_type} config field `{field}` must be a {expected}")]
    InvalidFieldType {
        /// Provider type literal of the variant being decoded
        provider_type: String,
        /// Wire name of the offending key
        field: String,
        /// Expected JSON type
        expected: String,
    },

    /// The config payload was not a JSON object at all
    #[error("{provider_type} config must be a JSON object")]
    NotAnObject {
        /// Provider type literal of the variant being decoded
        provider_type: String,
    },

    /// A config was attached to an account of a different provider family
    #[error("{config_type} config cannot be used for a {provider_type} account")]
    ProviderMismatch {
        /// Provider type of the account
        provider_type: String,
        /// Provider type literal of the offered config
        config_type: String,
    },
}

impl ConfigError {
    /// Wire name of the field that failed, if the error is field-specific.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field, .. } | Self::InvalidFieldType { field, .. } => Some(field),
            Self::NotAnObject { .. } | Self::ProviderMismatch { .. } => None,
        }
    }
}
