//! Account lifecycle errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ConfigError;

/// Errors raised by account retrieval and lifecycle operations.
///
/// Every remote variant carries the HTTP status that triggered it (if any),
/// the Domo instance the request targeted, and a human readable message.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum AccountError {
    /// Account metadata could not be retrieved (bad id, no access, ...)
    #[error("{message} (status {}, instance {instance})", fmt_status(*status))]
    InvalidAccount {
        /// HTTP status returned by the API
        status: Option<u16>,
        /// Domo instance the request targeted
        instance: String,
        /// Description of the failure
        message: String,
    },

    /// No usable configuration was available for an update
    #[error("{message} (status {}, instance {instance})", fmt_status(*status))]
    InvalidAccountConfig {
        /// HTTP status returned by the API, absent for local checks
        status: Option<u16>,
        /// Domo instance the account lives on
        instance: String,
        /// Description of the failure
        message: String,
    },

    /// Writing the account config or name was rejected
    #[error("{message} (status {}, instance {instance})", fmt_status(*status))]
    UpdateAccountConfig {
        /// HTTP status returned by the API
        status: Option<u16>,
        /// Domo instance the request targeted
        instance: String,
        /// Description of the failure
        message: String,
    },

    /// Deleting the account was rejected
    #[error("{message} (status {}, instance {instance})", fmt_status(*status))]
    DeleteAccount {
        /// HTTP status returned by the API
        status: Option<u16>,
        /// Domo instance the request targeted
        instance: String,
        /// Description of the failure
        message: String,
    },

    /// A config payload could not be decoded into its variant
    #[error("Malformed account config: {0}")]
    MalformedConfig(#[from] ConfigError),
}

fn fmt_status(status: Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl AccountError {
    /// Create an `InvalidAccount` error.
    pub fn invalid_account(
        status: Option<u16>,
        instance: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAccount { status, instance: instance.into(), message: message.into() }
    }

    /// Create an `InvalidAccountConfig` error.
    pub fn invalid_config(
        status: Option<u16>,
        instance: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAccountConfig { status, instance: instance.into(), message: message.into() }
    }

    /// Create an `UpdateAccountConfig` error.
    pub fn update_failed(
        status: Option<u16>,
        instance: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UpdateAccountConfig { status, instance: instance.into(), message: message.into() }
    }

    /// Create a `DeleteAccount` error.
    pub fn delete_failed(
        status: Option<u16>,
        instance: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DeleteAccount { status, instance: instance.into(), message: message.into() }
    }

    /// HTTP status attached to the error, if the failure came from the API.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidAccount { status, .. }
            | Self::InvalidAccountConfig { status, .. }
            | Self::UpdateAccountConfig { status, .. }
            | Self::DeleteAccount { status, .. } => *status,
            Self::MalformedConfig(_) => None,
        }
    }

    /// Domo instance attached to the error.
    pub fn instance(&self) -> Option<&str> {
        match self {
            Self::InvalidAccount { instance, .. }
            | Self::InvalidAccountConfig { instance, .. }
            | Self::UpdateAccountConfig { instance, .. }
            | Self::DeleteAccount { instance, .. } => Some(instance),
            Self::MalformedConfig(_) => None,
        }
    }

    /// Check if the error originated from local validation rather than the API.
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MalformedConfig(_) | Self::InvalidAccountConfig { status: None, .. }
        )
    }
}
