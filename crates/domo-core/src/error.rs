//! Unified error types for Domo Core.

use domo_types::{AccountError, ConfigError};
use serde::Serialize;
use thiserror::Error;

use crate::transport::TransportError;

/// Main error type for all client operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Account lifecycle failure (remote rejection or malformed config).
    #[error(transparent)]
    Account(#[from] AccountError),

    /// The request never produced an HTTP status (connect, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Auth header could not be produced.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Client configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Borrow the account error, if this is one.
    pub const fn as_account_error(&self) -> Option<&AccountError> {
        match self {
            Self::Account(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status attached to the failure, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Account(err) => err.status(),
            _ => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Account(AccountError::MalformedConfig(err))
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for client operations.
pub type AppResult<T> = Result<T, AppError>;
