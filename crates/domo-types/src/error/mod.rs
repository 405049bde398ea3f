//! Typed error definitions for the Domo accounts client.
//!
//! This module provides a structured error taxonomy. All errors are designed to be:
//!
//! - **Serializable** for reporting via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants
//! - **Composable** via thiserror derive macros

mod account;
mod config;

pub use account::AccountError;
pub use config::ConfigError;

/// Standard Result type using AccountError.
pub type Result<T> = std::result::Result<T, AccountError>;
