//! # Domo Types
//!
//! Core types, models, and error definitions for the Domo accounts client.
//!
//! This crate provides the foundational type system:
//!
//! - **`error`** - Typed error taxonomy for account lifecycle and config decoding
//! - **`models`** - Domain models (Account, config variants, log entries)
//!
//! ## Architecture Role
//!
//! `domo-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!         domo-types (this crate)
//!                │
//!                ▼
//!           domo-core
//!   (transport, orchestration, logger)
//! ```
//!
//! Nothing in here performs I/O. Config variants are plain values with a pair
//! of pure conversions to and from the raw key-value map the remote API speaks.

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{AccountError, ConfigError, Result};

// Re-export core model types
pub use models::{
    resolve_config, AbstractCredentialConfig, Account, AccountConfig, AccountMetadata,
    AccountState, AthenaHighBandwidthConfig, ConfigRegistration, ConfigVariant,
    CreateAccountBody, DomoGovernanceConfig, LogEntry, RawConfig, Severity, CONFIG_REGISTRY,
};
