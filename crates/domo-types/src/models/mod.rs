//! Core domain models for the Domo accounts client.

mod account;
pub mod config;
mod log;

// Re-export all models
pub use account::{Account, AccountMetadata, AccountState, CreateAccountBody};
pub use config::{
    normalize_provider_type, resolve_config, AbstractCredentialConfig, AccountConfig,
    AthenaHighBandwidthConfig, ConfigRegistration, ConfigVariant, DomoGovernanceConfig, RawConfig,
    CONFIG_REGISTRY,
};
pub use log::{LogEntry, Severity};
