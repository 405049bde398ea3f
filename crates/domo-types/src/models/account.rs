//! Account model and its wire shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::{AccountConfig, RawConfig};
use crate::error::ConfigError;

/// Lifecycle position of an in-memory account.
///
/// `Deleted` has no runtime representation: deleting consumes the `Account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    /// Not yet created remotely (no id)
    Unbound,
    /// Mirrors a remote account
    Bound,
}

/// One remote account: metadata plus its resolved config, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Remote identifier, absent before creation
    pub id: Option<i64>,
    /// User-facing name
    pub display_name: String,
    /// Connector kind; join key into the config registry
    pub data_provider_type: String,
    /// Creation time reported by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time reported by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    /// Resolved config; absent when unknown or withheld
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AccountConfig>,
}

impl Account {
    /// Create an unbound account for the given config.
    pub fn new(display_name: impl Into<String>, config: AccountConfig) -> Self {
        Self {
            id: None,
            display_name: display_name.into(),
            data_provider_type: config.data_provider_type().to_string(),
            created_at: None,
            modified_at: None,
            config: Some(config),
        }
    }

    /// Build a bound account from a metadata response. Config starts absent.
    pub fn from_metadata(metadata: AccountMetadata) -> Self {
        Self {
            id: Some(metadata.id),
            display_name: metadata.display_name,
            data_provider_type: metadata.data_provider_type,
            created_at: metadata.created_at.and_then(DateTime::from_timestamp_millis),
            modified_at: metadata.modified_at.and_then(DateTime::from_timestamp_millis),
            config: None,
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> AccountState {
        if self.id.is_some() {
            AccountState::Bound
        } else {
            AccountState::Unbound
        }
    }

    /// Attach a config, rejecting one from a different provider family.
    pub fn set_config(&mut self, config: AccountConfig) -> Result<(), ConfigError> {
        if !config.matches_provider_type(&self.data_provider_type) {
            return Err(ConfigError::ProviderMismatch {
                provider_type: self.data_provider_type.clone(),
                config_type: config.data_provider_type().to_string(),
            });
        }
        self.config = Some(config);
        Ok(())
    }
}

/// Metadata as returned by `GET /api/data/v1/accounts/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetadata {
    /// Remote identifier
    pub id: i64,
    /// User-facing name
    pub display_name: String,
    /// Connector kind
    pub data_provider_type: String,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Modification time, epoch milliseconds
    #[serde(default)]
    pub modified_at: Option<i64>,
}

/// Body of `POST /api/data/v1/accounts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountBody {
    /// User-facing name
    pub display_name: String,
    /// Connector kind
    pub data_provider_type: String,
    /// Duplicates the provider type; required by the API
    pub name: String,
    /// Encoded config map
    pub configurations: RawConfig,
}

impl CreateAccountBody {
    /// Wrap an encoded config with its display name and provider type.
    pub fn new(display_name: impl Into<String>, config: &AccountConfig) -> Self {
        let data_provider_type = config.data_provider_type().to_string();
        Self {
            display_name: display_name.into(),
            name: data_provider_type.clone(),
            data_provider_type,
            configurations: config.encode(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::config::{AbstractCredentialConfig, DomoGovernanceConfig};
    use serde_json::json;

    #[test]
    fn test_metadata_parsing_and_timestamps() {
        let metadata: AccountMetadata = serde_json::from_value(json!({
            "id": 5,
            "displayName": "governance",
            "dataProviderType": "domo-governance-d14c2fef",
            "createdAt": 1_672_531_200_000_i64,
            "modifiedAt": null,
            "valid": true
        }))
        .unwrap();

        let account = Account::from_metadata(metadata);

        assert_eq!(account.id, Some(5));
        assert_eq!(account.state(), AccountState::Bound);
        assert_eq!(account.created_at.unwrap().timestamp(), 1_672_531_200);
        assert!(account.modified_at.is_none());
        assert!(account.config.is_none());
    }

    #[test]
    fn test_new_account_is_unbound() {
        let account = Account::new("creds", AbstractCredentialConfig::new("x").into());

        assert_eq!(account.state(), AccountState::Unbound);
        assert_eq!(account.data_provider_type, "abstract-credential-store");
    }

    #[test]
    fn test_set_config_rejects_other_family() {
        let mut account = Account::new("creds", AbstractCredentialConfig::new("x").into());

        let err = account.set_config(DomoGovernanceConfig::new("k", "c").into()).unwrap_err();

        assert!(matches!(err, ConfigError::ProviderMismatch { .. }));
        assert!(matches!(account.config, Some(AccountConfig::AbstractCredential(_))));
    }

    #[test]
    fn test_create_body_shape() {
        let config = AccountConfig::from(DomoGovernanceConfig::new("key", "acme"));

        let body = serde_json::to_value(CreateAccountBody::new("gov", &config)).unwrap();

        assert_eq!(
            body,
            json!({
                "displayName": "gov",
                "dataProviderType": "domo-governance",
                "name": "domo-governance",
                "configurations": {"apikey": "key", "customer": "acme"}
            })
        );
    }
}
