//! Account lifecycle orchestration.
//!
//! [`AccountManager`] sequences the route calls behind each operation. The
//! remote API is the single source of truth: every successful write is
//! followed by a fresh read, and write responses are only mined for the
//! minimum needed to chain that read (the new id after a create).
//!
//! Metadata is required, config is best effort: a rejected config read in
//! [`AccountManager::get_from_id`] is logged as a warning and the account is
//! returned without config.

pub mod routes;

use domo_types::{
    Account, AccountConfig, AccountError, AccountMetadata, CreateAccountBody, Severity,
};
use serde_json::Value;
use std::sync::Arc;

use crate::auth::{AuthProvider, TokenAuth};
use crate::error::AppResult;
use crate::modules::config::ClientConfig;
use crate::modules::logger::{LogContext, Logger};
use crate::transport::{HttpTransport, Transport};

/// App name of the fallback logger used when a call supplies none.
pub const DEFAULT_LOGGER_APP: &str = "default_domo_account";

/// Runs account operations against one instance.
pub struct AccountManager {
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthProvider>,
    default_logger: Arc<Logger>,
}

impl AccountManager {
    pub fn new(transport: Arc<dyn Transport>, auth: Arc<dyn AuthProvider>) -> Self {
        let default_logger = Logger::new(DEFAULT_LOGGER_APP).without_stack_capture();
        Self { transport, auth, default_logger: Arc::new(default_logger) }
    }

    /// Wire an [`HttpTransport`] and [`TokenAuth`] from client configuration.
    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout_secs)?;
        let mut auth = TokenAuth::new(config.instance.clone(), config.access_token.clone());
        if let Some(base_url) = &config.base_url {
            auth = auth.with_base_url(base_url.clone());
        }
        Ok(Self::new(Arc::new(transport), Arc::new(auth)))
    }

    /// Replace the fallback logger.
    #[must_use]
    pub fn with_default_logger(mut self, logger: Arc<Logger>) -> Self {
        self.default_logger = logger;
        self
    }

    pub fn default_logger(&self) -> &Arc<Logger> {
        &self.default_logger
    }

    pub fn instance(&self) -> &str {
        self.auth.instance_id()
    }

    fn logger<'a>(&'a self, logger: Option<&'a Logger>) -> &'a Logger {
        logger.unwrap_or(&*self.default_logger)
    }

    fn require_id(&self, account: &Account) -> Result<i64, AccountError> {
        account.id.ok_or_else(|| {
            AccountError::invalid_account(
                None,
                self.instance(),
                format!("account '{}' has not been created yet", account.display_name),
            )
        })
    }

    /// Fetch metadata, then try to fetch and resolve config.
    ///
    /// Fails with `InvalidAccount` when metadata is rejected. A rejected
    /// config read leaves `config` absent, as does a provider type with no
    /// registered variant.
    pub async fn get_from_id(&self, account_id: i64, logger: Option<&Logger>) -> AppResult<Account> {
        let log = self.logger(logger);
        let instance = self.instance();

        let res =
            routes::get_account_from_id(self.transport.as_ref(), self.auth.as_ref(), account_id)
                .await?;
        let message = format!("metadata retrieved for account {account_id} from {instance}");

        if !res.is_success {
            let message = format!("FAILURE - no {message}");
            log.log_with(Severity::Error, &message, LogContext::entity(account_id, instance));
            return Err(AccountError::invalid_account(Some(res.status), instance, message).into());
        }

        let metadata: AccountMetadata = serde_json::from_value(res.response)?;
        let mut account = Account::from_metadata(metadata);
        log.log_with(
            Severity::Info,
            format!("SUCCESS - {message}"),
            LogContext::entity(account_id, instance),
        );

        let config_res = routes::get_account_config(
            self.transport.as_ref(),
            self.auth.as_ref(),
            account_id,
            &account.data_provider_type,
        )
        .await?;
        let message = format!(
            "config retrieved for provider {} on account {account_id} in {instance}",
            account.data_provider_type
        );

        if !config_res.is_success {
            log.log_with(
                Severity::Warning,
                format!("WARNING - no {message} (status {})", config_res.status),
                LogContext::entity(account_id, instance),
            );
            return Ok(account);
        }

        log.log_with(
            Severity::Info,
            format!("SUCCESS - {message}"),
            LogContext::entity(account_id, instance),
        );

        account.config = AccountConfig::decode(&account.data_provider_type, &config_res.response)?;
        Ok(account)
    }

    /// Re-read a bound account.
    pub async fn refresh(&self, account: &Account, logger: Option<&Logger>) -> AppResult<Account> {
        let account_id = self.require_id(account)?;
        self.get_from_id(account_id, logger).await
    }

    /// List every readable account. Metadata only; config is not fetched.
    pub async fn list_accounts(&self, logger: Option<&Logger>) -> AppResult<Vec<Account>> {
        let log = self.logger(logger);
        let instance = self.instance();

        let res = routes::get_accounts(self.transport.as_ref(), self.auth.as_ref()).await?;
        if !res.is_success {
            let message = format!("FAILURE - could not list accounts in {instance}");
            log.log_with(Severity::Error, &message, LogContext::default());
            return Err(AccountError::invalid_account(Some(res.status), instance, message).into());
        }

        let metadata: Vec<AccountMetadata> = serde_json::from_value(res.response)?;
        log.log_info(format!("SUCCESS - listed {} accounts in {instance}", metadata.len()));
        Ok(metadata.into_iter().map(Account::from_metadata).collect())
    }

    /// Create an account and return it as re-read from the API.
    ///
    /// A non-200 create is reported as `Ok(None)` rather than an error.
    pub async fn create_account(
        &self,
        display_name: &str,
        config: &AccountConfig,
        logger: Option<&Logger>,
    ) -> AppResult<Option<Account>> {
        let log = self.logger(logger);
        let instance = self.instance();

        let body = CreateAccountBody::new(display_name, config);
        let res =
            routes::create_account_route(self.transport.as_ref(), self.auth.as_ref(), &body).await?;

        if res.status != 200 {
            log.log_warning(format!(
                "FAILURE - create {} account '{display_name}' in {instance} (status {})",
                body.data_provider_type, res.status
            ));
            return Ok(None);
        }

        let account_id = res.response.get("id").and_then(Value::as_i64).ok_or_else(|| {
            AccountError::invalid_account(
                Some(res.status),
                instance,
                format!("create response for '{display_name}' carried no account id"),
            )
        })?;
        log.log_with(
            Severity::Info,
            format!("SUCCESS - created account '{display_name}' in {instance}"),
            LogContext::entity(account_id, instance),
        );

        self.get_from_id(account_id, logger).await.map(Some)
    }

    /// Write config (the explicit one, else the account's own) and re-read.
    pub async fn update_config(
        &self,
        account: &Account,
        new_config: Option<&AccountConfig>,
        logger: Option<&Logger>,
    ) -> AppResult<Account> {
        let log = self.logger(logger);
        let instance = self.instance();

        let Some(config) = new_config.or(account.config.as_ref()) else {
            return Err(AccountError::invalid_config(
                None,
                instance,
                format!("account '{}' has no config to update", account.display_name),
            )
            .into());
        };
        if !config.matches_provider_type(&account.data_provider_type) {
            return Err(AccountError::invalid_config(
                None,
                instance,
                format!(
                    "{} config cannot be written to a {} account",
                    config.data_provider_type(),
                    account.data_provider_type
                ),
            )
            .into());
        }
        let account_id = self.require_id(account)?;

        let res = routes::update_account_config(
            self.transport.as_ref(),
            self.auth.as_ref(),
            account_id,
            &account.data_provider_type,
            &config.encode(),
        )
        .await?;
        let message = format!("account config updated for account {account_id} in {instance}");

        if !res.is_success {
            let message = format!("FAILURE - no {message}");
            log.log_with(Severity::Error, &message, LogContext::entity(account_id, instance));
            return Err(AccountError::update_failed(Some(res.status), instance, message).into());
        }

        log.log_with(
            Severity::Info,
            format!("SUCCESS - {message}"),
            LogContext::entity(account_id, instance),
        );
        self.get_from_id(account_id, logger).await
    }

    /// Rename (or re-send the current name) and re-read.
    ///
    /// Failures reuse `UpdateAccountConfig`; there is no dedicated name error.
    pub async fn update_name(
        &self,
        account: &Account,
        new_name: Option<&str>,
        logger: Option<&Logger>,
    ) -> AppResult<Account> {
        let log = self.logger(logger);
        let instance = self.instance();
        let account_id = self.require_id(account)?;
        let name = new_name.unwrap_or(&account.display_name);

        let res = routes::update_account_name(
            self.transport.as_ref(),
            self.auth.as_ref(),
            account_id,
            name,
        )
        .await?;
        let message = format!("update name for account {account_id} in {instance}");

        if !res.is_success {
            let message = format!("FAILURE - {message}");
            log.log_with(Severity::Error, &message, LogContext::entity(account_id, instance));
            return Err(AccountError::update_failed(Some(res.status), instance, message).into());
        }

        log.log_with(
            Severity::Info,
            format!("SUCCESS - {message}"),
            LogContext::entity(account_id, instance),
        );
        self.get_from_id(account_id, logger).await
    }

    /// Delete by id. Only logs when a logger is supplied.
    pub async fn delete(&self, account_id: i64, logger: Option<&Logger>) -> AppResult<bool> {
        let instance = self.instance();

        let res =
            routes::delete_account_route(self.transport.as_ref(), self.auth.as_ref(), account_id)
                .await?;
        let message = format!("delete account {account_id} from {instance}");

        if res.status != 200 {
            let message = format!("FAILURE - {message}");
            if let Some(log) = logger {
                log.log_with(Severity::Error, &message, LogContext::entity(account_id, instance));
            }
            return Err(AccountError::delete_failed(Some(res.status), instance, message).into());
        }

        if let Some(log) = logger {
            log.log_with(
                Severity::Info,
                format!("SUCCESS - {message}"),
                LogContext::entity(account_id, instance),
            );
        }
        Ok(true)
    }

    /// Delete a bound account, consuming it.
    pub async fn delete_account(&self, account: Account, logger: Option<&Logger>) -> AppResult<bool> {
        let account_id = self.require_id(&account)?;
        self.delete(account_id, logger).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::transport::mock::ScriptedTransport;
    use crate::transport::{HttpMethod, RequestBody, TransportError};
    use domo_types::{AbstractCredentialConfig, AccountState, DomoGovernanceConfig, LogEntry};
    use serde_json::json;

    const GOVERNANCE_TYPE: &str = "domo-governance-d14c2fef-49a8-4898-8ddd-f64998005600";

    fn metadata(id: i64, name: &str, provider: &str) -> Value {
        json!({
            "id": id,
            "displayName": name,
            "dataProviderType": provider,
            "createdAt": 1_700_000_000_000_i64,
            "modifiedAt": 1_700_000_500_000_i64
        })
    }

    fn manager(transport: &Arc<ScriptedTransport>) -> AccountManager {
        let transport: Arc<dyn Transport> = transport.clone();
        AccountManager::new(transport, Arc::new(TokenAuth::new("acme", "tok")))
    }

    fn severities(entries: &[LogEntry]) -> Vec<Severity> {
        entries.iter().map(|e| e.severity).collect()
    }

    #[tokio::test]
    async fn test_get_from_id_resolves_config() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, metadata(5, "governance", GOVERNANCE_TYPE))
                .respond(200, json!({"apikey": "key", "customer": "acme"})),
        );
        let logger = Logger::new("test");

        let account = manager(&transport).get_from_id(5, Some(&logger)).await.unwrap();

        assert_eq!(account.id, Some(5));
        assert_eq!(account.config, Some(DomoGovernanceConfig::new("key", "acme").into()));
        assert_eq!(severities(&logger.entries()), vec![Severity::Info, Severity::Info]);
        assert_eq!(logger.entries()[0].entity_id.as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_metadata_404_is_invalid_account() {
        let transport = Arc::new(ScriptedTransport::new().respond(404, json!("Not Found")));
        let logger = Logger::new("test");

        let err = manager(&transport).get_from_id(5, Some(&logger)).await.unwrap_err();

        match err {
            AppError::Account(AccountError::InvalidAccount { status, instance, .. }) => {
                assert_eq!(status, Some(404));
                assert_eq!(instance, "acme");
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.requests().len(), 1, "config must not be fetched");
        assert_eq!(severities(&logger.entries()), vec![Severity::Error]);
    }

    #[tokio::test]
    async fn test_config_403_is_best_effort() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, metadata(5, "governance", GOVERNANCE_TYPE))
                .respond(403, json!({"status": 403})),
        );
        let logger = Logger::new("test");

        let account = manager(&transport).get_from_id(5, Some(&logger)).await.unwrap();

        assert_eq!(account.state(), AccountState::Bound);
        assert!(account.config.is_none());
        assert_eq!(severities(&logger.entries()), vec![Severity::Info, Severity::Warning]);
    }

    #[tokio::test]
    async fn test_unregistered_provider_has_no_config() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, metadata(8, "other", "some-unregistered-type"))
                .respond(200, json!({"whatever": "x"})),
        );

        let account = manager(&transport).get_from_id(8, None).await.unwrap();

        assert!(account.config.is_none());
    }

    #[tokio::test]
    async fn test_config_network_failure_propagates() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, metadata(5, "governance", GOVERNANCE_TYPE))
                .fail(TransportError::Builder("connection reset".to_string())),
        );
        let logger = Logger::new("test");

        let err = manager(&transport).get_from_id(5, Some(&logger)).await.unwrap_err();

        assert!(matches!(err, AppError::Transport(_)), "unexpected error: {err:?}");
        assert_eq!(err.status(), None);
        assert_eq!(severities(&logger.entries()), vec![Severity::Info]);
    }

    #[tokio::test]
    async fn test_malformed_config_body() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, metadata(5, "governance", GOVERNANCE_TYPE))
                .respond(200, json!({"apikey": "key"})),
        );

        let err = manager(&transport).get_from_id(5, None).await.unwrap_err();

        assert!(matches!(err.as_account_error(), Some(AccountError::MalformedConfig(_))));
    }

    #[tokio::test]
    async fn test_fallback_logger_used_without_caller_logger() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, metadata(5, "governance", GOVERNANCE_TYPE))
                .respond(403, Value::Null),
        );
        let manager = manager(&transport);

        manager.get_from_id(5, None).await.unwrap();

        assert_eq!(manager.default_logger().app_name(), DEFAULT_LOGGER_APP);
        assert_eq!(manager.default_logger().len(), 2);
        assert!(manager.default_logger().root_marker().is_none());
    }

    #[tokio::test]
    async fn test_update_name_refetches() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, Value::Null)
                .respond(200, metadata(5, "new-label", GOVERNANCE_TYPE))
                .respond(200, json!({"apikey": "key", "customer": "acme"})),
        );
        let account = Account {
            id: Some(5),
            display_name: "old-label".to_string(),
            data_provider_type: GOVERNANCE_TYPE.to_string(),
            created_at: None,
            modified_at: None,
            config: None,
        };

        let updated =
            manager(&transport).update_name(&account, Some("new-label"), None).await.unwrap();

        assert_eq!(updated.display_name, "new-label");
        let requests = transport.requests();
        let methods: Vec<_> = requests.iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![HttpMethod::Put, HttpMethod::Get, HttpMethod::Get]);
        assert_eq!(requests[0].body, RequestBody::Text("new-label".to_string()));
    }

    #[tokio::test]
    async fn test_update_name_failure() {
        let transport = Arc::new(ScriptedTransport::new().respond(500, Value::Null));
        let account = Account::new("x", AbstractCredentialConfig::new("c").into());
        let account = Account { id: Some(3), ..account };

        let err = manager(&transport).update_name(&account, None, None).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Account(AccountError::UpdateAccountConfig { status: Some(500), .. })
        ));
        assert_eq!(transport.requests()[0].body, RequestBody::Text("x".to_string()));
    }

    #[tokio::test]
    async fn test_update_config_without_any_config() {
        let transport = Arc::new(ScriptedTransport::new());
        let account = Account {
            id: Some(5),
            display_name: "gov".to_string(),
            data_provider_type: GOVERNANCE_TYPE.to_string(),
            created_at: None,
            modified_at: None,
            config: None,
        };

        let err = manager(&transport).update_config(&account, None, None).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Account(AccountError::InvalidAccountConfig { status: None, .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_config_prefers_explicit_config() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, Value::Null)
                .respond(200, metadata(5, "gov", GOVERNANCE_TYPE))
                .respond(200, json!({"apikey": "new", "customer": "acme"})),
        );
        let mut account = Account::from_metadata(
            serde_json::from_value(metadata(5, "gov", GOVERNANCE_TYPE)).unwrap(),
        );
        account.config = Some(DomoGovernanceConfig::new("old", "acme").into());
        let explicit = AccountConfig::from(DomoGovernanceConfig::new("new", "acme"));

        let updated =
            manager(&transport).update_config(&account, Some(&explicit), None).await.unwrap();

        assert_eq!(updated.config, Some(explicit));
        assert_eq!(
            transport.requests()[0].body,
            RequestBody::Json(json!({"apikey": "new", "customer": "acme"}))
        );
    }

    #[tokio::test]
    async fn test_update_config_remote_failure() {
        let transport = Arc::new(ScriptedTransport::new().respond(400, Value::Null));
        let account = Account {
            id: Some(9),
            ..Account::new("creds", AbstractCredentialConfig::new("c").into())
        };
        let logger = Logger::new("test");

        let err = manager(&transport).update_config(&account, None, Some(&logger)).await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(matches!(err.as_account_error(), Some(AccountError::UpdateAccountConfig { .. })));
        assert_eq!(severities(&logger.entries()), vec![Severity::Error]);
    }

    #[tokio::test]
    async fn test_update_config_rejects_foreign_family() {
        let transport = Arc::new(ScriptedTransport::new());
        let account = Account {
            id: Some(9),
            ..Account::new("creds", AbstractCredentialConfig::new("c").into())
        };
        let foreign = AccountConfig::from(DomoGovernanceConfig::new("k", "c"));

        let err =
            manager(&transport).update_config(&account, Some(&foreign), None).await.unwrap_err();

        assert!(matches!(err.as_account_error(), Some(AccountError::InvalidAccountConfig { .. })));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_non_200_returns_none() {
        let transport = Arc::new(ScriptedTransport::new().respond(400, json!({"error": "bad"})));
        let config = AccountConfig::from(AbstractCredentialConfig::new("c"));

        let created = manager(&transport).create_account("creds", &config, None).await.unwrap();

        assert!(created.is_none());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_create_without_numeric_id() {
        let transport =
            Arc::new(ScriptedTransport::new().respond(200, json!({"id": "21", "displayName": "c"})));
        let config = AccountConfig::from(AbstractCredentialConfig::new("c"));

        let err = manager(&transport).create_account("creds", &config, None).await.unwrap_err();

        match err {
            AppError::Account(AccountError::InvalidAccount { status, instance, .. }) => {
                assert_eq!(status, Some(200));
                assert_eq!(instance, "acme");
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.requests().len(), 1, "no refetch without an id");
    }

    #[tokio::test]
    async fn test_create_refetches_by_returned_id() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, json!({"id": 21, "displayName": "creds"}))
                .respond(200, metadata(21, "creds", "abstract-credential-store"))
                .respond(200, json!({"credentials": "c"})),
        );
        let config = AccountConfig::from(AbstractCredentialConfig::new("c"));

        let created =
            manager(&transport).create_account("creds", &config, None).await.unwrap().unwrap();

        assert_eq!(created.id, Some(21));
        assert_eq!(created.config, Some(config));
        assert!(transport.requests()[1].url.ends_with("/accounts/21?unmask=true"));
    }

    #[tokio::test]
    async fn test_delete_success_and_failure() {
        let transport =
            Arc::new(ScriptedTransport::new().respond(200, Value::Null).respond(403, Value::Null));
        let manager = manager(&transport);
        let logger = Logger::new("test");

        assert!(manager.delete(5, Some(&logger)).await.unwrap());
        let err = manager.delete(6, None).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Account(AccountError::DeleteAccount { status: Some(403), .. })
        ));
        assert_eq!(logger.len(), 1);
        assert!(manager.default_logger().is_empty(), "delete only logs to a supplied logger");
    }

    #[tokio::test]
    async fn test_delete_unbound_account() {
        let transport = Arc::new(ScriptedTransport::new());
        let account = Account::new("creds", AbstractCredentialConfig::new("c").into());

        let err = manager(&transport).delete_account(account, None).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Account(AccountError::InvalidAccount { status: None, .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let transport = Arc::new(ScriptedTransport::new().respond(
            200,
            json!([metadata(1, "a", GOVERNANCE_TYPE), metadata(2, "b", "abstract-credential-store")]),
        ));

        let accounts = manager(&transport).list_accounts(None).await.unwrap();

        let ids: Vec<_> = accounts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        assert!(accounts.iter().all(|a| a.config.is_none()));
    }

    #[tokio::test]
    async fn test_list_accounts_failure() {
        let transport = Arc::new(ScriptedTransport::new().respond(401, json!("Unauthorized")));
        let logger = Logger::new("test");

        let err = manager(&transport).list_accounts(Some(&logger)).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Account(AccountError::InvalidAccount { status: Some(401), .. })
        ));
        assert_eq!(severities(&logger.entries()), vec![Severity::Error]);
    }
}
