//! Thin route functions for the accounts API.
//!
//! Each function performs exactly one call and returns the envelope as-is;
//! status interpretation belongs to the caller.

use domo_types::{CreateAccountBody, RawConfig};
use serde_json::Value;

use crate::auth::AuthProvider;
use crate::error::AppResult;
use crate::transport::{ResponseEnvelope, Transport};

fn accounts_url(auth: &dyn AuthProvider) -> String {
    format!("{}/api/data/v1/accounts", auth.base_url())
}

fn provider_account_url(
    auth: &dyn AuthProvider,
    data_provider_type: &str,
    account_id: i64,
) -> String {
    format!(
        "{}/api/data/v1/providers/{data_provider_type}/account/{account_id}",
        auth.base_url()
    )
}

/// List every account the auth can read.
pub async fn get_accounts(
    transport: &dyn Transport,
    auth: &dyn AuthProvider,
) -> AppResult<ResponseEnvelope> {
    let url = accounts_url(auth);
    tracing::debug!(url = %url, "get_accounts");
    let header = auth.generate_auth_header().await?;
    Ok(transport.get(&url, Some(header)).await?)
}

/// Account metadata only; no configuration.
pub async fn get_account_from_id(
    transport: &dyn Transport,
    auth: &dyn AuthProvider,
    account_id: i64,
) -> AppResult<ResponseEnvelope> {
    let url = format!("{}/{account_id}?unmask=true", accounts_url(auth));
    tracing::debug!(url = %url, "get_account_from_id");
    let header = auth.generate_auth_header().await?;
    Ok(transport.get(&url, Some(header)).await?)
}

/// Account configuration only; no metadata.
pub async fn get_account_config(
    transport: &dyn Transport,
    auth: &dyn AuthProvider,
    account_id: i64,
    data_provider_type: &str,
) -> AppResult<ResponseEnvelope> {
    let url = format!("{}?unmask=true", provider_account_url(auth, data_provider_type, account_id));
    tracing::debug!(url = %url, "get_account_config");
    let header = auth.generate_auth_header().await?;
    Ok(transport.get(&url, Some(header)).await?)
}

/// Replace the account configuration. Metadata is untouched.
pub async fn update_account_config(
    transport: &dyn Transport,
    auth: &dyn AuthProvider,
    account_id: i64,
    data_provider_type: &str,
    config_body: &RawConfig,
) -> AppResult<ResponseEnvelope> {
    let url = provider_account_url(auth, data_provider_type, account_id);
    tracing::debug!(url = %url, "update_account_config");
    let header = auth.generate_auth_header().await?;
    Ok(transport.put(&url, Value::Object(config_body.clone()), Some(header)).await?)
}

/// Rename an account. The body is the raw name text.
pub async fn update_account_name(
    transport: &dyn Transport,
    auth: &dyn AuthProvider,
    account_id: i64,
    account_name: &str,
) -> AppResult<ResponseEnvelope> {
    let url = format!("{}/{account_id}/name", accounts_url(auth));
    tracing::debug!(url = %url, "update_account_name");
    let header = auth.generate_auth_header().await?;
    Ok(transport.put_text(&url, account_name.to_string(), Some(header)).await?)
}

/// Create an account. The response carries metadata only.
pub async fn create_account_route(
    transport: &dyn Transport,
    auth: &dyn AuthProvider,
    body: &CreateAccountBody,
) -> AppResult<ResponseEnvelope> {
    let url = accounts_url(auth);
    tracing::debug!(url = %url, "create_account");
    let header = auth.generate_auth_header().await?;
    Ok(transport.post(&url, serde_json::to_value(body)?, Some(header)).await?)
}

pub async fn delete_account_route(
    transport: &dyn Transport,
    auth: &dyn AuthProvider,
    account_id: i64,
) -> AppResult<ResponseEnvelope> {
    let url = format!("{}/{account_id}", accounts_url(auth));
    tracing::debug!(url = %url, "delete_account");
    let header = auth.generate_auth_header().await?;
    Ok(transport.delete(&url, Some(header)).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::TokenAuth;
    use crate::transport::mock::ScriptedTransport;
    use crate::transport::{HttpMethod, RequestBody};
    use domo_types::{AccountConfig, DomoGovernanceConfig};
    use serde_json::json;

    #[tokio::test]
    async fn test_url_shapes() {
        let transport = ScriptedTransport::new();
        let auth = TokenAuth::new("acme", "tok");

        get_account_from_id(&transport, &auth, 5).await.unwrap();
        get_account_config(&transport, &auth, 5, "domo-governance-x").await.unwrap();
        update_account_config(&transport, &auth, 5, "domo-governance-x", &RawConfig::new())
            .await
            .unwrap();
        update_account_name(&transport, &auth, 5, "renamed").await.unwrap();
        delete_account_route(&transport, &auth, 5).await.unwrap();

        let urls: Vec<_> = transport.requests().into_iter().map(|r| (r.method, r.url)).collect();
        assert_eq!(
            urls,
            vec![
                (HttpMethod::Get, "https://acme.domo.com/api/data/v1/accounts/5?unmask=true".to_string()),
                (
                    HttpMethod::Get,
                    "https://acme.domo.com/api/data/v1/providers/domo-governance-x/account/5?unmask=true"
                        .to_string()
                ),
                (
                    HttpMethod::Put,
                    "https://acme.domo.com/api/data/v1/providers/domo-governance-x/account/5".to_string()
                ),
                (HttpMethod::Put, "https://acme.domo.com/api/data/v1/accounts/5/name".to_string()),
                (HttpMethod::Delete, "https://acme.domo.com/api/data/v1/accounts/5".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_name_is_sent_as_text_with_auth() {
        let transport = ScriptedTransport::new();
        let auth = TokenAuth::new("acme", "tok");

        update_account_name(&transport, &auth, 5, "renamed").await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.body, RequestBody::Text("renamed".to_string()));
        assert_eq!(request.auth_header.as_ref().map(|h| h.value.as_str()), Some("tok"));
    }

    #[tokio::test]
    async fn test_create_posts_wrapped_body() {
        let transport = ScriptedTransport::new().respond(200, json!({"id": 12}));
        let auth = TokenAuth::new("acme", "tok");
        let config: AccountConfig = DomoGovernanceConfig::new("key", "acme").into();

        let res = create_account_route(&transport, &auth, &CreateAccountBody::new("gov", &config))
            .await
            .unwrap();

        assert_eq!(res.response["id"], 12);
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "displayName": "gov",
                "dataProviderType": "domo-governance",
                "name": "domo-governance",
                "configurations": {"apikey": "key", "customer": "acme"}
            }))
        );
    }
}
