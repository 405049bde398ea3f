//! Authentication seam.

use async_trait::async_trait;
use std::fmt;

use crate::error::{AppError, AppResult};

/// Header carrying the developer access token.
pub const DEVELOPER_TOKEN_HEADER: &str = "x-domo-developer-token";

/// A prebuilt auth header (name + value).
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub name: String,
    pub value: String,
}

impl AuthHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeader").field("name", &self.name).field("value", &"<redacted>").finish()
    }
}

/// Produces auth headers and identifies the target instance.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Instance name, e.g. `acme` for `acme.domo.com`.
    fn instance_id(&self) -> &str;

    async fn generate_auth_header(&self) -> AppResult<AuthHeader>;

    /// Scheme and host every route URL is built on.
    fn base_url(&self) -> String {
        format!("https://{}.domo.com", self.instance_id())
    }
}

/// Static developer-token auth.
#[derive(Clone)]
pub struct TokenAuth {
    instance: String,
    token: String,
    base_url: Option<String>,
}

impl TokenAuth {
    pub fn new(instance: impl Into<String>, token: impl Into<String>) -> Self {
        Self { instance: instance.into(), token: token.into(), base_url: None }
    }

    /// Point route URLs somewhere other than `https://{instance}.domo.com`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }
}

impl fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuth")
            .field("instance", &self.instance)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl AuthProvider for TokenAuth {
    fn instance_id(&self) -> &str {
        &self.instance
    }

    async fn generate_auth_header(&self) -> AppResult<AuthHeader> {
        if self.token.trim().is_empty() {
            return Err(AppError::Auth(format!("no access token configured for {}", self.instance)));
        }
        Ok(AuthHeader::new(DEVELOPER_TOKEN_HEADER, self.token.clone()))
    }

    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| format!("https://{}.domo.com", self.instance))
    }
}
