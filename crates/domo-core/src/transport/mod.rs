//! HTTP transport seam.
//!
//! Everything above this module talks to the network through [`Transport`],
//! which performs exactly one call and reports it as a [`ResponseEnvelope`].
//! Non-2xx statuses are *not* errors at this layer; callers inspect the
//! envelope once and decide.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::auth::AuthHeader;

/// Failures that prevent a response from being observed at all.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed before a status was received.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("HTTP client builder failed: {0}")]
    Builder(String),
}

/// HTTP verbs used by the accounts API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Sent verbatim as `text/plain`
    Text(String),
}

/// One outbound call.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: RequestBody,
    pub auth_header: Option<AuthHeader>,
}

impl TransportRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), body: RequestBody::Empty, auth_header: None }
    }

    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_auth(mut self, auth_header: Option<AuthHeader>) -> Self {
        self.auth_header = auth_header;
        self
    }
}

/// A completed HTTP call: success flag, status, parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub is_success: bool,
    pub status: u16,
    /// JSON body when parseable, the raw text as a string otherwise, `Null` when empty
    pub response: Value,
}

impl ResponseEnvelope {
    /// Build an envelope from a status and raw body text.
    pub fn from_text(status: u16, text: &str) -> Self {
        let response = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };
        Self { is_success: (200..300).contains(&status), status, response }
    }

    /// Build an envelope from a status and an already-parsed body.
    pub fn from_json(status: u16, response: Value) -> Self {
        Self { is_success: (200..300).contains(&status), status, response }
    }
}

/// Performs single HTTP calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<ResponseEnvelope, TransportError>;

    async fn get(
        &self,
        url: &str,
        auth_header: Option<AuthHeader>,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.send(TransportRequest::new(HttpMethod::Get, url).with_auth(auth_header)).await
    }

    async fn put(
        &self,
        url: &str,
        body: Value,
        auth_header: Option<AuthHeader>,
    ) -> Result<ResponseEnvelope, TransportError> {
        let request = TransportRequest::new(HttpMethod::Put, url)
            .with_body(RequestBody::Json(body))
            .with_auth(auth_header);
        self.send(request).await
    }

    async fn put_text(
        &self,
        url: &str,
        body: String,
        auth_header: Option<AuthHeader>,
    ) -> Result<ResponseEnvelope, TransportError> {
        let request = TransportRequest::new(HttpMethod::Put, url)
            .with_body(RequestBody::Text(body))
            .with_auth(auth_header);
        self.send(request).await
    }

    async fn post(
        &self,
        url: &str,
        body: Value,
        auth_header: Option<AuthHeader>,
    ) -> Result<ResponseEnvelope, TransportError> {
        let request = TransportRequest::new(HttpMethod::Post, url)
            .with_body(RequestBody::Json(body))
            .with_auth(auth_header);
        self.send(request).await
    }

    async fn delete(
        &self,
        url: &str,
        auth_header: Option<AuthHeader>,
    ) -> Result<ResponseEnvelope, TransportError> {
        self.send(TransportRequest::new(HttpMethod::Delete, url).with_auth(auth_header)).await
    }
}
