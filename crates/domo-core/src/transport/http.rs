//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use super::{HttpMethod, RequestBody, ResponseEnvelope, Transport, TransportError, TransportRequest};

/// Transport over a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self, TransportError> {
        let client = base_builder(timeout_secs)
            .build()
            .map_err(|e| TransportError::Builder(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (to share a pool with other components).
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Shared builder with keepalive settings.
fn base_builder(timeout_secs: u64) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .tcp_nodelay(true)
        .http2_keep_alive_interval(Duration::from_secs(25))
        .http2_keep_alive_timeout(Duration::from_secs(10))
        .http2_keep_alive_while_idle(true)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<ResponseEnvelope, TransportError> {
        let TransportRequest { method, url, body, auth_header } = request;

        let mut builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        if let Some(header) = auth_header {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Text(text) => builder.header(CONTENT_TYPE, "text/plain").body(text),
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        tracing::debug!(method = method.as_str(), url = %url, status, "domo api call");

        Ok(ResponseEnvelope::from_text(status, &text))
    }
}
