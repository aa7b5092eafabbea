use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Longest slice of an error body carried into a `DomainError`
const MAX_ERROR_BODY: usize = 512;

/// JSON-over-HTTP transport used by remote embedding providers
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// POST `body` and decode the JSON reply; non-2xx statuses are errors
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map(|client| Self { client })
            .map_err(|e| DomainError::configuration(format!("Invalid HTTP client setup: {}", e)))
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let request = headers
            .into_iter()
            .fold(self.client.post(url).json(body), |request, (name, value)| {
                request.header(name, value)
            });

        let response = request.send().await.map_err(|e| {
            let kind = if e.is_timeout() { "timed out" } else { "failed" };
            DomainError::provider("http", format!("POST {} {}: {}", url, kind, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                "http",
                format!("HTTP {} from {}: {}", status, url, truncate(&text)),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::provider("http", format!("Reply from {} is not JSON: {}", url, e))
        })
    }
}
