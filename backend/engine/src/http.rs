use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use charla_core::Backend;

/// HTTP transport for OpenAI-style APIs: bearer-authenticated JSON POST
/// against a configurable base URL. No retries, client default timeouts.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpBackend {
    /// Hosted API base URL used when no override is configured.
    pub const OPENAI_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn execute(&self, path: &str, payload: &Value) -> Result<Value> {
        debug!(path, "sending completion request");

        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .context("completion HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("backend returned {}: {}", status, error_body);
        }

        response
            .json()
            .await
            .context("failed to parse completion response body")
    }
}
