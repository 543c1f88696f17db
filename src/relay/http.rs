//! Reqwest-backed relay implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::error::GenError;
use crate::relay::{BodyKind, Relay, RelayResponse};

/// Generation calls can legitimately run for minutes on slow diffusion
/// backends; model listing should fail fast.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(300);
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Forwards payloads to the upstream endpoint with bearer-token auth.
/// Every call is bounded by a per-request timeout; status codes and bodies
/// pass through unmodified.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    generation_timeout: Duration,
    metadata_timeout: Duration,
}

impl Default for HttpRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRelay {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            generation_timeout: GENERATION_TIMEOUT,
            metadata_timeout: METADATA_TIMEOUT,
        }
    }

    /// Use an existing reqwest client (connection pooling, proxies).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            generation_timeout: GENERATION_TIMEOUT,
            metadata_timeout: METADATA_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, generation: Duration, metadata: Duration) -> Self {
        self.generation_timeout = generation;
        self.metadata_timeout = metadata;
        self
    }

    fn base_url(endpoint: &str) -> &str {
        endpoint.trim_end_matches('/')
    }

    async fn read_response(response: reqwest::Response) -> Result<RelayResponse, GenError> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let raw_text = response.text().await?;
        Ok(RelayResponse {
            status,
            content_type,
            raw_text,
        })
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        kind: BodyKind,
        payload: &serde_json::Value,
    ) -> Result<RelayResponse, GenError> {
        let url = format!("{}{}", Self::base_url(endpoint), kind.path());
        tracing::debug!(%url, kind = kind.as_str(), "forwarding generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(payload)
            .timeout(self.generation_timeout)
            .send()
            .await?;

        let relayed = Self::read_response(response).await?;
        tracing::debug!(
            status = relayed.status,
            content_type = %relayed.content_type,
            "upstream responded"
        );
        Ok(relayed)
    }

    async fn get_models(
        &self,
        endpoint: &str,
        api_key: &str,
    ) -> Result<RelayResponse, GenError> {
        let url = format!("{}/v1/models", Self::base_url(endpoint));
        tracing::debug!(%url, "fetching model listing");

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .timeout(self.metadata_timeout)
            .send()
            .await?;

        Self::read_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        assert_eq!(HttpRelay::base_url("https://api.example.com/"), "https://api.example.com");
        assert_eq!(HttpRelay::base_url("https://api.example.com///"), "https://api.example.com");
        assert_eq!(HttpRelay::base_url("https://api.example.com"), "https://api.example.com");
    }
}
