//! NSE HTTP client
//!
//! Fetches index snapshots from the NSE website, optionally through a static
//! HTTP proxy, retrying failed attempts with a linearly growing delay.

use super::{IndexSnapshot, SnapshotSource};
use crate::config::{ProxyConfig, UpstreamConfig};
use crate::telemetry;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Proxy};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use urlencoding::encode;

/// Path of the index endpoint under the site root
pub const INDEX_PATH: &str = "/api/equity-stockIndices";

/// Upstream fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid upstream payload: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status { .. })
    }
}

/// Client for the NSE index API
pub struct NseClient {
    client: Client,
    base_url: String,
    user_agent: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl NseClient {
    /// Create a client from upstream settings and an optional proxy
    pub fn new(config: &UpstreamConfig, proxy: Option<&ProxyConfig>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        builder = match proxy {
            Some(proxy) => {
                let mut upstream_proxy =
                    Proxy::all(proxy.url()).map_err(|e| FetchError::Build(e.to_string()))?;
                if let Some(username) = &proxy.username {
                    upstream_proxy = upstream_proxy
                        .basic_auth(username, proxy.password.as_deref().unwrap_or_default());
                }
                tracing::info!(proxy = %proxy.url(), "Routing upstream requests through proxy");
                builder.proxy(upstream_proxy)
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| FetchError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Full URL of the snapshot endpoint for `index`
    pub fn index_url(&self, index: &str) -> String {
        format!("{}{}?index={}", self.base_url, INDEX_PATH, encode(index))
    }

    /// Single attempt, no retry
    pub async fn fetch_once(&self, index: &str) -> Result<IndexSnapshot, FetchError> {
        let url = self.index_url(index);
        tracing::debug!(url = %url, "Fetching index snapshot");

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        telemetry::record_upstream_latency(started.elapsed());

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Fetch with retries; delay before attempt `n + 1` is `n * retry_delay`
    pub async fn fetch(&self, index: &str) -> Result<IndexSnapshot, FetchError> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(index).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.retry_delay * attempt;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Upstream fetch failed, retrying..."
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempt, "Upstream fetch failed");
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl SnapshotSource for NseClient {
    async fn fetch_index(&self, index: &str) -> Result<IndexSnapshot, FetchError> {
        self.fetch(index).await
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
