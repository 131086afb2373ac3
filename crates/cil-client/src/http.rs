use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

use cil_ledger::{Block, ChainAudit, SortOrder};
use cil_types::ReportSubmission;

use crate::error::{ClientError, ClientResult};
use crate::retry::RetryPolicy;

/// Configuration for a remote chain endpoint.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the chain API, e.g. `http://127.0.0.1:9318`.
    pub base_url: String,
    /// Per-request timeout; a hung fetch becomes `Unavailable`.
    pub request_timeout: Duration,
    /// Backoff policy for transient read failures.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9318".into(),
            request_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// Transport interface for a remote chain.
#[async_trait]
pub trait RemoteChain: Send + Sync {
    /// The full chain in index order.
    async fn fetch_chain(&self) -> ClientResult<Vec<Block>>;

    /// Blocks with `index >= min_index` in the requested order.
    async fn fetch_from(&self, min_index: u64, order: SortOrder) -> ClientResult<Vec<Block>>;

    /// A single block by index.
    async fn fetch_block(&self, index: u64) -> ClientResult<Block>;

    /// The server-side audit report.
    async fn fetch_audit(&self) -> ClientResult<ChainAudit>;

    /// Submit a report for append. Never retried silently: a conflict or
    /// transport failure is surfaced so the caller can refresh and decide.
    async fn submit_report(&self, submission: &ReportSubmission) -> ClientResult<Block>;
}

/// HTTP implementation of [`RemoteChain`].
pub struct HttpChain {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpChain {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET with bounded-backoff retries on transient failures.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_get(&url).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && self.config.retry.allows_retry(attempt) => {
                    let delay = self.config.retry.delay_for(attempt);
                    warn!(%url, attempt, ?delay, error = %err, "transient fetch failure, backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_get<T: DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(classify_transport)?;
        decode_response(response).await
    }
}

#[async_trait]
impl RemoteChain for HttpChain {
    async fn fetch_chain(&self) -> ClientResult<Vec<Block>> {
        self.get_json("/chain").await
    }

    async fn fetch_from(&self, min_index: u64, order: SortOrder) -> ClientResult<Vec<Block>> {
        self.get_json(&format!(
            "/chain?min_index={min_index}&order={}",
            order.as_str()
        ))
        .await
    }

    async fn fetch_block(&self, index: u64) -> ClientResult<Block> {
        self.get_json(&format!("/chain/blocks/{index}")).await
    }

    async fn fetch_audit(&self) -> ClientResult<ChainAudit> {
        self.get_json("/chain/verify").await
    }

    async fn submit_report(&self, submission: &ReportSubmission) -> ClientResult<Block> {
        let response = self
            .http
            .post(self.url("/report"))
            .json(submission)
            .send()
            .await
            .map_err(classify_transport)?;
        decode_response(response).await
    }
}

fn classify_transport(err: reqwest::Error) -> ClientError {
    // Timeouts, refused connections, and mid-transfer failures are all
    // transient transport conditions, distinct from a proven-invalid chain.
    ClientError::Unavailable(err.to_string())
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(classify_transport)?;

    if status.is_server_error() {
        return Err(ClientError::Unavailable(format!(
            "server returned {status}: {body}"
        )));
    }
    if status == reqwest::StatusCode::CONFLICT {
        return Err(ClientError::Conflict(body));
    }
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            detail: body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_localhost() {
        let config = ClientConfig::default();
        assert!(config.base_url.starts_with("http://127.0.0.1"));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = HttpChain::new(ClientConfig {
            base_url: "http://example.test/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.url("/chain"), "http://example.test/chain");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        // Reserved TEST-NET address: nothing listens there.
        let client = HttpChain::new(ClientConfig {
            base_url: "http://192.0.2.1:9".into(),
            request_timeout: Duration::from_millis(200),
            retry: RetryPolicy::none(),
        })
        .unwrap();

        let err = client.fetch_chain().await.unwrap_err();
        assert!(err.is_transient(), "expected Unavailable, got {err}");
    }
}
