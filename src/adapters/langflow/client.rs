//! Langflow Client - Implementation of FlowRunner for the Langflow run API.
//!
//! Posts a chat input to a flow's run URL with a bearer token and returns
//! the decoded JSON envelope.
//!
//! # Configuration
//!
//! ```ignore
//! let config = LangflowClientConfig::new(run_url, api_token)
//!     .with_timeout(Duration::from_secs(60))
//!     .with_max_retries(2);
//!
//! let client = LangflowClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::ports::{FlowError, FlowRunRequest, FlowRunner, RunnerInfo};

/// Retry delay used when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Retries past this many stop doubling the backoff delay.
const MAX_BACKOFF_DOUBLINGS: u32 = 16;

/// Configuration for the Langflow client.
#[derive(Debug)]
pub struct LangflowClientConfig {
    /// Full run URL of the flow (`.../api/v1/run/<flow id>`).
    pub run_url: String,
    /// Bearer token for the run API.
    api_token: Secret<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// First retry delay; doubled on each further retry.
    pub backoff_base: Duration,
}

impl LangflowClientConfig {
    /// Creates a new configuration for the given run URL and token.
    pub fn new(run_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            run_url: run_url.into(),
            api_token: Secret::new(api_token.into()),
            timeout: Duration::from_secs(120),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the first retry delay.
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Timeout in whole seconds, rounded up and saturating at `u32::MAX`.
    pub fn timeout_secs(&self) -> u32 {
        let secs = self.timeout.as_millis().div_ceil(1000);
        u32::try_from(secs).unwrap_or(u32::MAX)
    }

    /// Delay before retry number `retry` (zero-based).
    fn backoff_delay(&self, retry: u32) -> Duration {
        self.backoff_base
            .saturating_mul(1u32 << retry.min(MAX_BACKOFF_DOUBLINGS))
    }

    /// Longest a single `run` can take: every attempt timing out plus every
    /// backoff sleep between them.
    pub fn worst_case_duration(&self) -> Duration {
        let attempts = self
            .timeout
            .saturating_mul(self.max_retries.saturating_add(1));
        let doubling = self.max_retries.min(MAX_BACKOFF_DOUBLINGS + 1);
        let growing = self.backoff_base.saturating_mul((1u32 << doubling) - 1);
        let flat = self
            .backoff_delay(MAX_BACKOFF_DOUBLINGS)
            .saturating_mul(self.max_retries - doubling);
        attempts.saturating_add(growing).saturating_add(flat)
    }

    /// Exposes the token (for making requests).
    fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

/// Langflow run API client.
pub struct LangflowClient {
    config: LangflowClientConfig,
    client: Client,
}

impl LangflowClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: LangflowClientConfig) -> Result<Self, FlowError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FlowError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Sends one request.
    async fn send_request(&self, request: &FlowRunRequest) -> Result<Response, FlowError> {
        self.client
            .post(&self.config.run_url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_token()),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> FlowError {
        if e.is_timeout() {
            FlowError::Timeout {
                timeout_secs: self.config.timeout_secs(),
            }
        } else if e.is_connect() {
            FlowError::network(format!("Connection failed: {}", e))
        } else {
            FlowError::network(e.to_string())
        }
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, FlowError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = Self::parse_retry_after(response.headers());
        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(FlowError::AuthenticationFailed),
            404 => Err(FlowError::NotFound),
            429 => Err(FlowError::rate_limited(retry_after)),
            400..=499 => Err(FlowError::InvalidRequest(format!(
                "{}: {}",
                status, error_body
            ))),
            500..=599 => Err(FlowError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(FlowError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Reads `Retry-After` as whole seconds.
    fn parse_retry_after(headers: &header::HeaderMap) -> u32 {
        headers
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
    }

    /// Sends a request and decodes the JSON body.
    async fn run_once(&self, request: &FlowRunRequest) -> Result<Value, FlowError> {
        let response = self.send_request(request).await?;
        let response = self.handle_response_status(response).await?;

        response
            .json::<Value>()
            .await
            .map_err(|e| FlowError::parse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl FlowRunner for LangflowClient {
    async fn run(&self, request: FlowRunRequest) -> Result<Value, FlowError> {
        let mut retry_count = 0;

        loop {
            let started = Instant::now();
            tracing::debug!(
                attempt = retry_count + 1,
                input_chars = request.input_value.chars().count(),
                "Running Langflow flow"
            );

            match self.run_once(&request).await {
                Ok(body) => {
                    tracing::debug!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Langflow flow completed"
                    );
                    return Ok(body);
                }
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        tracing::warn!(attempt = retry_count + 1, "Langflow run failed: {}", err);
                        return Err(err);
                    }
                    tracing::warn!(
                        attempt = retry_count + 1,
                        "Langflow run failed, retrying: {}",
                        err
                    );
                }
            }

            // Exponential backoff: base, 2x base, 4x base, ...
            sleep(self.config.backoff_delay(retry_count)).await;
            retry_count += 1;
        }
    }

    fn runner_info(&self) -> RunnerInfo {
        RunnerInfo::new("langflow", &self.config.run_url)
    }
}
