//! Flow Runner Port - Interface for running a hosted Langflow flow.
//!
//! The run API accepts one chat input and returns a JSON envelope whose shape
//! is owned by the upstream service. This port hands that envelope back
//! undecoded beyond JSON; interpreting it is the extractor's job.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoRunner;
//!
//! #[async_trait]
//! impl FlowRunner for EchoRunner {
//!     async fn run(&self, request: FlowRunRequest) -> Result<serde_json::Value, FlowError> {
//!         Ok(serde_json::json!({ "output": request.input_value }))
//!     }
//!
//!     fn runner_info(&self) -> RunnerInfo {
//!         RunnerInfo::new("echo", "memory://echo")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Port for running the upstream flow.
#[async_trait]
pub trait FlowRunner: Send + Sync {
    /// Runs the flow once and returns the decoded JSON body.
    ///
    /// Transport failures, non-success statuses, and undecodable bodies are
    /// reported as [`FlowError`] so that extraction never sees them.
    async fn run(&self, request: FlowRunRequest) -> Result<Value, FlowError>;

    /// Describes the runner for logs.
    fn runner_info(&self) -> RunnerInfo;
}

/// Request body for the flow run API.
///
/// Serializes to `{"input_value": ..., "output_type": "chat", "input_type": "chat"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRunRequest {
    /// The user's text.
    pub input_value: String,
    pub output_type: String,
    pub input_type: String,
    /// Optional per-component overrides understood by the flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweaks: Option<Value>,
}

impl FlowRunRequest {
    /// Creates a chat-in, chat-out request.
    pub fn chat(input_value: impl Into<String>) -> Self {
        Self {
            input_value: input_value.into(),
            output_type: "chat".to_string(),
            input_type: "chat".to_string(),
            tweaks: None,
        }
    }

    /// Sets component tweaks.
    pub fn with_tweaks(mut self, tweaks: Value) -> Self {
        self.tweaks = Some(tweaks);
        self
    }
}

/// Runner information for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerInfo {
    /// Runner name (e.g., "langflow", "mock").
    pub name: String,
    /// Endpoint the runner calls.
    pub endpoint: String,
}

impl RunnerInfo {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Upstream flow errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// Token missing, invalid, or not allowed to run the flow.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Rate limited by the upstream service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// The flow or endpoint does not exist.
    #[error("flow not found")]
    NotFound,

    /// The upstream rejected the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream server error.
    #[error("upstream unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Response body was not JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl FlowError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FlowError::RateLimited { .. }
                | FlowError::Unavailable { .. }
                | FlowError::Network(_)
                | FlowError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_serializes_to_wire_payload() {
        let request = FlowRunRequest::chat("Summarize this");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "input_value": "Summarize this",
                "output_type": "chat",
                "input_type": "chat"
            })
        );
    }

    #[test]
    fn tweaks_are_serialized_when_present() {
        let request = FlowRunRequest::chat("x").with_tweaks(json!({"ChatInput-1": {}}));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tweaks"], json!({"ChatInput-1": {}}));
    }

    #[test]
    fn flow_error_retryable_classification() {
        assert!(FlowError::rate_limited(30).is_retryable());
        assert!(FlowError::unavailable("down").is_retryable());
        assert!(FlowError::network("reset").is_retryable());
        assert!(FlowError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!FlowError::AuthenticationFailed.is_retryable());
        assert!(!FlowError::NotFound.is_retryable());
        assert!(!FlowError::InvalidRequest("bad".into()).is_retryable());
        assert!(!FlowError::parse("not json").is_retryable());
    }

    #[test]
    fn flow_error_displays_correctly() {
        assert_eq!(
            FlowError::rate_limited(12).to_string(),
            "rate limited: retry after 12s"
        );
        assert_eq!(
            FlowError::Timeout { timeout_secs: 5 }.to_string(),
            "request timed out after 5s"
        );
    }
}
