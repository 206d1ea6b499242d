//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Langflow run URL format")]
    InvalidRunUrl,

    #[error("Langflow run URL must use HTTPS in production")]
    RunUrlMustBeHttps,

    #[error("Invalid upstream timeout")]
    InvalidUpstreamTimeout,

    #[error(
        "Request timeout of {configured_secs}s does not cover the {required_secs}s \
         a Langflow run may take with retries"
    )]
    RequestTimeoutTooShort {
        configured_secs: u64,
        required_secs: u64,
    },

    #[error("Invalid candidate paths: {0}")]
    InvalidCandidatePaths(String),

    #[error("Transcript caps must be at least 1")]
    InvalidTranscriptCap,
}
