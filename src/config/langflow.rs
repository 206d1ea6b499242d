//! Langflow upstream configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::langflow::LangflowClientConfig;

/// Langflow upstream configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LangflowConfig {
    /// Full run URL of the flow
    pub run_url: Option<String>,

    /// Bearer token for the run API
    pub api_token: Option<String>,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Serve canned answers instead of calling Langflow
    #[serde(default)]
    pub use_mock: bool,
}

impl LangflowConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_token(&self) -> bool {
        self.api_token.as_ref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Builds the HTTP client configuration.
    ///
    /// Returns `None` when the mock runner is selected or credentials are
    /// missing.
    pub fn client_config(&self) -> Option<LangflowClientConfig> {
        if self.use_mock || !self.has_api_token() {
            return None;
        }
        let run_url = self.run_url.as_deref()?;
        let api_token = self.api_token.as_deref()?;
        Some(
            LangflowClientConfig::new(run_url, api_token)
                .with_timeout(self.timeout())
                .with_max_retries(self.max_retries),
        )
    }

    /// Validate Langflow configuration.
    ///
    /// Run URL and token are only required when the real client is used.
    /// Production requires HTTPS since the token travels in a header.
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidUpstreamTimeout);
        }
        if self.use_mock {
            return Ok(());
        }

        let run_url = self
            .run_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ValidationError::MissingRequired("LANGFLOW__RUN_URL"))?;
        if !self.has_api_token() {
            return Err(ValidationError::MissingRequired("LANGFLOW__API_TOKEN"));
        }

        let is_https = run_url.starts_with("https://");
        if !is_https && !run_url.starts_with("http://") {
            return Err(ValidationError::InvalidRunUrl);
        }
        if production && !is_https {
            return Err(ValidationError::RunUrlMustBeHttps);
        }
        Ok(())
    }
}

impl Default for LangflowConfig {
    fn default() -> Self {
        Self {
            run_url: None,
            api_token: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            use_mock: false,
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}
