//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `LANGFLOW_RELAY` prefix
//! and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use langflow_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod extraction;
mod langflow;
mod server;
mod transcript;

pub use error::{ConfigError, ValidationError};
pub use extraction::ExtractionConfig;
pub use langflow::LangflowConfig;
pub use server::{Environment, ServerConfig};
pub use transcript::TranscriptConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment deserializes.
/// [`AppConfig::validate()`] decides whether the result is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Langflow run API
    #[serde(default)]
    pub langflow: LangflowConfig,

    /// Candidate paths and textual fallback
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Session transcript
    #[serde(default)]
    pub transcript: TranscriptConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LANGFLOW_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `LANGFLOW_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LANGFLOW_RELAY__LANGFLOW__API_TOKEN=...` -> `langflow.api_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LANGFLOW_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.langflow.validate(self.is_production())?;
        self.extraction.validate()?;
        self.transcript.validate()?;
        self.validate_request_budget()
    }

    /// The outer request timeout must outlast a full retrying Langflow run,
    /// otherwise the run is cancelled before its failure is recorded.
    fn validate_request_budget(&self) -> Result<(), ValidationError> {
        let Some(client) = self.langflow.client_config() else {
            return Ok(());
        };
        let required = client.worst_case_duration();
        if self.server.request_timeout() <= required {
            let required_secs = u64::try_from(required.as_millis().div_ceil(1000))
                .unwrap_or(u64::MAX);
            return Err(ValidationError::RequestTimeoutTooShort {
                configured_secs: self.server.request_timeout_secs,
                required_secs,
            });
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "LANGFLOW_RELAY__SERVER__PORT",
        "LANGFLOW_RELAY__SERVER__ENVIRONMENT",
        "LANGFLOW_RELAY__LANGFLOW__RUN_URL",
        "LANGFLOW_RELAY__LANGFLOW__API_TOKEN",
        "LANGFLOW_RELAY__LANGFLOW__USE_MOCK",
        "LANGFLOW_RELAY__LANGFLOW__TIMEOUT_SECS",
        "LANGFLOW_RELAY__LANGFLOW__MAX_RETRIES",
        "LANGFLOW_RELAY__SERVER__REQUEST_TIMEOUT_SECS",
        "LANGFLOW_RELAY__EXTRACTION__CANDIDATE_PATHS",
        "LANGFLOW_RELAY__EXTRACTION__TEXTUAL_FALLBACK",
        "LANGFLOW_RELAY__TRANSCRIPT__MAX_ENTRIES_PER_SESSION",
        "LANGFLOW_RELAY__TRANSCRIPT__MAX_SESSIONS",
    ];

    fn set_minimal_env() {
        env::set_var(
            "LANGFLOW_RELAY__LANGFLOW__RUN_URL",
            "https://langflow.example.com/api/v1/run/flow-1",
        );
        env::set_var("LANGFLOW_RELAY__LANGFLOW__API_TOKEN", "AstraCS:test");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn loads_from_environment() {
        let config = load_with(&[]).unwrap();
        assert_eq!(
            config.langflow.run_url.as_deref(),
            Some("https://langflow.example.com/api/v1/run/flow-1")
        );
        assert!(config.langflow.has_api_token());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn section_defaults_apply() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.langflow.timeout_secs, 120);
        assert!(config.extraction.textual_fallback);
        assert!(config.transcript.enabled);
    }

    #[test]
    fn nested_overrides_are_read() {
        let config = load_with(&[
            ("LANGFLOW_RELAY__SERVER__PORT", "3000"),
            ("LANGFLOW_RELAY__SERVER__ENVIRONMENT", "production"),
            ("LANGFLOW_RELAY__EXTRACTION__TEXTUAL_FALLBACK", "false"),
            ("LANGFLOW_RELAY__TRANSCRIPT__MAX_ENTRIES_PER_SESSION", "5"),
            ("LANGFLOW_RELAY__TRANSCRIPT__MAX_SESSIONS", "25"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert!(!config.extraction.textual_fallback);
        assert_eq!(config.transcript.max_entries_per_session, 5);
        assert_eq!(config.transcript.max_sessions, 25);
    }

    #[test]
    fn candidate_paths_come_from_environment() {
        let config = load_with(&[(
            "LANGFLOW_RELAY__EXTRACTION__CANDIDATE_PATHS",
            "data.reply,output",
        )])
        .unwrap();
        let table = config.extraction.candidate_table().unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn mock_mode_validates_without_credentials() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("LANGFLOW_RELAY__LANGFLOW__USE_MOCK", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.langflow.use_mock);
        assert!(config.validate().is_ok());
    }

    // ───────────────────────────────────────────────────────────────
    // Request timeout budget
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn default_budget_fits_request_timeout() {
        let config = load_with(&[]).unwrap();
        assert_eq!(
            config
                .langflow
                .client_config()
                .unwrap()
                .worst_case_duration()
                .as_secs(),
            487
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn slow_upstream_with_retries_exceeds_request_timeout() {
        let config = load_with(&[("LANGFLOW_RELAY__LANGFLOW__TIMEOUT_SECS", "300")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::RequestTimeoutTooShort {
                configured_secs: 600,
                required_secs: 1207,
            })
        ));
    }

    #[test]
    fn fewer_retries_bring_budget_back_within_timeout() {
        let config = load_with(&[
            ("LANGFLOW_RELAY__LANGFLOW__TIMEOUT_SECS", "300"),
            ("LANGFLOW_RELAY__LANGFLOW__MAX_RETRIES", "0"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn request_timeout_equal_to_budget_is_rejected() {
        let config = load_with(&[
            ("LANGFLOW_RELAY__LANGFLOW__TIMEOUT_SECS", "100"),
            ("LANGFLOW_RELAY__LANGFLOW__MAX_RETRIES", "0"),
            ("LANGFLOW_RELAY__SERVER__REQUEST_TIMEOUT_SECS", "100"),
        ])
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::RequestTimeoutTooShort { .. })
        ));
    }

    #[test]
    fn mock_mode_skips_budget_check() {
        let mut config = AppConfig::default();
        config.langflow.use_mock = true;
        config.langflow.timeout_secs = 900;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_token_fails_validation() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
