//! Session transcript configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::transcript::{
    InMemoryTranscriptStore, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_SESSIONS,
};

/// Session transcript configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptConfig {
    /// Record analyses in the session transcript
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Oldest entries are dropped past this many per session
    #[serde(default = "default_max_entries")]
    pub max_entries_per_session: usize,

    /// Least recently written sessions are evicted past this many
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl TranscriptConfig {
    /// Builds the in-memory store with the configured caps.
    pub fn in_memory_store(&self) -> InMemoryTranscriptStore {
        InMemoryTranscriptStore::new()
            .with_max_entries(self.max_entries_per_session)
            .with_max_sessions(self.max_sessions)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_entries_per_session == 0 || self.max_sessions == 0 {
            return Err(ValidationError::InvalidTranscriptCap);
        }
        Ok(())
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_entries_per_session: default_max_entries(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}
