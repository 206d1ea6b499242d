//! Request and response DTOs for analysis endpoints.

use serde::{Deserialize, Serialize};

use crate::application::AnalysisOutcome;
use crate::domain::extraction::{ExtractionResult, Source};
use crate::domain::foundation::SessionKey;
use crate::domain::input::InputSource;
use crate::domain::transcript::{EntryOutcome, TranscriptEntry};

/// Message shown when the flow responded but carried no usable answer.
pub const NOT_FOUND_MESSAGE: &str = "No valid answer found in the response";

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body for `POST /api/analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Answered,
    NotFound,
}

/// Result of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub status: AnalysisStatus,
    /// Extracted answer, or a fixed message when nothing was found.
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    pub entry_id: String,
}

impl From<AnalysisOutcome> for AnalysisResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        let entry_id = outcome.entry_id.to_string();
        match outcome.result {
            ExtractionResult::Answer { text, source } => Self {
                status: AnalysisStatus::Answered,
                answer: text,
                source: Some(source),
                entry_id,
            },
            ExtractionResult::NotFound => Self {
                status: AnalysisStatus::NotFound,
                answer: NOT_FOUND_MESSAGE.to_string(),
                source: None,
                entry_id,
            },
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntryResponse {
    pub id: String,
    pub input: String,
    pub source: InputSource,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
    pub created_at: String,
}

impl From<TranscriptEntry> for TranscriptEntryResponse {
    fn from(entry: TranscriptEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            input: entry.input,
            source: entry.source,
            outcome: entry.outcome,
            created_at: entry.created_at.to_string(),
        }
    }
}

/// A session's transcript, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResponse {
    pub session: String,
    pub entries: Vec<TranscriptEntryResponse>,
}

impl TranscriptResponse {
    pub fn new(session: &SessionKey, entries: Vec<TranscriptEntry>) -> Self {
        Self {
            session: session.to_string(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub runner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn with_code(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code("BAD_REQUEST", message)
    }

    pub fn upstream_auth(message: impl Into<String>) -> Self {
        Self::with_code("UPSTREAM_AUTH", message)
    }

    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self {
            details: Some(serde_json::json!({ "retry_after_secs": retry_after_secs })),
            ..Self::with_code(
                "RATE_LIMITED",
                "The analysis service is busy, please try again shortly",
            )
        }
    }

    pub fn upstream_timeout(message: impl Into<String>) -> Self {
        Self::with_code("UPSTREAM_TIMEOUT", message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::with_code("UPSTREAM_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code("INTERNAL_ERROR", message)
    }
}
