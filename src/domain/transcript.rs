//! Session transcript entries.
//!
//! Each analysis appends one entry to the caller's session transcript. The
//! transcript is append-only; entries are never edited after creation.

use serde::{Deserialize, Serialize};

use super::extraction::ExtractionResult;
use super::foundation::{EntryId, Timestamp};
use super::input::InputSource;

/// What an analysis produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// An answer was extracted from the upstream response.
    Answered { text: String },
    /// The upstream responded but no answer could be extracted.
    NotFound,
    /// The upstream call failed before extraction ran.
    Failed { error: String },
}

impl From<&ExtractionResult> for EntryOutcome {
    fn from(result: &ExtractionResult) -> Self {
        match result.answer() {
            Some(text) => EntryOutcome::Answered {
                text: text.to_string(),
            },
            None => EntryOutcome::NotFound,
        }
    }
}

/// One exchange in a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    /// The text that was sent upstream.
    pub input: String,
    pub source: InputSource,
    pub outcome: EntryOutcome,
    pub created_at: Timestamp,
}

impl TranscriptEntry {
    /// Creates a new entry stamped with the current time.
    pub fn new(input: impl Into<String>, source: InputSource, outcome: EntryOutcome) -> Self {
        Self {
            id: EntryId::new(),
            input: input.into(),
            source,
            outcome,
            created_at: Timestamp::now(),
        }
    }

    /// Returns the answer text when the exchange succeeded.
    pub fn answer(&self) -> Option<&str> {
        match &self.outcome {
            EntryOutcome::Answered { text } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::Source;

    #[test]
    fn outcome_from_answer() {
        let result = ExtractionResult::Answer {
            text: "hi".into(),
            source: Source::TextualFallback,
        };
        assert_eq!(
            EntryOutcome::from(&result),
            EntryOutcome::Answered { text: "hi".into() }
        );
    }

    #[test]
    fn outcome_from_not_found() {
        assert_eq!(
            EntryOutcome::from(&ExtractionResult::NotFound),
            EntryOutcome::NotFound
        );
    }

    #[test]
    fn entry_exposes_answer_only_when_answered() {
        let answered = TranscriptEntry::new(
            "q",
            InputSource::Text,
            EntryOutcome::Answered { text: "a".into() },
        );
        assert_eq!(answered.answer(), Some("a"));

        let failed = TranscriptEntry::new(
            "q",
            InputSource::Text,
            EntryOutcome::Failed {
                error: "boom".into(),
            },
        );
        assert_eq!(failed.answer(), None);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(EntryOutcome::Failed {
            error: "timeout".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "timeout");
    }
}
