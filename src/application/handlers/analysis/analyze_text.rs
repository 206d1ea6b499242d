//! AnalyzeText command handler.
//!
//! Sends validated user input to the flow, extracts a display answer from the
//! response, and records the exchange in the session transcript.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::extraction::{ExtractionResult, ResponseExtractor, Source};
use crate::domain::foundation::{EntryId, SessionKey};
use crate::domain::input::AnalysisInput;
use crate::domain::transcript::{EntryOutcome, TranscriptEntry};
use crate::ports::{FlowError, FlowRunRequest, FlowRunner, TranscriptStore};

/// Command to analyze one piece of user input.
#[derive(Debug, Clone)]
pub struct AnalyzeCommand {
    /// Transcript the exchange is recorded in.
    pub session: SessionKey,
    /// Validated input text.
    pub input: AnalysisInput,
}

impl AnalyzeCommand {
    pub fn new(session: SessionKey, input: AnalysisInput) -> Self {
        Self { session, input }
    }
}

/// Errors that can occur while analyzing input.
#[derive(Debug, Clone, Error)]
pub enum AnalyzeError {
    /// The upstream call failed before extraction ran.
    #[error("Upstream flow error: {0}")]
    Upstream(#[from] FlowError),
}

/// Result of an analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Transcript entry created for this exchange.
    pub entry_id: EntryId,
    /// Extracted answer, or not found.
    pub result: ExtractionResult,
}

/// Handler for AnalyzeCommand.
pub struct AnalyzeTextHandler {
    runner: Arc<dyn FlowRunner>,
    transcript: Arc<dyn TranscriptStore>,
    extractor: ResponseExtractor,
    record_transcript: bool,
}

impl AnalyzeTextHandler {
    /// Creates a new handler with transcript recording enabled.
    pub fn new(
        runner: Arc<dyn FlowRunner>,
        transcript: Arc<dyn TranscriptStore>,
        extractor: ResponseExtractor,
    ) -> Self {
        Self {
            runner,
            transcript,
            extractor,
            record_transcript: true,
        }
    }

    /// Enables or disables transcript recording.
    pub fn with_transcript_recording(mut self, enabled: bool) -> Self {
        self.record_transcript = enabled;
        self
    }

    /// Handles an analyze command.
    ///
    /// Upstream failures short-circuit before extraction and are returned as
    /// [`AnalyzeError::Upstream`]. A response with no usable answer is not an
    /// error: it yields [`ExtractionResult::NotFound`].
    pub async fn handle(&self, cmd: AnalyzeCommand) -> Result<AnalysisOutcome, AnalyzeError> {
        let AnalyzeCommand { session, input } = cmd;
        let (text, source) = input.into_parts();
        let runner = self.runner.runner_info();

        let body = match self.runner.run(FlowRunRequest::chat(text.clone())).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(
                    session = %session,
                    runner = %runner.name,
                    "Flow run failed: {}",
                    err
                );
                let entry = TranscriptEntry::new(
                    text,
                    source,
                    EntryOutcome::Failed {
                        error: err.to_string(),
                    },
                );
                self.record(&session, entry).await;
                return Err(AnalyzeError::Upstream(err));
            }
        };

        let result = self.extractor.extract(&body);
        match result.source() {
            Some(Source::Path { index, path }) => {
                tracing::debug!(session = %session, path_index = index, path = %path, "Answer extracted");
            }
            Some(Source::TextualFallback) => {
                tracing::info!(session = %session, "No candidate path matched, using textual fallback");
            }
            None => {
                tracing::warn!(session = %session, "No answer found in flow response");
            }
        }

        let entry = TranscriptEntry::new(text, source, EntryOutcome::from(&result));
        let entry_id = entry.id;
        self.record(&session, entry).await;

        Ok(AnalysisOutcome { entry_id, result })
    }

    /// Appends to the transcript. Storage failures are logged, not returned.
    async fn record(&self, session: &SessionKey, entry: TranscriptEntry) {
        if !self.record_transcript {
            return;
        }
        if let Err(e) = self.transcript.append(session, entry).await {
            tracing::warn!(session = %session, "Failed to record transcript entry: {}", e);
        }
    }
}
