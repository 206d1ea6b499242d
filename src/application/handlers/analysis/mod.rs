//! Analysis handlers - analyze input and manage the session transcript.

mod analyze_text;
mod transcript;

pub use analyze_text::{AnalysisOutcome, AnalyzeCommand, AnalyzeError, AnalyzeTextHandler};
pub use transcript::{
    ClearTranscriptCommand, ClearTranscriptHandler, GetTranscriptHandler, GetTranscriptQuery,
};
