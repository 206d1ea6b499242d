//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod analysis;

pub use analysis::{
    AnalysisOutcome, AnalyzeCommand, AnalyzeError, AnalyzeTextHandler, ClearTranscriptCommand,
    ClearTranscriptHandler, GetTranscriptHandler, GetTranscriptQuery,
};
