//! HTTP adapter for analysis endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AnalysisResponse, AnalysisStatus, AnalyzeTextRequest, ErrorResponse, HealthResponse,
    TranscriptEntryResponse, TranscriptResponse, NOT_FOUND_MESSAGE,
};
pub use handlers::{AnalysisAppState, SessionHeader, SESSION_HEADER, UPLOAD_FIELD};
pub use routes::analysis_router;
