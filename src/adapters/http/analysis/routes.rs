//! Route configuration for analysis endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::domain::input::MAX_UPLOAD_BYTES;

use super::handlers::{
    analyze_text, analyze_upload, clear_transcript, get_transcript, health, AnalysisAppState,
};

/// Headroom for multipart framing around the file body.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Creates the analysis router with all endpoints.
///
/// Routes:
/// - `POST /api/analyze` - Analyze typed text
/// - `POST /api/analyze/upload` - Analyze an uploaded `.txt`, `.md` or `.csv` file
/// - `GET /api/transcript` - List the session transcript
/// - `DELETE /api/transcript` - Clear the session transcript
/// - `GET /health` - Liveness check
pub fn analysis_router() -> Router<AnalysisAppState> {
    Router::new()
        .route("/api/analyze", post(analyze_text))
        .route(
            "/api/analyze/upload",
            post(analyze_upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/api/transcript", get(get_transcript).delete(clear_transcript))
        .route("/health", get(health))
}
