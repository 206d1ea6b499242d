//! HTTP handlers for analysis endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{multipart::Multipart, rejection::JsonRejection, FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    AnalyzeCommand, AnalyzeError, AnalyzeTextHandler, ClearTranscriptCommand,
    ClearTranscriptHandler, GetTranscriptHandler, GetTranscriptQuery,
};
use crate::domain::extraction::ResponseExtractor;
use crate::domain::foundation::SessionKey;
use crate::domain::input::{AnalysisInput, InputError};
use crate::ports::{FlowError, FlowRunner, TranscriptError, TranscriptStore};

use super::dto::{
    AnalysisResponse, AnalyzeTextRequest, ErrorResponse, HealthResponse, TranscriptResponse,
};

/// Header carrying the caller's session key.
pub const SESSION_HEADER: &str = "x-session-id";

/// Multipart field holding the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AnalysisAppState {
    analyze_handler: Arc<AnalyzeTextHandler>,
    get_transcript_handler: Arc<GetTranscriptHandler>,
    clear_transcript_handler: Arc<ClearTranscriptHandler>,
    runner_name: String,
}

impl AnalysisAppState {
    /// Wires the handlers over the given ports.
    pub fn new(
        runner: Arc<dyn FlowRunner>,
        transcript: Arc<dyn TranscriptStore>,
        extractor: ResponseExtractor,
        record_transcript: bool,
    ) -> Self {
        let runner_name = runner.runner_info().name;
        let analyze_handler = AnalyzeTextHandler::new(runner, Arc::clone(&transcript), extractor)
            .with_transcript_recording(record_transcript);

        Self {
            analyze_handler: Arc::new(analyze_handler),
            get_transcript_handler: Arc::new(GetTranscriptHandler::new(Arc::clone(&transcript))),
            clear_transcript_handler: Arc::new(ClearTranscriptHandler::new(transcript)),
            runner_name,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session extractor
// ════════════════════════════════════════════════════════════════════════════

/// Session key from the `x-session-id` header.
///
/// A missing header selects the default session. A header that is present
/// but malformed is rejected with 400.
#[derive(Debug, Clone)]
pub struct SessionHeader(pub SessionKey);

#[async_trait]
impl<S> FromRequestParts<S> for SessionHeader
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SESSION_HEADER) else {
            return Ok(SessionHeader(SessionKey::default()));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| SessionKey::new(v.trim()).ok())
            .map(SessionHeader)
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(format!(
                        "Invalid {} header",
                        SESSION_HEADER
                    ))),
                )
                    .into_response()
            })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/analyze - Analyze typed text
pub async fn analyze_text(
    State(state): State<AnalysisAppState>,
    SessionHeader(session): SessionHeader,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(rejection.body_text())),
            )
                .into_response()
        }
    };

    match AnalysisInput::from_text(&req.text) {
        Ok(input) => run_analysis(&state, session, input).await,
        Err(e) => handle_input_error(e),
    }
}

/// POST /api/analyze/upload - Analyze an uploaded text file
pub async fn analyze_upload(
    State(state): State<AnalysisAppState>,
    SessionHeader(session): SessionHeader,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return handle_input_error(InputError::Empty),
            Err(e) => {
                tracing::debug!("Rejected multipart upload: {}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(e.body_text())),
                )
                    .into_response();
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(e.body_text())),
                )
                    .into_response()
            }
        };

        return match AnalysisInput::from_upload(&file_name, &bytes) {
            Ok(input) => run_analysis(&state, session, input).await,
            Err(e) => handle_input_error(e),
        };
    }
}

async fn run_analysis(
    state: &AnalysisAppState,
    session: SessionKey,
    input: AnalysisInput,
) -> Response {
    let cmd = AnalyzeCommand::new(session, input);
    match state.analyze_handler.handle(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(AnalysisResponse::from(outcome))).into_response(),
        Err(e) => handle_analyze_error(e),
    }
}

/// GET /api/transcript - List the session's transcript
pub async fn get_transcript(
    State(state): State<AnalysisAppState>,
    SessionHeader(session): SessionHeader,
) -> Response {
    let query = GetTranscriptQuery {
        session: session.clone(),
    };

    match state.get_transcript_handler.handle(query).await {
        Ok(entries) => (
            StatusCode::OK,
            Json(TranscriptResponse::new(&session, entries)),
        )
            .into_response(),
        Err(e) => handle_transcript_error(e),
    }
}

/// DELETE /api/transcript - Clear the session's transcript
pub async fn clear_transcript(
    State(state): State<AnalysisAppState>,
    SessionHeader(session): SessionHeader,
) -> Response {
    match state
        .clear_transcript_handler
        .handle(ClearTranscriptCommand { session })
        .await
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_transcript_error(e),
    }
}

/// GET /health - Liveness check
pub async fn health(State(state): State<AnalysisAppState>) -> Response {
    let response = HealthResponse {
        status: "ok".to_string(),
        runner: state.runner_name.clone(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_input_error(error: InputError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(error.to_string())),
    )
        .into_response()
}

fn handle_analyze_error(error: AnalyzeError) -> Response {
    let AnalyzeError::Upstream(error) = error;
    match error {
        FlowError::AuthenticationFailed => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::upstream_auth(
                "The analysis service rejected the configured credentials",
            )),
        )
            .into_response(),
        FlowError::RateLimited { retry_after_secs } => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after_secs.to_string())],
            Json(ErrorResponse::rate_limited(retry_after_secs)),
        )
            .into_response(),
        FlowError::Timeout { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(ErrorResponse::upstream_timeout(error.to_string())),
        )
            .into_response(),
        other => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::upstream(format!(
                "Error from analysis service: {}",
                other
            ))),
        )
            .into_response(),
    }
}

fn handle_transcript_error(error: TranscriptError) -> Response {
    tracing::error!("Transcript store failed: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal("Transcript is unavailable")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(error: FlowError) -> Response {
        handle_analyze_error(AnalyzeError::Upstream(error))
    }

    #[test]
    fn input_errors_map_to_400() {
        let response = handle_input_error(InputError::Empty);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_auth_maps_to_502() {
        assert_eq!(
            upstream(FlowError::AuthenticationFailed).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn rate_limit_maps_to_429_with_retry_after() {
        let response = upstream(FlowError::RateLimited {
            retry_after_secs: 12,
        });
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "12");
    }

    #[test]
    fn timeout_maps_to_504() {
        let response = upstream(FlowError::Timeout { timeout_secs: 120 });
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn other_upstream_errors_map_to_502() {
        for error in [
            FlowError::NotFound,
            FlowError::Parse("not json".into()),
            FlowError::Network("refused".into()),
            FlowError::Unavailable {
                message: "503".into(),
            },
        ] {
            assert_eq!(upstream(error).status(), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn transcript_errors_map_to_500() {
        let response = handle_transcript_error(TranscriptError::Unavailable("down".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
