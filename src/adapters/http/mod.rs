//! HTTP adapters - REST API implementations.
//!
//! `analysis` exposes the analyze and transcript endpoints. [`build_router`]
//! wraps them in the shared tower-http middleware stack.

pub mod analysis;

pub use analysis::{analysis_router, AnalysisAppState, ErrorResponse};

use axum::http::HeaderValue;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Builds the application router with tracing, CORS and timeout layers.
pub fn build_router(state: AnalysisAppState, server: &ServerConfig) -> Router {
    analysis_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(server))
            .layer(TimeoutLayer::new(server.request_timeout())),
    )
}

/// Any origin when none are configured. Unparseable origins are skipped.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
