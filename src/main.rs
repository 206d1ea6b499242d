//! Langflow Relay server binary.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use langflow_relay::adapters::http::{build_router, AnalysisAppState};
use langflow_relay::adapters::{LangflowClient, MockFlowRunner};
use langflow_relay::config::{AppConfig, ServerConfig};
use langflow_relay::ports::{FlowRunner, TranscriptStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let runner: Arc<dyn FlowRunner> = match config.langflow.client_config() {
        Some(client_config) => Arc::new(LangflowClient::new(client_config)?),
        None => {
            tracing::warn!("Langflow mock runner enabled, answers are canned");
            Arc::new(MockFlowRunner::new())
        }
    };
    let transcript: Arc<dyn TranscriptStore> = Arc::new(config.transcript.in_memory_store());
    let extractor = config.extraction.extractor()?;

    tracing::info!(
        runner = %runner.runner_info().name,
        candidate_paths = extractor.table().len(),
        textual_fallback = extractor.textual_fallback(),
        transcript = config.transcript.enabled,
        "Starting langflow-relay"
    );

    let state = AnalysisAppState::new(runner, transcript, extractor, config.transcript.enabled);
    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
