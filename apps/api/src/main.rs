mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod quiz;
mod report;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GeminiClient, GenerationBackend};
use crate::quiz::QuizOrchestrator;
use crate::routes::build_router;
use crate::state::AppState;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SoulSync API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generation backend
    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        Duration::from_secs(config.llm_timeout_secs),
        config.llm_max_attempts,
    )?;
    let backend: Arc<dyn GenerationBackend> = Arc::new(gemini);
    info!(
        "Gemini client initialized (questions: {}, analysis: {}, images: {})",
        llm_client::QUESTION_MODEL,
        llm_client::ANALYSIS_MODEL,
        llm_client::IMAGE_MODEL
    );

    let orchestrator = QuizOrchestrator::new(backend);
    spawn_idle_purge(orchestrator.clone(), config.session_idle_minutes);

    // Build app state
    let state = AppState { orchestrator };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Drops abandoned sessions once a minute.
fn spawn_idle_purge(orchestrator: QuizOrchestrator, idle_minutes: i64) {
    let max_idle = chrono::Duration::minutes(idle_minutes);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = orchestrator.purge_idle(max_idle).await;
            if purged > 0 {
                info!("Purged {purged} idle sessions");
            }
        }
    });
}
