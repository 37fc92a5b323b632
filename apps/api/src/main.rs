mod analysis;
mod config;
mod errors;
mod history;
mod llm_client;
mod preferences;
mod routes;
mod session;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::GeminiAnalyzer;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::llm_client::LlmClient;
use crate::preferences::PreferenceStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::JsonFileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Grader API v{}", env!("CARGO_PKG_VERSION"));

    // Local persistence: history and theme live side by side in the data dir
    let store = JsonFileStore::open(&config.data_dir)?;
    let history = HistoryStore::load(store.clone());
    let preferences = PreferenceStore::new(store);

    // Initialize LLM client
    let llm = match &config.gemini_api_base {
        Some(base) => LlmClient::with_base_url(config.gemini_api_key.clone(), base),
        None => LlmClient::new(config.gemini_api_key.clone()),
    };
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState::new(Arc::new(GeminiAnalyzer(llm)), history, preferences);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
