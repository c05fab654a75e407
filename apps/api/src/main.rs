mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod responses;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::generation::generator::StructuredGenerator;
use crate::llm_client::{GeminiClient, ModelInvocationConfig};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{InterviewStore, MemoryStore, PgStore, ResponseStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values, not on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model client and generation service
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; generation requests will fail until it is configured");
    }
    let client = GeminiClient::new(
        &config.gemini_api_base,
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    let generator = StructuredGenerator::new(
        Arc::new(client),
        config.gemini_api_key.clone(),
        ModelInvocationConfig::json(&config.gemini_model),
        config.environment,
    );
    info!(
        "Generation service initialized (model: {}, environment: {:?})",
        generator.model(),
        config.environment
    );

    // Initialize response / interview store
    let (responses, interviews) = build_stores(&config).await?;

    let state = AppState {
        generator,
        responses,
        interviews,
    };

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

/// PostgreSQL when DATABASE_URL is set, otherwise a process-local store.
async fn build_stores(
    config: &Config,
) -> Result<(Arc<dyn ResponseStore>, Arc<dyn InterviewStore>)> {
    match &config.database_url {
        Some(url) => {
            let store = Arc::new(PgStore::new(
                create_pool(url, config.db_max_connections).await?,
            ));
            let responses: Arc<dyn ResponseStore> = store.clone();
            let interviews: Arc<dyn InterviewStore> = store;
            Ok((responses, interviews))
        }
        None => {
            warn!("DATABASE_URL is not set; using in-memory store (data is lost on restart)");
            let store = Arc::new(MemoryStore::default());
            let responses: Arc<dyn ResponseStore> = store.clone();
            let interviews: Arc<dyn InterviewStore> = store;
            Ok((responses, interviews))
        }
    }
}
