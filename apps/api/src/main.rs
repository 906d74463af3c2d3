mod config;
mod documents;
mod embedding;
mod errors;
mod llm_client;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{Embedder, OpenAiEmbedder};
use crate::llm_client::{ChatModel, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    // Pre-set chat credential is optional; requests may carry their own api_key
    let chat: Option<Arc<dyn ChatModel>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.llm_max_attempts)
                .context("Failed to initialise LLM client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(llm))
        }
        None => {
            info!("No ANTHROPIC_API_KEY set; requests must supply api_key");
            None
        }
    };

    let embedder: Option<Arc<dyn Embedder>> = match &config.embedding_api_key {
        Some(key) => {
            let embedder = OpenAiEmbedder::new(
                key.clone(),
                config.embedding_model.clone(),
                config.embedding_base_url.clone(),
            )
            .context("Failed to initialise embedding client")?;
            info!(
                "Embedding client initialized (model: {}, base: {})",
                config.embedding_model, config.embedding_base_url
            );
            Some(Arc::new(embedder))
        }
        None => {
            warn!("No EMBEDDING_API_KEY set; semantic similarity will score 0");
            None
        }
    };

    info!(
        "Scoring weights: embedding={} required={} preferred={}",
        config.screening.weights.embedding,
        config.screening.weights.required,
        config.screening.weights.preferred
    );

    let state = AppState {
        chat,
        embedder,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
