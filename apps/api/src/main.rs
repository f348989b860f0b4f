mod assistant;
mod config;
mod errors;
mod generation;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::session::SessionStore;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PostCraft API v{}", env!("CARGO_PKG_VERSION"));

    if config.groq_api_key.is_none() {
        warn!("GROQ_API_KEY is not set. Generation and assistant calls will fail until it is added to .env");
    }

    let llm = LlmClient::new(config.groq_api_key.clone(), config.groq_api_url.clone())?;
    info!(
        "LLM client initialized (post model: {}, chat model: {})",
        llm_client::POST_MODEL,
        llm_client::CHAT_MODEL
    );

    info!(
        "Assistant sessions: at most {}, idle expiry after {} min",
        config.max_sessions, config.session_idle_minutes
    );

    let state = AppState {
        llm,
        sessions: SessionStore::new(
            config.max_sessions,
            chrono::Duration::minutes(config.session_idle_minutes),
        ),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser UI is served from a different origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
