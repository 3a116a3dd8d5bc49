//! HTTP gateway for the Magical Palace concierge.
//!
//! Exposes the concierge over a JSON chat endpoint and a Server-Sent Events
//! stream, plus health and stats probes and the embedded chat page.
//!
//! Built on Axum.

pub mod chat;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::HeaderValue,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use concierge_config::AppConfig;
use concierge_core::{
    AnswerBuilder, Concierge, ConciergeStats, Error, KnowledgeStore, ResponseCache, SystemClock,
};

/// Request bodies larger than this are rejected.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub concierge: Arc<Concierge>,
    /// Delay between streamed chunks
    pub pace: Duration,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(concierge: Arc<Concierge>, pace: Duration) -> SharedState {
        Arc::new(Self { concierge, pace })
    }
}

/// Build the Axum router with all gateway routes (CORS excluded).
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/chat", post(chat::chat_handler))
        .route("/chat/stream", post(chat::chat_stream_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Build the concierge described by `config`.
///
/// Loads the knowledge file when one is configured; otherwise uses the
/// built-in guide.
pub fn build_concierge(config: &AppConfig) -> concierge_core::Result<Concierge> {
    let store = match config.knowledge_path() {
        Some(path) => KnowledgeStore::load_from(&path)?,
        None => KnowledgeStore::builtin(),
    };
    let builder = AnswerBuilder::with_store(store);

    let concierge = if config.cache.enabled {
        let ttl = chrono::Duration::from_std(config.cache.ttl()).map_err(|e| Error::Config {
            message: format!("cache.ttl_secs out of range: {e}"),
        })?;
        Concierge::new(builder, ResponseCache::new(ttl, Arc::new(SystemClock)))
    } else {
        Concierge::uncached(builder)
    };

    Ok(concierge.with_chunk_size(config.stream.chunk_size))
}

/// CORS policy for the configured origins. `"*"` allows any origin.
pub fn cors_layer(origins: &[String]) -> concierge_core::Result<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    if origins.iter().any(|o| o == "*") {
        return Ok(base.allow_origin(Any));
    }

    let parsed = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>().map_err(|_| Error::Config {
                message: format!("invalid CORS origin: {o}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(base.allow_origin(AllowOrigin::list(parsed)))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let concierge = Arc::new(build_concierge(&config)?);
    let records = concierge.builder().retriever().store().len();
    let cors = cors_layer(&config.gateway.allowed_origins)?;
    let state = GatewayState::new(concierge, config.stream.pace());

    let app = build_router(state).layer(cors);

    info!(
        addr = %addr,
        records,
        cache = config.cache.enabled,
        ttl_secs = config.cache.ttl_secs,
        "Concierge gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn stats_handler(State(state): State<SharedState>) -> Json<ConciergeStats> {
    Json(state.concierge.stats())
}
