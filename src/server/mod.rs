//! HTTP surface: shared state, router, and the serve loop.

pub mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::bidding::{Jitter, UniformJitter};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::extract::SignalExtractor;
use crate::store::Store;

/// Shared state behind every handler.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub signals: SignalExtractor,
    pub jitter: Arc<dyn Jitter>,
}

impl AppState {
    /// Production wiring: compiled signal patterns and a live jitter.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            signals: SignalExtractor::new(),
            jitter: Arc::new(UniformJitter),
        }
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route(
            "/products",
            get(handlers::list_products).post(handlers::upload_products),
        )
        .route("/tenders/process", post(handlers::process_tender))
        .route("/bids/recommend", post(handlers::recommend_bid))
        .route("/proposals/draft", post(handlers::draft_proposal))
        .route("/proposals/final", post(handlers::final_proposal))
        .route(
            "/proposals",
            get(handlers::list_proposals).post(handlers::save_proposal),
        )
        // Browser clients upload from anywhere during evaluation; tighten
        // for a real deployment.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
            addr: format!("{}:{}", config.host, config.port),
            reason: e.to_string(),
        })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, router(state)).await.map_err(ServerError::Io)
}
