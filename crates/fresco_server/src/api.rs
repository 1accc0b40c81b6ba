//! HTTP surface: health check and the generation WebSocket.

use crate::config::ServerConfig;
use crate::session::Session;
use crate::transport::WsTransport;
use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::instrument;

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates a new API state.
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }
}

/// Creates the API router.
pub fn create_router(config: Arc<ServerConfig>) -> Router {
    let state = AppState { config };

    Router::new()
        .route("/health", get(health_check))
        .route("/generate-code", get(generate_code))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
#[instrument(skip_all)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Upgrades to a WebSocket and runs one generation session on it.
#[instrument(skip_all)]
async fn generate_code(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let mut transport = WsTransport::new(socket);
        Session::new(state.config.clone()).run(&mut transport).await;
    })
}
