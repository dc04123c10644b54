//! System endpoints: health check and routing configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Routing configuration exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct DestinationsResponse {
    /// Inbound `/app/...` patterns accepted in `send` frames.
    destinations: Vec<String>,
    /// Chat addressing mode, `global` or `room`.
    chat_addressing: String,
    /// Topic chat messages land on in global mode.
    public_topic: String,
}

/// `GET /config/destinations`: List inbound destinations and addressing.
#[utoipa::path(
    get,
    path = "/config/destinations",
    tag = "System",
    summary = "List WebSocket destinations",
    description = "Returns the inbound destination patterns and the active chat addressing mode.",
    responses(
        (status = 200, description = "Routing configuration", body = DestinationsResponse),
    )
)]
pub async fn destinations_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(DestinationsResponse {
        destinations: state.router.patterns().map(str::to_string).collect(),
        chat_addressing: state.hub.addressing().to_string(),
        public_topic: crate::domain::Topic::public().to_string(),
    })
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/destinations", get(destinations_handler))
}
