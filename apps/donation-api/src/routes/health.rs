use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use donation_common::time::now_iso8601;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Open admin notification sockets.
    pub websocket_connections: usize,
    /// One entry per open socket.
    pub connected_admins: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.broadcaster.registry();
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_iso8601(),
        websocket_connections: registry.active_count(),
        connected_admins: registry.active_usernames(),
    })
}
