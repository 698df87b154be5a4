//! Health check handler.

use axum::{Json, extract::State};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Liveness probe.
///
/// # Endpoint
///
/// `GET /health`
///
/// Reports click-queue headroom so a saturated analytics pipeline is visible
/// before clicks start getting dropped.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        click_queue_free: state.click_tx.capacity(),
        click_queue_capacity: state.click_tx.max_capacity(),
    })
}
