//! API route configuration.

use crate::api::handlers::{shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// REST API routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`      - Create a shortened URL
/// - `GET  /stats/{code}` - Analytics summary for a link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/{code}", get(stats_handler))
}
