//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect (public)
//! - `GET  /health`   - Health check with click-queue headroom (public)
//! - `/api/*`         - REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
