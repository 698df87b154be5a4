//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the record by code
/// 2. Check usability: inactive → 404, expired → 410
/// 3. Enqueue a click event for the background worker
/// 4. Return 307 Temporary Redirect
///
/// # Click Tracking
///
/// Click events go through a bounded channel; if the queue is full the click
/// is dropped. Recording failures never delay or fail the redirect —
/// serving it is the primary contract, analytics is best-effort.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.shortener_service.get_by_code(&code).await?;

    if !record.is_active {
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "code": code }),
        ));
    }
    if record.is_expired() {
        return Err(AppError::gone(
            "Short link has expired",
            json!({ "code": code }),
        ));
    }

    let click_event = ClickEvent::new(
        record.id,
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    if state.click_tx.try_send(click_event).is_err() {
        debug!(%code, "Click queue full, dropping click event");
    }

    Ok(Redirect::temporary(&record.original_url))
}
