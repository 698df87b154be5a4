//! Handler for the analytics endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the analytics summary for a short code.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// Pure read over the record's stored recent clicks and daily rollups.
///
/// # Errors
///
/// Returns 404 if the short code does not exist.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let summary = state.analytics_service.get_analytics(&code).await?;

    Ok(Json(summary.into()))
}
