//! Handler for the shorten endpoint.

use axum::{Json, extract::State, http::HeaderMap};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the account identity resolved by upstream auth middleware.
///
/// The value is trusted verbatim; this service performs no authentication
/// itself.
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// Creates a shortened URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "custom_code": "promo-24",              // optional
///   "expires_at": "2027-01-01T00:00:00Z"    // optional
/// }
/// ```
///
/// # Idempotency
///
/// An authenticated caller who already holds an active link for the URL gets
/// that link back with a 200 rather than a duplicate or an error.
///
/// # Errors
///
/// Returns 400 for an invalid URL, custom code, or account header, 409 when
/// a custom code is taken or a collision retry was exhausted, 500 when code
/// generation is exhausted.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let owner_id = resolve_account_id(&headers)?;

    let record = state
        .shortener_service
        .create_short_url(payload.url, owner_id, payload.custom_code, payload.expires_at)
        .await?;

    let short_url = state.shortener_service.short_url(&record.short_code);

    Ok(Json(ShortenResponse::from_record(record, short_url)))
}

/// Reads the resolved account identity, if any, from request headers.
fn resolve_account_id(headers: &HeaderMap) -> Result<Option<i64>, AppError> {
    let Some(value) = headers.get(ACCOUNT_ID_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| {
            AppError::bad_request("Invalid account id header", json!({ "header": ACCOUNT_ID_HEADER }))
        })
}
