//! DTOs for the shorten endpoint.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::ShortUrlRecord;

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be a valid absolute HTTP/HTTPS URL).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional caller-chosen short code (validated for length and characters).
    #[validate(length(min = 4, max = 10))]
    #[validate(regex(path = "*CUSTOM_CODE_REGEX"))]
    pub custom_code: Option<String>,

    /// Optional expiry timestamp. After this time, the link returns 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response returned for a created (or deduplicated) short URL.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub click_count: i64,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ShortenResponse {
    /// Builds the response from a stored record and its derived short URL.
    pub fn from_record(record: ShortUrlRecord, short_url: String) -> Self {
        Self {
            id: record.id,
            code: record.short_code,
            short_url,
            original_url: record.original_url,
            click_count: record.click_count,
            is_active: record.is_active,
            expires_at: record.expires_at,
            created_at: record.created_at,
        }
    }
}
