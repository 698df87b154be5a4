//! Application-wide error type and HTTP response mapping.
//!
//! Repository and service code returns [`AppError`]; the API layer relies on
//! the [`IntoResponse`] implementation to turn it into a JSON error body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// JSON body wrapper: `{ "error": { ... } }`.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload embedded in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Application error with an HTTP-facing classification.
///
/// - `Validation` → 400 (malformed URL, bad custom code, ...)
/// - `NotFound`   → 404 (unknown or inactive short code)
/// - `Gone`       → 410 (expired short link)
/// - `Conflict`   → 409 (custom code taken, collision retry exhausted)
/// - `Internal`   → 500 (store failures, code generation exhausted)
#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Gone { message: String, details: Value },
    Conflict { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code for this error class.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Gone { .. } => "gone",
            AppError::Conflict { .. } => "conflict",
            AppError::Internal { .. } => "internal_error",
        }
    }

    /// Converts into a serializable [`ErrorInfo`] payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::Gone { message, details }
            | AppError::Conflict { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let info = self.to_error_info();
        write!(f, "{}: {}", info.code, info.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!("Database error: {e}");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(&e).unwrap_or_else(|_| json!({})),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).code(),
            "validation_error"
        );
        assert_eq!(AppError::not_found("x", json!({})).code(), "not_found");
        assert_eq!(AppError::gone("x", json!({})).code(), "gone");
        assert_eq!(AppError::conflict("x", json!({})).code(), "conflict");
        assert_eq!(AppError::internal("x", json!({})).code(), "internal_error");
    }

    #[test]
    fn test_to_error_info_carries_details() {
        let err = AppError::conflict("Code taken", json!({ "code": "abc123" }));
        let info = err.to_error_info();

        assert_eq!(info.code, "conflict");
        assert_eq!(info.message, "Code taken");
        assert_eq!(info.details["code"], "abc123");
    }

    #[test]
    fn test_display_format() {
        let err = AppError::not_found("Short link not found", json!({}));
        assert_eq!(err.to_string(), "not_found: Short link not found");
    }
}
