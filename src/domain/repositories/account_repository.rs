//! Repository trait for owner-account aggregate counters.

use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the best-effort owner aggregates.
///
/// These counters are secondary derived data updated off the request path;
/// a failed update is logged and dropped, never surfaced to a caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Adds `clicks` to the owner's total click counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn add_clicks(&self, owner_id: i64, clicks: i64) -> Result<(), AppError>;

    /// Increments the owner's total link counter by one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn add_link(&self, owner_id: i64) -> Result<(), AppError>;
}
