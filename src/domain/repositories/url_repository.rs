//! Repository trait for short URL records.

use crate::domain::entities::{ClickEntry, NewShortUrl, ShortUrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Outcome of an atomic insert that violated a uniqueness constraint.
///
/// The two variants drive the two recovery paths of record creation:
/// a code collision is retried once with a fresh code, while an owner+URL
/// collision resolves to the pre-existing record (idempotent creation).
#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    /// Another record already holds this short code. Can happen despite the
    /// optimistic pre-check when two requests race on the same candidate.
    #[error("short code already exists")]
    DuplicateShortCode,

    /// The owner already has an active record for this original URL.
    #[error("owner already has an active short link for this URL")]
    DuplicateOwnerUrl,

    /// Any other store failure.
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Repository interface for short URL records.
///
/// Creation and click recording are atomic single-record operations; the
/// store enforces the short-code and owner+URL uniqueness constraints that
/// creation relies on for race-condition recovery.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-memory,
///   used by tests and local development
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Atomically inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::DuplicateShortCode`] or
    /// [`InsertError::DuplicateOwnerUrl`] when the corresponding uniqueness
    /// constraint rejects the insert, [`InsertError::Store`] otherwise.
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrlRecord, InsertError>;

    /// Finds a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError>;

    /// Finds a record by its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrlRecord>, AppError>;

    /// Finds the active record an owner holds for an original URL, if any.
    ///
    /// Backs the idempotent-duplicate-creation recovery path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_active_by_owner_url(
        &self,
        owner_id: i64,
        original_url: &str,
    ) -> Result<Option<ShortUrlRecord>, AppError>;

    /// Applies one click to a record as a single atomic update.
    ///
    /// In one indivisible step: increments `click_count`, sets
    /// `last_clicked_at` to the entry's timestamp, appends the entry to the
    /// recent-clicks window (evicting the oldest beyond 1000), and upserts
    /// the daily rollup for the entry's calendar day (evicting the oldest
    /// beyond 365). Concurrent calls never lose updates.
    ///
    /// Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record does not exist.
    /// Returns [`AppError::Internal`] on store errors.
    async fn record_click(&self, id: i64, entry: ClickEntry) -> Result<ShortUrlRecord, AppError>;
}
