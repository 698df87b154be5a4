//! Short URL creation service: code allocation and collision recovery.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

use crate::domain::account_worker::AccountEvent;
use crate::domain::entities::{NewShortUrl, ShortUrlRecord};
use crate::domain::repositories::{InsertError, UrlRepository};
use crate::error::AppError;
use crate::utils::code_generator::{
    DEFAULT_CODE_LENGTH, MAX_GENERATE_ATTEMPTS, fallback_code, random_code, validate_code,
};
use crate::utils::url_normalizer::normalize_url;
use chrono::{DateTime, Utc};

/// Service for creating shortened URLs.
///
/// Owns the optimistic generate-then-check code allocation and both
/// store-collision recovery paths. True code uniqueness is guaranteed by the
/// store's constraint, not by the optimistic pre-check: two concurrent
/// requests can both pass the pre-check for the same candidate, and the
/// losing insert is retried exactly once with a fresh code.
pub struct ShortenerService {
    repository: Arc<dyn UrlRepository>,
    account_tx: mpsc::Sender<AccountEvent>,
    base_url: String,
}

impl ShortenerService {
    /// Creates a new shortener service.
    ///
    /// `base_url` is the configured public prefix for derived short URLs,
    /// threaded in explicitly at construction time.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        account_tx: mpsc::Sender<AccountEvent>,
        base_url: String,
    ) -> Self {
        Self {
            repository,
            account_tx,
            base_url,
        }
    }

    /// Creates a short URL record.
    ///
    /// # Deduplication
    ///
    /// An owner holding an active record for the same normalized URL gets
    /// that record back instead of a second code. This also holds under
    /// concurrency: when two identical requests race past the pre-check,
    /// the store's owner+URL constraint rejects the second insert and the
    /// loser transparently receives the winner's record.
    ///
    /// # Code allocation
    ///
    /// - With `custom_code`: validated against the alphabet/length rules and
    ///   checked for exclusivity; a taken code is a conflict, not retried.
    /// - Without: a random 6-character code, up to 50 optimistic attempts,
    ///   then a timestamp-based fallback checked once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed URL or custom code,
    /// [`AppError::Conflict`] for a taken custom code or when the one
    /// post-insert collision retry also collides (transient; the caller may
    /// retry), and [`AppError::Internal`] when code generation is exhausted
    /// or the store fails.
    pub async fn create_short_url(
        &self,
        original_url: String,
        owner_id: Option<i64>,
        custom_code: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShortUrlRecord, AppError> {
        let normalized_url = normalize_url(&original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(owner) = owner_id
            && let Some(existing) = self
                .repository
                .find_active_by_owner_url(owner, &normalized_url)
                .await?
        {
            return Ok(existing);
        }

        let is_custom = custom_code.is_some();
        let code = if let Some(custom) = custom_code {
            validate_code(&custom)?;

            if self.repository.find_by_code(&custom).await?.is_some() {
                return Err(AppError::conflict(
                    "Custom code already exists",
                    json!({ "code": custom }),
                ));
            }

            custom
        } else {
            self.generate_unique_code(DEFAULT_CODE_LENGTH).await?
        };

        let record = self
            .insert_with_recovery(
                NewShortUrl {
                    short_code: code,
                    original_url: normalized_url,
                    owner_id,
                    expires_at,
                },
                is_custom,
            )
            .await?;

        if let Some(owner) = record.owner_id {
            // Aggregate counters are best-effort; a full queue drops the event.
            let _ = self
                .account_tx
                .try_send(AccountEvent::LinkCreated { owner_id: owner });
        }

        Ok(record)
    }

    /// Retrieves a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches the code.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_by_code(&self, code: &str) -> Result<ShortUrlRecord, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// The full short URL for a code, derived from the configured base URL.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    /// Attempts the insert, recovering from uniqueness violations.
    ///
    /// A short-code collision on a generated code gets exactly one fresh
    /// code and one more insert; bounding the retry keeps worst-case latency
    /// flat even if the code space were saturated. An owner+URL collision
    /// resolves to the concurrently created record.
    async fn insert_with_recovery(
        &self,
        mut new_url: NewShortUrl,
        is_custom: bool,
    ) -> Result<ShortUrlRecord, AppError> {
        match self.repository.insert(new_url.clone()).await {
            Ok(record) => return Ok(record),
            Err(InsertError::DuplicateShortCode) => {
                if is_custom {
                    return Err(AppError::conflict(
                        "Custom code already exists",
                        json!({ "code": new_url.short_code }),
                    ));
                }
            }
            Err(InsertError::DuplicateOwnerUrl) => {
                return self.resolve_owner_url_conflict(&new_url).await;
            }
            Err(InsertError::Store(e)) => return Err(e),
        }

        // Lost the race on a generated code; one fresh code, one more try.
        new_url.short_code = random_code(DEFAULT_CODE_LENGTH);

        match self.repository.insert(new_url.clone()).await {
            Ok(record) => Ok(record),
            Err(InsertError::DuplicateShortCode) => Err(AppError::conflict(
                "Short code collision retry failed, please retry the request",
                json!({ "code": new_url.short_code }),
            )),
            Err(InsertError::DuplicateOwnerUrl) => self.resolve_owner_url_conflict(&new_url).await,
            Err(InsertError::Store(e)) => Err(e),
        }
    }

    /// Returns the record that won a concurrent owner+URL race.
    async fn resolve_owner_url_conflict(
        &self,
        new_url: &NewShortUrl,
    ) -> Result<ShortUrlRecord, AppError> {
        let Some(owner) = new_url.owner_id else {
            // The owner+URL constraint only covers owned records.
            return Err(AppError::internal(
                "Owner URL conflict without an owner",
                json!({}),
            ));
        };

        self.repository
            .find_active_by_owner_url(owner, &new_url.original_url)
            .await?
            .ok_or_else(|| {
                AppError::internal(
                    "Conflicting record disappeared during creation",
                    json!({ "owner_id": owner }),
                )
            })
    }

    /// Generates a short code no existing record holds.
    ///
    /// Up to [`MAX_GENERATE_ATTEMPTS`] random candidates are checked
    /// optimistically against the store; if all collide (plausible only at
    /// extreme saturation) a timestamp-based fallback is checked once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if even the fallback collides.
    async fn generate_unique_code(&self, length: usize) -> Result<String, AppError> {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let code = random_code(length);

            if self.repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
        }

        let fallback = fallback_code(length);
        if self.repository.find_by_code(&fallback).await?.is_none() {
            return Ok(fallback);
        }

        Err(AppError::internal(
            "Short code generation exhausted",
            json!({ "attempts": MAX_GENERATE_ATTEMPTS + 1 }),
        ))
    }
}
