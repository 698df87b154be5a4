//! Click recording service.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::account_worker::AccountEvent;
use crate::domain::entities::ClickEntry;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Service applying clicks to URL records.
///
/// The record update is one atomic store operation (increment + recent-click
/// append + daily rollup); the owner's aggregate counter is a secondary
/// best-effort write queued to the account worker afterwards, never blocking
/// or failing the click itself.
pub struct ClickService {
    repository: Arc<dyn UrlRepository>,
    account_tx: mpsc::Sender<AccountEvent>,
}

impl ClickService {
    /// Creates a new click service.
    pub fn new(repository: Arc<dyn UrlRepository>, account_tx: mpsc::Sender<AccountEvent>) -> Self {
        Self {
            repository,
            account_tx,
        }
    }

    /// Records one click against a record, returning the updated click count.
    ///
    /// Callers on the redirect path must log and swallow the error: a failed
    /// analytics write never prevents a redirect (the click worker does
    /// exactly that).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record does not exist.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn record_click(&self, record_id: i64, entry: ClickEntry) -> Result<i64, AppError> {
        let record = self.repository.record_click(record_id, entry).await?;

        if let Some(owner_id) = record.owner_id
            && self
                .account_tx
                .try_send(AccountEvent::Click { owner_id })
                .is_err()
        {
            // Queue full or worker gone; aggregate counters are best-effort.
            tracing::debug!(owner_id, "Dropped account click event");
        }

        Ok(record.click_count)
    }
}
