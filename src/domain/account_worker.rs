//! Background worker for best-effort owner-account aggregates.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::{
    Retry,
    strategy::{ExponentialBackoff, jitter},
};

use crate::domain::repositories::AccountRepository;

/// A counter update destined for an owner account.
///
/// Queued after the primary operation has already succeeded; losing one of
/// these skews an aggregate counter but never a record's own analytics.
#[derive(Debug, Clone)]
pub enum AccountEvent {
    /// One click landed on a record owned by `owner_id`.
    Click { owner_id: i64 },
    /// A new short link was created by `owner_id`.
    LinkCreated { owner_id: i64 },
}

/// Consumes account events and applies them with bounded retries.
///
/// Each update is retried up to three times with jittered exponential
/// backoff; a final failure is logged and the event dropped. The request
/// that queued the event has already completed by the time it is processed.
pub async fn run_account_worker(
    mut rx: mpsc::Receiver<AccountEvent>,
    repository: Arc<dyn AccountRepository>,
) {
    while let Some(event) = rx.recv().await {
        // 50ms, 100ms, 200ms (pre-jitter).
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(25)
            .map(jitter)
            .take(3);

        let result = match &event {
            AccountEvent::Click { owner_id } => {
                let owner_id = *owner_id;
                Retry::spawn(strategy, || repository.add_clicks(owner_id, 1)).await
            }
            AccountEvent::LinkCreated { owner_id } => {
                let owner_id = *owner_id;
                Retry::spawn(strategy, || repository.add_link(owner_id)).await
            }
        };

        if let Err(e) = result {
            tracing::warn!(?event, "Dropping account aggregate update: {e}");
        }
    }

    tracing::debug!("Account worker stopped: channel closed");
}
