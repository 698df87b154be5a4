//! Background worker draining the click-event queue.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::ClickService;
use crate::domain::click_event::ClickEvent;

/// Consumes click events and records them against their URL records.
///
/// Each event becomes one atomic store update via
/// [`ClickService::record_click`]. A failed update is logged and dropped:
/// analytics is best-effort, and by the time the worker sees the event the
/// redirect has long been served.
///
/// Runs until the sending side of the channel is closed.
pub async fn run_click_worker(mut rx: mpsc::Receiver<ClickEvent>, service: Arc<ClickService>) {
    while let Some(event) = rx.recv().await {
        let record_id = event.record_id;

        if let Err(e) = service.record_click(record_id, event.into_entry()).await {
            tracing::warn!(record_id, "Failed to record click: {e}");
        }
    }

    tracing::debug!("Click worker stopped: channel closed");
}
