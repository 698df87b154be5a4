//! Shared application state injected into handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AnalyticsService, ShortenerService};
use crate::domain::click_event::ClickEvent;

/// Shared state: services plus the click-event queue handle.
///
/// Handlers never talk to repositories directly; the click queue is the only
/// write path the redirect handler touches.
#[derive(Clone)]
pub struct AppState {
    pub shortener_service: Arc<ShortenerService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub click_tx: mpsc::Sender<ClickEvent>,
}
