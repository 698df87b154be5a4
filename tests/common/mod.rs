#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use snaplink::application::services::{AnalyticsService, ClickService, ShortenerService};
use snaplink::domain::account_worker::AccountEvent;
use snaplink::domain::click_event::ClickEvent;
use snaplink::domain::entities::ClickEntry;
use snaplink::domain::repositories::UrlRepository;
use snaplink::infrastructure::persistence::MemoryUrlRepository;
use snaplink::state::AppState;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "https://sn.ap";

/// Memory-backed application wiring for integration tests.
///
/// Both background queues are kept open through their receivers so events can
/// be asserted on instead of being silently dropped.
pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<MemoryUrlRepository>,
    pub click_service: Arc<ClickService>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
    pub account_rx: mpsc::Receiver<AccountEvent>,
}

pub fn create_test_context() -> TestContext {
    let repository = Arc::new(MemoryUrlRepository::new());
    let url_repository: Arc<dyn UrlRepository> = repository.clone();

    let (click_tx, click_rx) = mpsc::channel(2048);
    let (account_tx, account_rx) = mpsc::channel(2048);

    let click_service = Arc::new(ClickService::new(
        url_repository.clone(),
        account_tx.clone(),
    ));

    let state = AppState {
        shortener_service: Arc::new(ShortenerService::new(
            url_repository.clone(),
            account_tx,
            BASE_URL.to_string(),
        )),
        analytics_service: Arc::new(AnalyticsService::new(url_repository)),
        click_tx,
    };

    TestContext {
        state,
        repository,
        click_service,
        click_rx,
        account_rx,
    }
}

/// A click entry backdated by `hours_ago`, with an optional referer.
pub fn click_entry(hours_ago: i64, referer: Option<&str>) -> ClickEntry {
    ClickEntry {
        clicked_at: Utc::now() - Duration::hours(hours_ago),
        ip: Some("10.0.0.1".to_string()),
        user_agent: Some("test-agent".to_string()),
        referer: referer.map(|s| s.to_string()),
    }
}
