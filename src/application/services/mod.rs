//! Business logic services.

mod analytics_service;
mod click_service;
mod shortener_service;

pub use analytics_service::{AnalyticsService, AnalyticsSummary, RecentWindow, ReferrerCount};
pub use click_service::ClickService;
pub use shortener_service::ShortenerService;
