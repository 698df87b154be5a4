//! Analytics reader: derives summaries from stored click data.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Days, Duration, Utc};
use serde_json::json;

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::referrer::referrer_host;

/// How many referrer hostnames the top-referrers ranking keeps.
const TOP_REFERRERS_LIMIT: usize = 10;

/// Click counts over the recent-clicks window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentWindow {
    pub last_24_hours: usize,
    pub last_7_days: usize,
}

/// One referrer hostname and its click count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferrerCount {
    pub host: String,
    pub clicks: i64,
}

/// Analytics summary for a single short URL.
///
/// Derived entirely from the record's stored recent clicks and daily
/// rollups; computing it writes nothing.
#[derive(Debug, Clone)]
pub struct AnalyticsSummary {
    pub short_code: String,
    pub original_url: String,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
    /// Sum of daily rollups dated within the last 7 days.
    pub weekly_clicks: i64,
    /// Sum of daily rollups dated within the last 30 days.
    pub monthly_clicks: i64,
    pub recent: RecentWindow,
    /// Referrer hostnames by click count, descending; entries without a
    /// parseable referrer are excluded.
    pub top_referrers: Vec<ReferrerCount>,
    /// Average clicks per day since creation, rounded to two decimals.
    pub click_rate: f64,
}

/// Service computing analytics summaries.
pub struct AnalyticsService {
    repository: Arc<dyn UrlRepository>,
}

impl AnalyticsService {
    /// Creates a new analytics service.
    pub fn new(repository: Arc<dyn UrlRepository>) -> Self {
        Self { repository }
    }

    /// Computes the analytics summary for a short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches the code.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_analytics(&self, code: &str) -> Result<AnalyticsSummary, AppError> {
        let record = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        let now = Utc::now();
        let today = now.date_naive();
        let week_ago = today - Days::new(7);
        let month_ago = today - Days::new(30);

        let weekly_clicks = record
            .daily_stats
            .iter()
            .filter(|d| d.date >= week_ago)
            .map(|d| d.clicks)
            .sum();
        let monthly_clicks = record
            .daily_stats
            .iter()
            .filter(|d| d.date >= month_ago)
            .map(|d| d.clicks)
            .sum();

        let day_cutoff = now - Duration::hours(24);
        let week_cutoff = now - Duration::days(7);
        let recent = RecentWindow {
            last_24_hours: record
                .recent_clicks
                .iter()
                .filter(|c| c.clicked_at >= day_cutoff)
                .count(),
            last_7_days: record
                .recent_clicks
                .iter()
                .filter(|c| c.clicked_at >= week_cutoff)
                .count(),
        };

        let top_referrers = top_referrers(
            record
                .recent_clicks
                .iter()
                .filter_map(|c| c.referer.as_deref()),
        );

        let days_since_creation = (now - record.created_at).num_days().max(1);
        let click_rate = round2(record.click_count as f64 / days_since_creation as f64);

        Ok(AnalyticsSummary {
            short_code: record.short_code,
            original_url: record.original_url,
            total_clicks: record.click_count,
            created_at: record.created_at,
            last_clicked_at: record.last_clicked_at,
            weekly_clicks,
            monthly_clicks,
            recent,
            top_referrers,
            click_rate,
        })
    }
}

/// Ranks referrer hostnames by click count.
///
/// Unparseable referrers are dropped, not bucketed as "unknown". Ties break
/// alphabetically so the ranking is stable.
fn top_referrers<'a>(referers: impl Iterator<Item = &'a str>) -> Vec<ReferrerCount> {
    let mut counts: HashMap<String, i64> = HashMap::new();

    for referer in referers {
        if let Some(host) = referrer_host(referer) {
            *counts.entry(host).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<ReferrerCount> = counts
        .into_iter()
        .map(|(host, clicks)| ReferrerCount { host, clicks })
        .collect();

    ranked.sort_by(|a, b| b.clicks.cmp(&a.clicks).then_with(|| a.host.cmp(&b.host)));
    ranked.truncate(TOP_REFERRERS_LIMIT);
    ranked
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
