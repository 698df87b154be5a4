//! DTOs for the analytics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::AnalyticsSummary;

/// Analytics summary response for one short URL.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub code: String,
    pub original_url: String,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub weekly_clicks: i64,
    pub monthly_clicks: i64,
    pub recent_clicks: RecentClicksDto,
    pub top_referrers: Vec<ReferrerDto>,
    pub click_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct RecentClicksDto {
    pub last_24_hours: usize,
    pub last_7_days: usize,
}

#[derive(Debug, Serialize)]
pub struct ReferrerDto {
    pub host: String,
    pub clicks: i64,
}

impl From<AnalyticsSummary> for StatsResponse {
    fn from(summary: AnalyticsSummary) -> Self {
        Self {
            code: summary.short_code,
            original_url: summary.original_url,
            total_clicks: summary.total_clicks,
            created_at: summary.created_at,
            last_clicked_at: summary.last_clicked_at,
            weekly_clicks: summary.weekly_clicks,
            monthly_clicks: summary.monthly_clicks,
            recent_clicks: RecentClicksDto {
                last_24_hours: summary.recent.last_24_hours,
                last_7_days: summary.recent.last_7_days,
            },
            top_referrers: summary
                .top_referrers
                .into_iter()
                .map(|r| ReferrerDto {
                    host: r.host,
                    clicks: r.clicks,
                })
                .collect(),
            click_rate: summary.click_rate,
        }
    }
}
