//! Short URL record: the single document every operation revolves around.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of click events retained in the recent-clicks window.
///
/// Older entries are evicted FIFO once the bound is exceeded.
pub const MAX_RECENT_CLICKS: usize = 1000;

/// Maximum number of per-day rollup entries retained per record.
pub const MAX_DAILY_STATS: usize = 365;

/// A single click event kept in the bounded recent-clicks window.
///
/// Stored inline on the record (JSONB in Postgres), insertion order is
/// chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickEntry {
    pub clicked_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ClickEntry {
    /// Creates a click entry timestamped now.
    pub fn new(ip: Option<String>, user_agent: Option<String>, referer: Option<String>) -> Self {
        Self {
            clicked_at: Utc::now(),
            ip,
            user_agent,
            referer,
        }
    }

    /// The UTC calendar day this click belongs to in the daily rollup.
    pub fn day(&self) -> NaiveDate {
        self.clicked_at.date_naive()
    }
}

/// One aggregated count-per-day entry of the daily rollup.
///
/// `date` is unique within a record's rollup sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub clicks: i64,
}

/// A shortened URL record with its embedded analytics state.
///
/// Exactly one record exists per `short_code`; the store's uniqueness
/// constraint on the code is what redirect lookup depends on.
#[derive(Debug, Clone)]
pub struct ShortUrlRecord {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub click_count: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Up to [`MAX_RECENT_CLICKS`] most recent click events, oldest first.
    pub recent_clicks: Vec<ClickEntry>,
    /// Up to [`MAX_DAILY_STATS`] rollup entries, oldest first, one per day.
    pub daily_stats: Vec<DailyStat>,
}

impl ShortUrlRecord {
    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }

    /// Returns true if the record may serve redirects: active and not expired.
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.is_expired()
    }
}

/// Input data for creating a new short URL record.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}
