//! Core business entities.

mod short_url;

pub use short_url::{
    ClickEntry, DailyStat, MAX_DAILY_STATS, MAX_RECENT_CLICKS, NewShortUrl, ShortUrlRecord,
};
