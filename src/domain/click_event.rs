//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::ClickEntry;

/// An in-memory representation of a click for async processing.
///
/// Created in the redirect handler with request metadata and sent over a
/// bounded channel to the click worker. This decouples the redirect response
/// from the store write: a slow or failing store never delays a redirect,
/// and a full queue drops the click (fire-and-forget).
///
/// The timestamp is captured at enqueue time, so the recorded click reflects
/// when the redirect was served, not when the worker got to it.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub record_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event timestamped now.
    pub fn new(
        record_id: i64,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            record_id,
            clicked_at: Utc::now(),
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
        }
    }

    /// Converts into the entry persisted on the record.
    pub fn into_entry(self) -> ClickEntry {
        ClickEntry {
            clicked_at: self.clicked_at,
            ip: self.ip,
            user_agent: self.user_agent,
            referer: self.referer,
        }
    }
}
