//! In-memory repository implementations.
//!
//! Back the repository traits with a mutex-guarded map: every operation runs
//! under the lock, which gives the same per-record atomicity the Postgres
//! backend gets from row locking. Used by the integration tests and handy
//! for running the service locally without a database.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::entities::{
    ClickEntry, DailyStat, MAX_DAILY_STATS, MAX_RECENT_CLICKS, NewShortUrl, ShortUrlRecord,
};
use crate::domain::repositories::{AccountRepository, InsertError, UrlRepository};
use crate::error::AppError;

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    records: HashMap<i64, ShortUrlRecord>,
}

/// In-memory URL record repository.
#[derive(Default)]
pub struct MemoryUrlRepository {
    inner: Mutex<MemoryInner>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records. Test helper.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("repository lock poisoned").records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrlRecord, InsertError> {
        let mut inner = self.inner.lock().expect("repository lock poisoned");

        if inner
            .records
            .values()
            .any(|r| r.short_code == new_url.short_code)
        {
            return Err(InsertError::DuplicateShortCode);
        }

        if let Some(owner) = new_url.owner_id
            && inner.records.values().any(|r| {
                r.owner_id == Some(owner) && r.original_url == new_url.original_url && r.is_active
            })
        {
            return Err(InsertError::DuplicateOwnerUrl);
        }

        inner.next_id += 1;
        let record = ShortUrlRecord {
            id: inner.next_id,
            short_code: new_url.short_code,
            original_url: new_url.original_url,
            owner_id: new_url.owner_id,
            click_count: 0,
            last_clicked_at: None,
            is_active: true,
            expires_at: new_url.expires_at,
            created_at: chrono::Utc::now(),
            recent_clicks: Vec::new(),
            daily_stats: Vec::new(),
        };

        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        let inner = self.inner.lock().expect("repository lock poisoned");
        Ok(inner
            .records
            .values()
            .find(|r| r.short_code == code)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrlRecord>, AppError> {
        let inner = self.inner.lock().expect("repository lock poisoned");
        Ok(inner.records.get(&id).cloned())
    }

    async fn find_active_by_owner_url(
        &self,
        owner_id: i64,
        original_url: &str,
    ) -> Result<Option<ShortUrlRecord>, AppError> {
        let inner = self.inner.lock().expect("repository lock poisoned");
        Ok(inner
            .records
            .values()
            .find(|r| {
                r.owner_id == Some(owner_id) && r.original_url == original_url && r.is_active
            })
            .cloned())
    }

    async fn record_click(&self, id: i64, entry: ClickEntry) -> Result<ShortUrlRecord, AppError> {
        let mut inner = self.inner.lock().expect("repository lock poisoned");

        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))?;

        record.click_count += 1;
        record.last_clicked_at = Some(entry.clicked_at);

        let day = entry.day();
        record.recent_clicks.push(entry);
        if record.recent_clicks.len() > MAX_RECENT_CLICKS {
            let excess = record.recent_clicks.len() - MAX_RECENT_CLICKS;
            record.recent_clicks.drain(..excess);
        }

        match record.daily_stats.iter_mut().find(|d| d.date == day) {
            Some(stat) => stat.clicks += 1,
            None => {
                record.daily_stats.push(DailyStat { date: day, clicks: 1 });
                if record.daily_stats.len() > MAX_DAILY_STATS {
                    let excess = record.daily_stats.len() - MAX_DAILY_STATS;
                    record.daily_stats.drain(..excess);
                }
            }
        }

        Ok(record.clone())
    }
}

/// In-memory account aggregate repository.
#[derive(Default)]
pub struct MemoryAccountRepository {
    totals: Mutex<HashMap<i64, (i64, i64)>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(total_clicks, total_links)` for an owner. Test helper.
    pub fn totals(&self, owner_id: i64) -> (i64, i64) {
        self.totals
            .lock()
            .expect("repository lock poisoned")
            .get(&owner_id)
            .copied()
            .unwrap_or((0, 0))
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn add_clicks(&self, owner_id: i64, clicks: i64) -> Result<(), AppError> {
        let mut totals = self.totals.lock().expect("repository lock poisoned");
        totals.entry(owner_id).or_insert((0, 0)).0 += clicks;
        Ok(())
    }

    async fn add_link(&self, owner_id: i64) -> Result<(), AppError> {
        let mut totals = self.totals.lock().expect("repository lock poisoned");
        totals.entry(owner_id).or_insert((0, 0)).1 += 1;
        Ok(())
    }
}
