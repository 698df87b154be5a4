//! PostgreSQL implementation of the URL record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use sqlx::types::Json;
use std::sync::Arc;

use crate::domain::entities::{
    ClickEntry, DailyStat, MAX_DAILY_STATS, MAX_RECENT_CLICKS, NewShortUrl, ShortUrlRecord,
};
use crate::domain::repositories::{InsertError, UrlRepository};
use crate::error::AppError;
use crate::utils::db_error::{is_unique_violation_on_code, is_unique_violation_on_owner_url};

/// Row shape shared by every query returning a full record.
#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: i64,
    short_code: String,
    original_url: String,
    owner_id: Option<i64>,
    click_count: i64,
    last_clicked_at: Option<DateTime<Utc>>,
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    recent_clicks: Json<Vec<ClickEntry>>,
    daily_stats: Json<Vec<DailyStat>>,
}

impl From<ShortUrlRow> for ShortUrlRecord {
    fn from(row: ShortUrlRow) -> Self {
        Self {
            id: row.id,
            short_code: row.short_code,
            original_url: row.original_url,
            owner_id: row.owner_id,
            click_count: row.click_count,
            last_clicked_at: row.last_clicked_at,
            is_active: row.is_active,
            expires_at: row.expires_at,
            created_at: row.created_at,
            recent_clicks: row.recent_clicks.0,
            daily_stats: row.daily_stats.0,
        }
    }
}

const RECORD_COLUMNS: &str = "id, short_code, original_url, owner_id, click_count, \
     last_clicked_at, is_active, expires_at, created_at, recent_clicks, daily_stats";

/// PostgreSQL repository for short URL records.
///
/// Relies on two server-side unique indexes as the concurrency safety net:
/// `short_urls_code_key` on `short_code` and the partial
/// `short_urls_owner_url_active_key` on `(owner_id, original_url)` over
/// active rows. Click recording is a single `UPDATE` whose SET expressions
/// read the row's previous values, so Postgres row locking serializes
/// concurrent clicks without losing any.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrlRecord, InsertError> {
        let sql = format!(
            "INSERT INTO short_urls (short_code, original_url, owner_id, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {RECORD_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(&new_url.short_code)
            .bind(&new_url.original_url)
            .bind(new_url.owner_id)
            .bind(new_url.expires_at)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on_code(&e) {
                    InsertError::DuplicateShortCode
                } else if is_unique_violation_on_owner_url(&e) {
                    InsertError::DuplicateOwnerUrl
                } else {
                    InsertError::Store(e.into())
                }
            })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM short_urls WHERE short_code = $1");

        let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortUrlRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM short_urls WHERE id = $1");

        let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_active_by_owner_url(
        &self,
        owner_id: i64,
        original_url: &str,
    ) -> Result<Option<ShortUrlRecord>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM short_urls \
             WHERE owner_id = $1 AND original_url = $2 AND is_active"
        );

        let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(owner_id)
            .bind(original_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn record_click(&self, id: i64, entry: ClickEntry) -> Result<ShortUrlRecord, AppError> {
        // One statement applies the whole click: counter, timestamp, bounded
        // append to recent_clicks, and the daily rollup upsert. The rollup
        // branch either bumps today's element in place or appends a fresh
        // one, then both windows keep only their most recent N elements.
        let sql = format!(
            r#"
            UPDATE short_urls
            SET click_count = click_count + 1,
                last_clicked_at = $2,
                recent_clicks = (
                    SELECT COALESCE(jsonb_agg(elem ORDER BY ord), '[]'::jsonb)
                    FROM (
                        SELECT elem, ord
                        FROM jsonb_array_elements(recent_clicks || $3::jsonb)
                             WITH ORDINALITY AS appended(elem, ord)
                        ORDER BY ord DESC
                        LIMIT $4
                    ) AS tail
                ),
                daily_stats = (
                    SELECT COALESCE(jsonb_agg(day ORDER BY ord), '[]'::jsonb)
                    FROM (
                        SELECT day, ord
                        FROM jsonb_array_elements(
                            CASE
                                WHEN EXISTS (
                                    SELECT 1 FROM jsonb_array_elements(daily_stats) AS existing(v)
                                    WHERE v->>'date' = $5
                                )
                                THEN (
                                    SELECT jsonb_agg(
                                        CASE
                                            WHEN v->>'date' = $5
                                            THEN jsonb_set(v, '{{clicks}}',
                                                 to_jsonb((v->>'clicks')::bigint + 1))
                                            ELSE v
                                        END ORDER BY day_ord)
                                    FROM jsonb_array_elements(daily_stats)
                                         WITH ORDINALITY AS days(v, day_ord)
                                )
                                ELSE daily_stats
                                     || jsonb_build_array(
                                            jsonb_build_object('date', $5::text, 'clicks', 1))
                            END
                        ) WITH ORDINALITY AS rolled(day, ord)
                        ORDER BY ord DESC
                        LIMIT $6
                    ) AS tail
                )
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let entry_json = serde_json::to_value(&entry)
            .map_err(|e| AppError::internal("Failed to encode click entry", json!({ "reason": e.to_string() })))?;
        let day = entry.day().to_string();

        let row = sqlx::query_as::<_, ShortUrlRow>(&sql)
            .bind(id)
            .bind(entry.clicked_at)
            .bind(entry_json)
            .bind(MAX_RECENT_CLICKS as i64)
            .bind(day)
            .bind(MAX_DAILY_STATS as i64)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }
}
