//! PostgreSQL implementation of the account aggregate repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::AccountRepository;
use crate::error::AppError;

/// PostgreSQL repository for owner-account aggregate counters.
pub struct PgAccountRepository {
    pool: Arc<PgPool>,
}

impl PgAccountRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn add_clicks(&self, owner_id: i64, clicks: i64) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE accounts SET total_clicks = total_clicks + $2 WHERE id = $1")
                .bind(owner_id)
                .bind(clicks)
                .execute(self.pool.as_ref())
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::internal(
                "Account not found for aggregate update",
                json!({ "owner_id": owner_id }),
            ));
        }

        Ok(())
    }

    async fn add_link(&self, owner_id: i64) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE accounts SET total_links = total_links + 1 WHERE id = $1")
                .bind(owner_id)
                .execute(self.pool.as_ref())
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::internal(
                "Account not found for aggregate update",
                json!({ "owner_id": owner_id }),
            ));
        }

        Ok(())
    }
}
