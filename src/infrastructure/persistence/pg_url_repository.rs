//! PostgreSQL implementation of the shortcode store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{StoreError, UrlRepository};

/// PostgreSQL repository for shortcode mappings.
///
/// Uses SQLx prepared statements. Inserts are conditional on the shortcode
/// primary key, so an existing record is never overwritten.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

#[derive(sqlx::FromRow)]
struct UrlRow {
    shortcode: String,
    long_url: String,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(row.shortcode, row.long_url, row.created_at)
    }
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Counts stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on database errors.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_code(&self, shortcode: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT shortcode, long_url, created_at
            FROM urls
            WHERE shortcode = $1
            "#,
        )
        .bind(shortcode)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn insert_if_absent(&self, record: UrlRecord) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO urls (shortcode, long_url, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (shortcode) DO NOTHING
            "#,
        )
        .bind(&record.shortcode)
        .bind(&record.long_url)
        .bind(record.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
