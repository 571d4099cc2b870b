use crate::models::{ClickEvent, UrlRecord};
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                short_code TEXT NOT NULL UNIQUE,
                original_url TEXT NOT NULL,
                click_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_urls_created_at ON urls(created_at)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS click_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                short_code TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                user_agent TEXT NOT NULL,
                browser TEXT NOT NULL,
                browser_version TEXT NOT NULL,
                os TEXT NOT NULL,
                device_type TEXT NOT NULL,
                referrer TEXT NOT NULL,
                referrer_domain TEXT NOT NULL,
                country TEXT NOT NULL,
                region TEXT NOT NULL,
                city TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_events_code_ts ON click_events(short_code, timestamp)",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn create(&self, record: &UrlRecord) -> StorageResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO urls (short_code, original_url, click_count, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(short_code) DO NOTHING
            "#,
        )
        .bind(&record.short_code)
        .bind(&record.original_url)
        .bind(record.click_count)
        .bind(&record.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }

        Ok(())
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlRecord>> {
        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT short_code, original_url, click_count, created_at
            FROM urls
            WHERE short_code = ?
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn delete(&self, short_code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM urls WHERE short_code = ?")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, limit: i64) -> Result<Vec<UrlRecord>> {
        let records = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT short_code, original_url, click_count, created_at
            FROM urls
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE urls
            SET click_count = click_count + 1
            WHERE short_code = ?
            "#,
        )
        .bind(short_code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn append_event(&self, event: &ClickEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO click_events (
                short_code, timestamp, user_agent, browser, browser_version,
                os, device_type, referrer, referrer_domain, country, region, city
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.short_code)
        .bind(&event.timestamp)
        .bind(&event.user_agent)
        .bind(&event.browser)
        .bind(&event.browser_version)
        .bind(&event.os)
        .bind(&event.device_type)
        .bind(&event.referrer)
        .bind(&event.referrer_domain)
        .bind(&event.country)
        .bind(&event.region)
        .bind(&event.city)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn events_in_range(
        &self,
        short_code: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<ClickEvent>> {
        let events = sqlx::query_as::<_, ClickEvent>(
            r#"
            SELECT short_code, timestamp, user_agent, browser, browser_version,
                   os, device_type, referrer, referrer_domain, country, region, city
            FROM click_events
            WHERE short_code = ? AND timestamp BETWEEN ? AND ?
            ORDER BY timestamp ASC
            "#,
        )
        .bind(short_code)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(events)
    }
}
