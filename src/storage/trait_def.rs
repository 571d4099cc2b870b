use crate::models::{ClickEvent, UrlRecord};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short code already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Port to the document store. URL records are keyed by short code; click
/// events are append-only and range-queried by `(short_code, timestamp)`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Insert a new URL record. Fails with [`StorageError::Conflict`] if the
    /// short code is already taken; never overwrites.
    async fn create(&self, record: &UrlRecord) -> StorageResult<()>;

    /// Get a URL record by short code
    async fn get(&self, short_code: &str) -> Result<Option<UrlRecord>>;

    /// Delete a URL record; returns whether anything was deleted
    async fn delete(&self, short_code: &str) -> Result<bool>;

    /// List URL records ordered by creation time descending, newest first
    async fn list(&self, limit: i64) -> Result<Vec<UrlRecord>>;

    /// Atomically increment the click counter. Must be an atomic add at the
    /// storage layer, not read-modify-write in request code.
    async fn increment_clicks(&self, short_code: &str) -> Result<()>;

    /// Append a click event
    async fn append_event(&self, event: &ClickEvent) -> Result<()>;

    /// Click events for one short code with `from <= timestamp <= to`,
    /// ordered by timestamp ascending. Bounds are canonical event timestamp
    /// strings, compared lexicographically.
    async fn events_in_range(
        &self,
        short_code: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<ClickEvent>>;
}
