//! In-memory storage, used by tests and as an injectable stand-in for the
//! managed store.

use crate::models::{ClickEvent, UrlRecord};
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStorage {
    urls: RwLock<HashMap<String, UrlRecord>>,
    events: RwLock<Vec<ClickEvent>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, record: &UrlRecord) -> StorageResult<()> {
        let mut urls = self.urls.write().await;
        if urls.contains_key(&record.short_code) {
            return Err(StorageError::Conflict);
        }
        urls.insert(record.short_code.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlRecord>> {
        Ok(self.urls.read().await.get(short_code).cloned())
    }

    async fn delete(&self, short_code: &str) -> Result<bool> {
        Ok(self.urls.write().await.remove(short_code).is_some())
    }

    async fn list(&self, limit: i64) -> Result<Vec<UrlRecord>> {
        let mut records: Vec<UrlRecord> = self.urls.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<()> {
        if let Some(record) = self.urls.write().await.get_mut(short_code) {
            record.click_count += 1;
        }
        Ok(())
    }

    async fn append_event(&self, event: &ClickEvent) -> Result<()> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn events_in_range(
        &self,
        short_code: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<ClickEvent>> {
        let mut events: Vec<ClickEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| {
                e.short_code == short_code
                    && e.timestamp.as_str() >= from
                    && e.timestamp.as_str() <= to
            })
            .cloned()
            .collect();
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(events)
    }
}
