//! SQLite storage integration tests.
//!
//! A single-connection pool keeps the in-memory database shared across
//! queries.

use linklet::models::{ClickEvent, UrlRecord};
use linklet::storage::{SqliteStorage, Storage, StorageError};
use std::sync::Arc;

async fn sqlite_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

fn record(code: &str, created_at: &str) -> UrlRecord {
    UrlRecord {
        short_code: code.to_string(),
        original_url: format!("https://example.com/{code}"),
        click_count: 0,
        created_at: created_at.to_string(),
    }
}

fn event(code: &str, timestamp: &str, browser: &str) -> ClickEvent {
    ClickEvent {
        short_code: code.to_string(),
        timestamp: timestamp.to_string(),
        user_agent: "test".to_string(),
        browser: browser.to_string(),
        browser_version: "120".to_string(),
        os: "Windows".to_string(),
        device_type: "Desktop".to_string(),
        referrer: "Direct".to_string(),
        referrer_domain: "Direct".to_string(),
        country: "US".to_string(),
        region: "CA".to_string(),
        city: "San Francisco".to_string(),
    }
}

#[tokio::test]
async fn create_get_delete_roundtrip() {
    let storage = sqlite_storage().await;

    storage
        .create(&record("abc123", "2024-01-01T00:00:00.000Z"))
        .await
        .unwrap();

    let fetched = storage.get("abc123").await.unwrap().unwrap();
    assert_eq!(fetched.short_code, "abc123");
    assert_eq!(fetched.original_url, "https://example.com/abc123");
    assert_eq!(fetched.click_count, 0);
    assert_eq!(fetched.created_at, "2024-01-01T00:00:00.000Z");

    assert!(storage.delete("abc123").await.unwrap());
    assert!(storage.get("abc123").await.unwrap().is_none());
    assert!(!storage.delete("abc123").await.unwrap());
}

#[tokio::test]
async fn create_conflicts_instead_of_overwriting() {
    let storage = sqlite_storage().await;

    storage
        .create(&record("abc123", "2024-01-01T00:00:00.000Z"))
        .await
        .unwrap();

    let mut duplicate = record("abc123", "2024-06-01T00:00:00.000Z");
    duplicate.original_url = "https://evil.example.com".to_string();
    let err = storage.create(&duplicate).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    // The original record is untouched.
    let fetched = storage.get("abc123").await.unwrap().unwrap();
    assert_eq!(fetched.original_url, "https://example.com/abc123");
}

#[tokio::test]
async fn increment_is_atomic_add() {
    let storage = sqlite_storage().await;
    storage
        .create(&record("abc123", "2024-01-01T00:00:00.000Z"))
        .await
        .unwrap();

    for _ in 0..5 {
        storage.increment_clicks("abc123").await.unwrap();
    }

    let fetched = storage.get("abc123").await.unwrap().unwrap();
    assert_eq!(fetched.click_count, 5);
}

#[tokio::test]
async fn list_orders_by_created_at_descending() {
    let storage = sqlite_storage().await;
    storage
        .create(&record("old", "2024-01-01T00:00:00.000Z"))
        .await
        .unwrap();
    storage
        .create(&record("new", "2024-03-01T00:00:00.000Z"))
        .await
        .unwrap();
    storage
        .create(&record("mid", "2024-02-01T00:00:00.000Z"))
        .await
        .unwrap();

    let listed = storage.list(100).await.unwrap();
    let codes: Vec<&str> = listed.iter().map(|r| r.short_code.as_str()).collect();
    assert_eq!(codes, ["new", "mid", "old"]);

    let capped = storage.list(1).await.unwrap();
    assert_eq!(capped.len(), 1);
}

#[tokio::test]
async fn events_roundtrip_and_range_query() {
    let storage = sqlite_storage().await;

    storage
        .append_event(&event("abc123", "2024-01-15T10:05:00.000Z", "Chrome"))
        .await
        .unwrap();
    storage
        .append_event(&event("abc123", "2024-01-16T10:05:00.000Z", "Firefox"))
        .await
        .unwrap();
    storage
        .append_event(&event("abc123", "2024-02-01T00:00:00.000Z", "Safari"))
        .await
        .unwrap();
    storage
        .append_event(&event("other", "2024-01-15T12:00:00.000Z", "Chrome"))
        .await
        .unwrap();

    let events = storage
        .events_in_range(
            "abc123",
            "2024-01-01T00:00:00.000Z",
            "2024-01-31T23:59:59.999Z",
        )
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].timestamp, "2024-01-15T10:05:00.000Z");
    assert_eq!(events[0].browser, "Chrome");
    assert_eq!(events[0].city, "San Francisco");
    assert_eq!(events[1].browser, "Firefox");
}
