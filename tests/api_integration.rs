//! API integration tests for the shorten/list/stats/delete endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use linklet::analytics::{ClickRecorder, CountryNames};
use linklet::api::{self, AppState};
use linklet::config::{CollisionPolicy, Config, DatabaseConfig, ServerConfig};
use linklet::models::{now_timestamp, UrlRecord};
use linklet::storage::{MemoryStorage, Storage};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> Arc<Config> {
    Arc::new(Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        base_url: "http://sho.rt".to_string(),
        event_buffer_size: 1000,
        collision_policy: CollisionPolicy::Proceed,
    })
}

fn test_app() -> (Router, Arc<dyn Storage>) {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let recorder = ClickRecorder::new(Arc::clone(&storage), 1000);
    let state = Arc::new(AppState {
        storage: Arc::clone(&storage),
        recorder,
        config: test_config(),
        country_names: CountryNames::new(),
    });
    (api::create_router(state), storage)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn shorten_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/shorten")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn shorten_returns_created_with_generated_code() {
    let (app, _) = test_app();

    let response = app
        .oneshot(shorten_request(json!({"url": "https://example.com"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let code = body["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| b.is_ascii_alphanumeric()));
    assert_eq!(body["shortUrl"], format!("http://sho.rt/{code}"));
    assert_eq!(body["originalUrl"], "https://example.com");
}

#[tokio::test]
async fn shorten_accepts_custom_alias() {
    let (app, storage) = test_app();

    let response = app
        .oneshot(shorten_request(
            json!({"url": "https://example.com", "alias": "my-link"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["shortCode"], "my-link");

    let stored = storage.get("my-link").await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://example.com");
    assert_eq!(stored.click_count, 0);
}

#[tokio::test]
async fn shorten_rejects_missing_and_invalid_urls() {
    let (app, _) = test_app();

    for (payload, expected_error) in [
        (json!({}), "URL is required"),
        (json!({"url": ""}), "URL is required"),
        (json!({"url": "not a url"}), "Invalid URL format"),
        (json!({"url": "example.com"}), "Invalid URL format"),
    ] {
        let response = app
            .clone()
            .oneshot(shorten_request(payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], expected_error);
    }
}

#[tokio::test]
async fn shorten_rejects_malformed_alias() {
    let (app, _) = test_app();

    let response = app
        .oneshot(shorten_request(
            json!({"url": "https://example.com", "alias": "ab"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn shorten_conflicts_on_taken_alias() {
    let (app, _) = test_app();

    let first = app
        .clone()
        .oneshot(shorten_request(
            json!({"url": "https://example.com", "alias": "taken"}),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(shorten_request(
            json!({"url": "https://other.example.com", "alias": "taken"}),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["error"], "Alias already exists");
}

#[tokio::test]
async fn stats_returns_record_fields() {
    let (app, storage) = test_app();
    storage
        .create(&UrlRecord {
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            click_count: 7,
            created_at: now_timestamp(),
        })
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats/abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["shortCode"], "abc123");
    assert_eq!(body["originalUrl"], "https://example.com");
    assert_eq!(body["clickCount"], 7);
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn stats_404_for_unknown_code() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_newest_first() {
    let (app, storage) = test_app();
    for (code, created_at) in [
        ("first", "2024-01-01T00:00:00.000Z"),
        ("second", "2024-02-01T00:00:00.000Z"),
        ("third", "2024-03-01T00:00:00.000Z"),
    ] {
        storage
            .create(&UrlRecord {
                short_code: code.to_string(),
                original_url: "https://example.com".to_string(),
                click_count: 0,
                created_at: created_at.to_string(),
            })
            .await
            .unwrap();
    }

    let response = app
        .oneshot(Request::builder().uri("/urls").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let urls = body["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0]["shortCode"], "third");
    assert_eq!(urls[2]["shortCode"], "first");
}

#[tokio::test]
async fn delete_removes_record() {
    let (app, storage) = test_app();
    storage
        .create(&UrlRecord {
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            click_count: 0,
            created_at: now_timestamp(),
        })
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "URL deleted successfully");
    assert!(storage.get("abc123").await.unwrap().is_none());

    // Deleting again is a 404, not an idempotent 200.
    let again = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check_is_ok() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_headers_on_responses_and_preflight() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/urls")
                .header("origin", "https://app.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );

    let preflight = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/shorten")
                .header("origin", "https://app.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(preflight.status(), StatusCode::OK);
    assert_eq!(
        preflight
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
