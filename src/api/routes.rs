use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::analytics;
use super::handlers::{delete_url, health_check, list_urls, shorten, stats, AppState};
use crate::redirect::handlers::redirect;

/// Full application router. Static paths are registered ahead of the
/// `/{code}` capture so they are never shadowed by a short code.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/shorten", post(shorten))
        .route("/urls", get(list_urls))
        .route("/stats/{code}", get(stats))
        .route("/analytics/overview", get(analytics::overview))
        .route("/analytics/{code}", get(analytics::url_analytics))
        .route("/{code}", get(redirect).delete(delete_url))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
