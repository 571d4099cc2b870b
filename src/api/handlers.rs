use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::analytics::{ClickRecorder, CountryNames};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    now_timestamp, ShortenRequest, ShortenResponse, UrlListResponse, UrlRecord,
};
use crate::shortcode;
use crate::storage::{Storage, StorageError};

/// Number of URL records a list or overview scan will touch.
pub const LIST_SCAN_LIMIT: i64 = 100;

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub recorder: ClickRecorder,
    pub config: Arc<Config>,
    pub country_names: CountryNames,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Create a shortened URL
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), ApiError> {
    let url = match payload.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ApiError::Validation("URL is required".to_string())),
    };

    if !shortcode::is_valid_url(url) {
        return Err(ApiError::Validation("Invalid URL format".to_string()));
    }

    let short_code = shortcode::allocate(
        state.storage.as_ref(),
        payload.alias.as_deref(),
        state.config.collision_policy,
    )
    .await?;

    let record = UrlRecord {
        short_code: short_code.clone(),
        original_url: url.to_string(),
        click_count: 0,
        created_at: now_timestamp(),
    };

    // The existence check in `allocate` raced another writer if this
    // conflicts; report it rather than overwrite.
    match state.storage.create(&record).await {
        Ok(()) => {}
        Err(StorageError::Conflict) => {
            return Err(ApiError::Conflict("Alias already exists".to_string()))
        }
        Err(StorageError::Other(err)) => return Err(err.into()),
    }

    let short_url = if state.config.base_url.is_empty() {
        short_code.clone()
    } else {
        format!("{}/{}", state.config.base_url, short_code)
    };

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_code,
            short_url,
            original_url: record.original_url,
        }),
    ))
}

/// Stats for one short code
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<UrlRecord>, ApiError> {
    match state.storage.get(&code).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound("Short URL not found".to_string())),
    }
}

/// List shortened URLs, newest first
pub async fn list_urls(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UrlListResponse>, ApiError> {
    let urls = state.storage.list(LIST_SCAN_LIMIT).await?;
    Ok(Json(UrlListResponse { urls }))
}

/// Delete a shortened URL
pub async fn delete_url(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.storage.get(&code).await?.is_none() {
        return Err(ApiError::NotFound("Short URL not found".to_string()));
    }

    state.storage.delete(&code).await?;

    Ok(Json(SuccessResponse {
        message: "URL deleted successfully".to_string(),
    }))
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
