use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A shortened URL as stored and as returned by the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    /// RFC 3339 creation timestamp. Immutable after creation.
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
}

#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub urls: Vec<UrlRecord>,
}
