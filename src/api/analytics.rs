//! Analytics API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Days, SecondsFormat, Utc};
use serde::Deserialize;
use std::sync::Arc;

use super::handlers::{AppState, LIST_SCAN_LIMIT};
use crate::analytics::report::{overview_report, url_report, Period};
use crate::analytics::{Granularity, OverviewReport, UrlReport};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQueryParams {
    /// Range start, RFC 3339. Defaults to seven days before now.
    pub from: Option<String>,

    /// Range end, RFC 3339. Defaults to now.
    pub to: Option<String>,

    /// Timeline bucket width
    pub granularity: Option<Granularity>,

    /// Top-N size for the overview report
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// Resolved query window in the canonical event timestamp format, so the
/// bounds compare lexicographically against stored range keys.
struct Window {
    from: String,
    to: String,
    granularity: Granularity,
}

fn parse_bound(value: &str, field: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::Validation(format!("Invalid '{field}' timestamp")))
}

fn resolve_window(params: &AnalyticsQueryParams) -> Result<Window, ApiError> {
    let now = Utc::now();

    let to = match params.to.as_deref() {
        Some(value) => parse_bound(value, "to")?,
        None => now,
    };
    let from = match params.from.as_deref() {
        Some(value) => parse_bound(value, "from")?,
        None => now.checked_sub_days(Days::new(7)).unwrap_or(now),
    };

    Ok(Window {
        from: from.to_rfc3339_opts(SecondsFormat::Millis, true),
        to: to.to_rfc3339_opts(SecondsFormat::Millis, true),
        granularity: params.granularity.unwrap_or_default(),
    })
}

/// Analytics report for a single short code
pub async fn url_analytics(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(params): Query<AnalyticsQueryParams>,
) -> Result<Json<UrlReport>, ApiError> {
    let record = state
        .storage
        .get(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound("URL not found".to_string()))?;

    let window = resolve_window(&params)?;
    let events = state
        .storage
        .events_in_range(&code, &window.from, &window.to)
        .await?;

    let period = Period {
        from: window.from,
        to: window.to,
    };

    Ok(Json(url_report(
        &record,
        &events,
        period,
        window.granularity,
        &state.country_names,
    )))
}

/// Analytics report aggregated across all short codes
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsQueryParams>,
) -> Result<Json<OverviewReport>, ApiError> {
    let window = resolve_window(&params)?;

    let urls = state.storage.list(LIST_SCAN_LIMIT).await?;
    let mut entries = Vec::with_capacity(urls.len());
    for record in urls {
        let events = state
            .storage
            .events_in_range(&record.short_code, &window.from, &window.to)
            .await?;
        entries.push((record, events));
    }

    let period = Period {
        from: window.from,
        to: window.to,
    };

    Ok(Json(overview_report(
        &entries,
        period,
        window.granularity,
        params.limit,
        &state.country_names,
    )))
}
