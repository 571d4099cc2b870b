use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use std::sync::Arc;

use crate::analytics::{extract_domain, parse_user_agent};
use crate::api::AppState;
use crate::error::ApiError;
use crate::models::{now_timestamp, ClickEvent};

/// Redirect to the original URL.
///
/// The click counter increment is synchronous because `clickCount` is the
/// externally visible metric; the event write is fire-and-forget and never
/// delays the response.
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(record) = state.storage.get(&code).await? else {
        return Err(ApiError::NotFound("Short URL not found".to_string()));
    };

    state.storage.increment_clicks(&code).await?;

    state.recorder.record(build_event(&code, &headers));

    let location = HeaderValue::from_str(&record.original_url)
        .map_err(|err| ApiError::Internal(anyhow::anyhow!("stored URL is not a valid Location header: {err}")))?;

    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, location)
        .header(
            header::CACHE_CONTROL,
            "no-cache, no-store, must-revalidate",
        )
        .body(Body::empty())
        .map_err(|err| ApiError::Internal(err.into()))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Classify the request headers into a click event. Geo hints come from
/// trusted edge-injected headers; the city value arrives percent-encoded.
fn build_event(short_code: &str, headers: &HeaderMap) -> ClickEvent {
    let user_agent = header_str(headers, "user-agent").unwrap_or("").to_string();
    let referrer = header_str(headers, "referer").unwrap_or("Direct").to_string();
    let country = header_str(headers, "cloudfront-viewer-country")
        .unwrap_or("Unknown")
        .to_string();
    let region = header_str(headers, "cloudfront-viewer-country-region")
        .unwrap_or("")
        .to_string();
    let city = match header_str(headers, "cloudfront-viewer-city") {
        Some(raw) if !raw.is_empty() => urlencoding::decode(raw)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| raw.to_string()),
        _ => String::new(),
    };

    let ua = parse_user_agent(&user_agent);
    let referrer_domain = if referrer == "Direct" {
        "Direct".to_string()
    } else {
        extract_domain(&referrer)
    };

    ClickEvent {
        short_code: short_code.to_string(),
        timestamp: now_timestamp(),
        user_agent,
        browser: ua.browser,
        browser_version: ua.browser_version,
        os: ua.os,
        device_type: ua.device_type,
        referrer,
        referrer_domain,
        country,
        region,
        city,
    }
}
