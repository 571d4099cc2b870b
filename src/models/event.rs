use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recorded visit through a short code.
///
/// Events are append-only: written once by the redirect path and never
/// updated. The `timestamp` doubles as the range key for analytics queries,
/// so it is stored in a fixed RFC 3339 millisecond format whose
/// lexicographic order matches chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub short_code: String,
    pub timestamp: String,
    pub user_agent: String,
    pub browser: String,
    pub browser_version: String,
    pub os: String,
    pub device_type: String,
    pub referrer: String,
    /// Registrable domain of the referrer, or the "Direct" sentinel.
    pub referrer_domain: String,
    /// ISO country code from the edge, or "Unknown".
    pub country: String,
    pub region: String,
    pub city: String,
}

/// Current time in the canonical event timestamp format
/// (`2024-01-15T10:05:00.000Z`).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
