//! User-agent and referrer classification.
//!
//! Deterministic, stateless substring matching; no dictionary or network
//! lookups. Marker priority matters: Edge UAs contain "Chrome/" and
//! Chrome UAs contain "Safari/", so checks run most-specific first.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub browser: String,
    pub browser_version: String,
    pub os: String,
    pub device_type: String,
}

/// Major version digits following `token`, empty if absent.
fn version_after(ua: &str, token: &str) -> String {
    ua.find(token)
        .map(|idx| {
            ua[idx + token.len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_user_agent(ua: &str) -> UserAgentInfo {
    let (browser, browser_version) = if ua.contains("Edg/") {
        ("Edge", version_after(ua, "Edg/"))
    } else if ua.contains("Chrome/") && !ua.contains("Edg") {
        ("Chrome", version_after(ua, "Chrome/"))
    } else if ua.contains("Safari/") && !ua.contains("Chrome") {
        // Safari reports its version behind a separate "Version/" token.
        ("Safari", version_after(ua, "Version/"))
    } else if ua.contains("Firefox/") {
        ("Firefox", version_after(ua, "Firefox/"))
    } else {
        ("Other", String::new())
    };

    let os = if ua.contains("Windows") {
        "Windows"
    } else if ua.contains("Mac OS") || ua.contains("Macintosh") {
        "macOS"
    } else if ua.contains("Linux") && !ua.contains("Android") {
        "Linux"
    } else if ua.contains("iPhone") || ua.contains("iPad") {
        "iOS"
    } else if ua.contains("Android") {
        "Android"
    } else {
        "Other"
    };

    // Mobile markers take precedence over tablet markers.
    let device_type = if ua.contains("Mobile")
        || ua.contains("iPhone")
        || (ua.contains("Android") && !ua.contains("Tablet"))
    {
        "Mobile"
    } else if ua.contains("Tablet") || ua.contains("iPad") {
        "Tablet"
    } else {
        "Desktop"
    };

    UserAgentInfo {
        browser: browser.to_string(),
        browser_version,
        os: os.to_string(),
        device_type: device_type.to_string(),
    }
}

/// Hostname of a referrer URL. Unparsable referrers come back unchanged;
/// no error escapes this function.
pub fn extract_domain(referrer: &str) -> String {
    url::Url::parse(referrer)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| referrer.to_string())
}
