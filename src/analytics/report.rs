//! Report assembly: the single-URL and overview analytics responses.

use serde::Serialize;

use crate::analytics::countries::CountryNames;
use crate::analytics::engine::{
    aggregate_by_field, aggregate_timeline, top_cities, unique_countries, AggregatedBucket,
    CityClicks, Granularity, TimelinePoint,
};
use crate::models::{ClickEvent, UrlRecord};

const TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Period {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct DeviceBucket {
    #[serde(rename = "type")]
    pub device_type: String,
    pub clicks: u64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct CountryBucket {
    pub code: String,
    pub name: String,
    pub clicks: u64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct ReferrerBucket {
    pub domain: String,
    pub clicks: u64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlReport {
    pub short_code: String,
    pub original_url: String,
    pub total_clicks: u64,
    pub unique_countries: usize,
    pub period: Period,
    pub timeline: Vec<TimelinePoint>,
    pub browsers: Vec<AggregatedBucket>,
    pub devices: Vec<DeviceBucket>,
    pub countries: Vec<CountryBucket>,
    pub referrers: Vec<ReferrerBucket>,
    pub top_cities: Vec<CityClicks>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUrl {
    pub short_code: String,
    pub original_url: String,
    pub clicks: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub total_clicks: u64,
    pub total_urls: usize,
    pub period: Period,
    pub timeline: Vec<TimelinePoint>,
    pub top_urls: Vec<TopUrl>,
    pub browsers: Vec<AggregatedBucket>,
    pub devices: Vec<DeviceBucket>,
    pub countries: Vec<CountryBucket>,
}

fn devices_of(events: &[ClickEvent]) -> Vec<DeviceBucket> {
    aggregate_by_field(events, |e| &e.device_type)
        .into_iter()
        .map(|b| DeviceBucket {
            device_type: b.name,
            clicks: b.clicks,
            percentage: b.percentage,
        })
        .collect()
}

fn countries_of(events: &[ClickEvent], names: &CountryNames) -> Vec<CountryBucket> {
    aggregate_by_field(events, |e| &e.country)
        .into_iter()
        .map(|b| CountryBucket {
            name: names.name(&b.name),
            code: b.name,
            clicks: b.clicks,
            percentage: b.percentage,
        })
        .collect()
}

fn referrers_of(events: &[ClickEvent]) -> Vec<ReferrerBucket> {
    aggregate_by_field(events, |e| &e.referrer_domain)
        .into_iter()
        .map(|b| ReferrerBucket {
            domain: b.name,
            clicks: b.clicks,
            percentage: b.percentage,
        })
        .collect()
}

/// Analytics report for one short code over the already range-filtered
/// event set.
pub fn url_report(
    record: &UrlRecord,
    events: &[ClickEvent],
    period: Period,
    granularity: Granularity,
    names: &CountryNames,
) -> UrlReport {
    let mut countries = countries_of(events, names);
    countries.truncate(TOP_N);
    let mut referrers = referrers_of(events);
    referrers.truncate(TOP_N);

    UrlReport {
        short_code: record.short_code.clone(),
        original_url: record.original_url.clone(),
        total_clicks: events.len() as u64,
        unique_countries: unique_countries(events),
        period,
        timeline: aggregate_timeline(events, granularity),
        browsers: aggregate_by_field(events, |e| &e.browser),
        devices: devices_of(events),
        countries,
        referrers,
        top_cities: top_cities(events, TOP_N),
    }
}

/// Cross-URL analytics report. `entries` carries every scanned URL record
/// with its in-range events; URLs with no events still count toward
/// `totalUrls` but are excluded from `topUrls`.
pub fn overview_report(
    entries: &[(UrlRecord, Vec<ClickEvent>)],
    period: Period,
    granularity: Granularity,
    limit: usize,
    names: &CountryNames,
) -> OverviewReport {
    let all_events: Vec<ClickEvent> = entries
        .iter()
        .flat_map(|(_, events)| events.iter().cloned())
        .collect();

    let mut top_urls: Vec<TopUrl> = entries
        .iter()
        .filter(|(_, events)| !events.is_empty())
        .map(|(record, events)| TopUrl {
            short_code: record.short_code.clone(),
            original_url: record.original_url.clone(),
            clicks: events.len() as u64,
        })
        .collect();
    top_urls.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    top_urls.truncate(limit);

    let mut devices = devices_of(&all_events);
    devices.truncate(TOP_N);
    let mut countries = countries_of(&all_events, names);
    countries.truncate(TOP_N);

    OverviewReport {
        total_clicks: all_events.len() as u64,
        total_urls: entries.len(),
        period,
        timeline: aggregate_timeline(&all_events, granularity),
        top_urls,
        browsers: aggregate_by_field(&all_events, |e| &e.browser),
        devices,
        countries,
    }
}
