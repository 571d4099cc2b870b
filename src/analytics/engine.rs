//! Pure aggregation over click events: dimension grouping with
//! percentages, time-bucketed timelines, top-city grouping.

use chrono::{DateTime, Datelike, Days, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::ClickEvent;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregatedBucket {
    pub name: String,
    pub clicks: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimelinePoint {
    pub date: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CityClicks {
    pub city: String,
    pub country: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Week,
}

/// Percentage of `clicks` against `total`, one decimal place.
/// A zero total yields 0 rather than a division fault.
fn percentage(clicks: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (clicks as f64 / total as f64 * 1000.0).round() / 10.0
    }
}

/// Group events by a field value, count per value, attach percentages
/// against the total of the event set, and sort by descending count.
///
/// Empty field values fall into the "Unknown" group. The sort is stable
/// over first-seen order, so equal counts reproduce deterministically.
pub fn aggregate_by_field<F>(events: &[ClickEvent], field: F) -> Vec<AggregatedBucket>
where
    F: Fn(&ClickEvent) -> &str,
{
    let total = events.len() as u64;
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for event in events {
        let value = field(event);
        let value = if value.is_empty() { "Unknown" } else { value };
        if !counts.contains_key(value) {
            order.push(value.to_string());
        }
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    let mut buckets: Vec<AggregatedBucket> = order
        .into_iter()
        .map(|name| {
            let clicks = counts[&name];
            AggregatedBucket {
                name,
                clicks,
                percentage: percentage(clicks, total),
            }
        })
        .collect();

    buckets.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    buckets
}

/// Bucket key for one timestamp at the given granularity. Week buckets
/// start on the Sunday of the event's week, computed in UTC.
fn bucket_key(timestamp: &DateTime<Utc>, granularity: Granularity) -> String {
    match granularity {
        Granularity::Hour => timestamp.format("%Y-%m-%dT%H:00:00.000Z").to_string(),
        Granularity::Day => timestamp.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let days_from_sunday = timestamp.weekday().num_days_from_sunday() as u64;
            let sunday = timestamp
                .date_naive()
                .checked_sub_days(Days::new(days_from_sunday))
                .unwrap_or_else(|| timestamp.date_naive());
            sunday.format("%Y-%m-%d").to_string()
        }
    }
}

/// Count events per time bucket, sorted ascending by bucket key. The keys
/// are ISO-8601 prefixes, so string order is chronological order. Events
/// with unparsable timestamps are skipped.
pub fn aggregate_timeline(events: &[ClickEvent], granularity: Granularity) -> Vec<TimelinePoint> {
    let mut counts: HashMap<String, u64> = HashMap::new();

    for event in events {
        let Ok(timestamp) = DateTime::parse_from_rfc3339(&event.timestamp) else {
            continue;
        };
        let key = bucket_key(&timestamp.with_timezone(&Utc), granularity);
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut points: Vec<TimelinePoint> = counts
        .into_iter()
        .map(|(date, clicks)| TimelinePoint { date, clicks })
        .collect();
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// Top cities by click count, grouped by (city, country) pair. Events with
/// an empty city are skipped.
pub fn top_cities(events: &[ClickEvent], limit: usize) -> Vec<CityClicks> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut counts: HashMap<(String, String), u64> = HashMap::new();

    for event in events {
        if event.city.is_empty() {
            continue;
        }
        let key = (event.city.clone(), event.country.clone());
        if !counts.contains_key(&key) {
            order.push(key.clone());
        }
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut cities: Vec<CityClicks> = order
        .into_iter()
        .map(|(city, country)| {
            let clicks = counts[&(city.clone(), country.clone())];
            CityClicks {
                city,
                country,
                clicks,
            }
        })
        .collect();

    cities.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    cities.truncate(limit);
    cities
}

/// Number of distinct countries in the event set.
pub fn unique_countries(events: &[ClickEvent]) -> usize {
    events
        .iter()
        .map(|e| e.country.as_str())
        .collect::<HashSet<_>>()
        .len()
}
