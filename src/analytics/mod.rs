//! Click analytics: header classification, event recording, and
//! aggregation into per-URL and overview reports.

pub mod classifier;
pub mod countries;
pub mod engine;
pub mod recorder;
pub mod report;

pub use classifier::{extract_domain, parse_user_agent, UserAgentInfo};
pub use countries::CountryNames;
pub use engine::{AggregatedBucket, Granularity, TimelinePoint};
pub use recorder::ClickRecorder;
pub use report::{OverviewReport, Period, UrlReport};
