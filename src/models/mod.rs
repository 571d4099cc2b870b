pub mod event;
pub mod url;

pub use event::{now_timestamp, ClickEvent};
pub use url::{ShortenRequest, ShortenResponse, UrlListResponse, UrlRecord};
