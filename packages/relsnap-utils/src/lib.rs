pub mod config;
pub mod http;
pub mod time;
pub mod versioning;

// Re-export main utilities
pub use config::{FetchConfig, DEFAULT_TIMEOUT, USER_AGENT};
pub use http::{get, get_json, get_json_with_query, get_text, http_status_is_ok, HttpError, ResponseData};
pub use versioning::Version;
