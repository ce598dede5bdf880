use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use relsnap_utils::{FetchConfig, HttpError};

use crate::data::ChannelReleases;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    OperatingSystem,
    Browser,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::OperatingSystem => write!(f, "operating system"),
            SourceKind::Browser => write!(f, "browser"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("unexpected response from {url}: {detail}")]
    Shape { url: String, detail: String },
}

impl SourceError {
    pub fn shape(url: &str, detail: impl Into<String>) -> Self {
        SourceError::Shape {
            url: url.to_string(),
            detail: detail.into(),
        }
    }
}

/// A place that reports the current stable and beta release of one product.
///
/// Missing data is reported as `None` fields; only transport failures and
/// responses of the wrong shape are errors.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Key used in the snapshot, e.g. `"chrome"`.
    fn name(&self) -> &'static str;

    fn kind(&self) -> SourceKind;

    async fn fetch(&self, config: &FetchConfig) -> Result<ChannelReleases, SourceError>;
}

/// Reads `key` from a JSON object as text, rendering numbers and booleans.
pub fn json_field_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
