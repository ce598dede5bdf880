use async_trait::async_trait;
use serde_json::Value;

use relsnap_utils::{get_json, FetchConfig};

use crate::base_provider::*;
use crate::data::{ChannelReleases, ReleaseInfo};

pub const FIREFOX_VERSIONS_URL: &str =
    "https://product-details.mozilla.org/1.0/firefox_versions.json";
pub const FIREFOX_MAJOR_HISTORY_URL: &str =
    "https://product-details.mozilla.org/1.0/firefox_history_major_releases.json";
pub const FIREFOX_DEVEL_HISTORY_URL: &str =
    "https://product-details.mozilla.org/1.0/firefox_history_development_releases.json";

const STABLE_VERSION_KEY: &str = "LATEST_FIREFOX_VERSION";
const BETA_VERSION_KEY: &str = "LATEST_FIREFOX_RELEASED_DEVEL_VERSION";

pub struct FirefoxProvider;

impl Default for FirefoxProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FirefoxProvider {
    pub fn new() -> Self {
        FirefoxProvider {}
    }

    fn expect_object(url: &str, value: Value) -> Result<Value, SourceError> {
        if value.is_object() {
            Ok(value)
        } else {
            Err(SourceError::shape(url, "expected a JSON object"))
        }
    }

    fn release(version: Option<String>, history: &Value) -> ReleaseInfo {
        let release_date = version
            .as_deref()
            .and_then(|v| json_field_string(history, v));
        ReleaseInfo::new(
            version.clone(),
            version,
            release_date,
            FIREFOX_VERSIONS_URL,
        )
    }
}

#[async_trait]
impl ReleaseSource for FirefoxProvider {
    fn name(&self) -> &'static str {
        "firefox"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Browser
    }

    async fn fetch(&self, config: &FetchConfig) -> Result<ChannelReleases, SourceError> {
        let versions = Self::expect_object(
            FIREFOX_VERSIONS_URL,
            get_json(config, FIREFOX_VERSIONS_URL).await?,
        )?;
        let history_stable = Self::expect_object(
            FIREFOX_MAJOR_HISTORY_URL,
            get_json(config, FIREFOX_MAJOR_HISTORY_URL).await?,
        )?;
        let history_dev = Self::expect_object(
            FIREFOX_DEVEL_HISTORY_URL,
            get_json(config, FIREFOX_DEVEL_HISTORY_URL).await?,
        )?;

        let stable_version = json_field_string(&versions, STABLE_VERSION_KEY);
        let beta_version = json_field_string(&versions, BETA_VERSION_KEY);
        if stable_version.is_none() {
            tracing::warn!("{} missing from {}", STABLE_VERSION_KEY, FIREFOX_VERSIONS_URL);
        }

        Ok(ChannelReleases::new(
            Self::release(stable_version, &history_stable),
            Self::release(beta_version, &history_dev),
        ))
    }
}
