use async_trait::async_trait;

use relsnap_utils::{get_json_with_query, FetchConfig};

use crate::base_provider::*;
use crate::data::{ChannelReleases, ReleaseInfo};

pub const CHROME_MILESTONES_URL: &str = "https://chromiumdash.appspot.com/fetch_milestones";

pub struct ChromeProvider;

impl Default for ChromeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ChromeProvider {
    pub fn new() -> Self {
        ChromeProvider {}
    }

    async fn fetch_channel(
        &self,
        config: &FetchConfig,
        channel: &str,
        date_key: &str,
    ) -> Result<ReleaseInfo, SourceError> {
        let data =
            get_json_with_query(config, CHROME_MILESTONES_URL, &[("channel", channel)]).await?;
        let entry = data
            .as_array()
            .and_then(|milestones| milestones.first())
            .ok_or_else(|| {
                SourceError::shape(CHROME_MILESTONES_URL, format!("no {} milestone", channel))
            })?;
        Ok(ReleaseInfo::new(
            json_field_string(entry, "version"),
            json_field_string(entry, "milestone"),
            json_field_string(entry, date_key),
            CHROME_MILESTONES_URL,
        ))
    }
}

#[async_trait]
impl ReleaseSource for ChromeProvider {
    fn name(&self) -> &'static str {
        "chrome"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Browser
    }

    async fn fetch(&self, config: &FetchConfig) -> Result<ChannelReleases, SourceError> {
        let stable = self.fetch_channel(config, "Stable", "stable_date").await?;
        let beta = self.fetch_channel(config, "Beta", "beta_date").await?;
        Ok(ChannelReleases::new(stable, beta))
    }
}
