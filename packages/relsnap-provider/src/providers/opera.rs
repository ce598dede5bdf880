use async_trait::async_trait;

use relsnap_utils::{get_text, FetchConfig};

use crate::base_provider::*;
use crate::data::{ChannelReleases, ReleaseInfo};
use crate::listing::latest_from_listing;

pub const OPERA_STABLE_LISTING_URL: &str = "https://get.geo.opera.com/pub/opera/desktop/";
pub const OPERA_BETA_LISTING_URL: &str = "https://get.geo.opera.com/pub/opera-beta/";

pub struct OperaProvider;

impl Default for OperaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OperaProvider {
    pub fn new() -> Self {
        OperaProvider {}
    }

    async fn fetch_listing(
        &self,
        config: &FetchConfig,
        url: &str,
    ) -> Result<ReleaseInfo, SourceError> {
        let html = get_text(config, url).await?;
        let (version, release_date) = latest_from_listing(&html);
        if version.is_none() {
            tracing::warn!("no release folders found at {}", url);
        }
        Ok(ReleaseInfo::new(version.clone(), version, release_date, url))
    }
}

#[async_trait]
impl ReleaseSource for OperaProvider {
    fn name(&self) -> &'static str {
        "opera"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Browser
    }

    async fn fetch(&self, config: &FetchConfig) -> Result<ChannelReleases, SourceError> {
        let stable = self.fetch_listing(config, OPERA_STABLE_LISTING_URL).await?;
        let beta = self.fetch_listing(config, OPERA_BETA_LISTING_URL).await?;
        Ok(ChannelReleases::new(stable, beta))
    }
}
