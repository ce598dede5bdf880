use async_trait::async_trait;
use serde_json::Value;

use relsnap_utils::{get_json, FetchConfig};

use crate::base_provider::*;
use crate::data::{ChannelReleases, ReleaseInfo};

pub const EDGE_PRODUCTS_URL: &str = "https://edgeupdates.microsoft.com/api/products?view=enterprise";

pub struct EdgeProvider;

impl Default for EdgeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeProvider {
    pub fn new() -> Self {
        EdgeProvider {}
    }

    /// Products are named either `Microsoft Edge Stable` or just `Stable`.
    fn find_product<'a>(products: &'a [Value], channel: &str) -> Option<&'a Value> {
        let full_name = format!("Microsoft Edge {}", channel);
        products.iter().find(|product| {
            product
                .get("Product")
                .and_then(Value::as_str)
                .is_some_and(|name| {
                    name.eq_ignore_ascii_case(&full_name) || name.eq_ignore_ascii_case(channel)
                })
        })
    }

    fn channel_release(products: &[Value], channel: &str) -> ReleaseInfo {
        let Some(product) = Self::find_product(products, channel) else {
            tracing::warn!("Edge {} channel not listed at {}", channel, EDGE_PRODUCTS_URL);
            return ReleaseInfo::empty(EDGE_PRODUCTS_URL);
        };
        let latest = product
            .get("Releases")
            .and_then(Value::as_array)
            .and_then(|releases| {
                releases.iter().max_by(|a, b| {
                    let a_time = a.get("PublishedTime").and_then(Value::as_str).unwrap_or("");
                    let b_time = b.get("PublishedTime").and_then(Value::as_str).unwrap_or("");
                    a_time.cmp(b_time)
                })
            });
        match latest {
            Some(release) => ReleaseInfo::new(
                json_field_string(release, "ProductVersion"),
                json_field_string(release, "ReleaseId"),
                json_field_string(release, "PublishedTime"),
                EDGE_PRODUCTS_URL,
            ),
            None => {
                tracing::warn!("Edge {} channel has no releases", channel);
                ReleaseInfo::empty(EDGE_PRODUCTS_URL)
            }
        }
    }
}

#[async_trait]
impl ReleaseSource for EdgeProvider {
    fn name(&self) -> &'static str {
        "edge"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Browser
    }

    async fn fetch(&self, config: &FetchConfig) -> Result<ChannelReleases, SourceError> {
        let data = get_json(config, EDGE_PRODUCTS_URL).await?;
        let products = data
            .as_array()
            .ok_or_else(|| SourceError::shape(EDGE_PRODUCTS_URL, "expected a list of products"))?;
        Ok(ChannelReleases::new(
            Self::channel_release(products, "Stable"),
            Self::channel_release(products, "Beta"),
        ))
    }
}
