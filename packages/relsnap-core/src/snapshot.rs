use serde::{Serialize, Serializer};

use relsnap_provider::{ChannelReleases, ProviderRegistry, SourceKind};
use relsnap_utils::{time, FetchConfig};

use crate::error::{CoreError, Result};

/// Releases keyed by product name, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelMap(Vec<(String, ChannelReleases)>);

impl ChannelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, releases: ChannelReleases) {
        let name = name.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = releases,
            None => self.0.push((name, releases)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ChannelReleases> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, releases)| releases)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ChannelMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, releases)| (name, releases)))
    }
}

/// Everything collected in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub generated_at: String,
    pub operating_systems: ChannelMap,
    pub browsers: ChannelMap,
}

impl Snapshot {
    pub fn new(generated_at: impl Into<String>) -> Self {
        Snapshot {
            generated_at: generated_at.into(),
            operating_systems: ChannelMap::new(),
            browsers: ChannelMap::new(),
        }
    }

    pub fn insert(&mut self, kind: SourceKind, name: &str, releases: ChannelReleases) {
        match kind {
            SourceKind::OperatingSystem => self.operating_systems.insert(name, releases),
            SourceKind::Browser => self.browsers.insert(name, releases),
        }
    }

    /// Two-space indented JSON; non-ASCII text is written as is.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Fetches every source in `registry`, in order, into one snapshot.
///
/// The first failing source aborts the whole collection.
pub async fn collect_from(registry: &ProviderRegistry, config: &FetchConfig) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new(time::now_utc());
    for source in registry.iter() {
        tracing::info!("fetching {} ({})", source.name(), source.kind());
        let releases = source
            .fetch(config)
            .await
            .map_err(|source_err| CoreError::Source {
                name: source.name(),
                source: source_err,
            })?;
        tracing::debug!(
            "{}: stable {:?}, beta {:?}",
            source.name(),
            releases.stable.version,
            releases.beta.version
        );
        snapshot.insert(source.kind(), source.name(), releases);
    }
    Ok(snapshot)
}

/// Collects every supported operating system and browser.
pub async fn collect_all(config: &FetchConfig) -> Result<Snapshot> {
    collect_from(&ProviderRegistry::builtin(), config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use relsnap_provider::ReleaseInfo;
    use serde_json::Value;

    fn sample_releases(version: Option<&str>) -> ChannelReleases {
        ChannelReleases::new(
            ReleaseInfo::new(
                version.map(str::to_string),
                version.map(str::to_string),
                Some("2023-12-19".to_string()),
                "https://example.org/stable",
            ),
            ReleaseInfo::empty("https://example.org/beta"),
        )
    }

    #[test]
    fn test_channel_map_keeps_order_and_replaces() {
        let mut map = ChannelMap::new();
        map.insert("windows", sample_releases(Some("23H2")));
        map.insert("macos", sample_releases(None));
        map.insert("windows", sample_releases(Some("24H2")));

        assert_eq!(map.keys().collect::<Vec<_>>(), ["windows", "macos"]);
        assert_eq!(
            map.get("windows").unwrap().stable.version.as_deref(),
            Some("24H2")
        );
        assert!(map.get("ios").is_none());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut snapshot = Snapshot::new("2024-01-02T03:04:05.000000Z");
        snapshot.insert(SourceKind::OperatingSystem, "ios", sample_releases(Some("17.2.1")));
        snapshot.insert(SourceKind::Browser, "whale", sample_releases(Some("웨일 3.24")));

        let json = snapshot.to_json_pretty().unwrap();
        assert!(json.contains("\n  \"generated_at\": \"2024-01-02T03:04:05.000000Z\""));
        assert!(json.contains("웨일 3.24"));

        let value: Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["generated_at", "operating_systems", "browsers"]);
        assert_eq!(value["operating_systems"]["ios"]["beta"]["version"], Value::Null);
        assert!(value["operating_systems"]["ios"]["beta"]
            .as_object()
            .unwrap()
            .contains_key("release_date"));
    }

    #[test]
    fn test_snapshot_serializes_in_insertion_order() {
        let mut snapshot = Snapshot::new("2024-01-02T03:04:05.000000Z");
        snapshot.insert(SourceKind::Browser, "whale", sample_releases(None));
        snapshot.insert(SourceKind::Browser, "chrome", sample_releases(Some("120.0")));
        snapshot.insert(SourceKind::Browser, "edge", sample_releases(Some("120.0.2210.77")));

        let value = serde_json::to_value(&snapshot).unwrap();
        let keys: Vec<&String> = value["browsers"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["whale", "chrome", "edge"]);
        assert_eq!(value["browsers"]["chrome"]["stable"]["version"], "120.0");
        assert!(value["operating_systems"].as_object().unwrap().is_empty());
    }
}
