use async_trait::async_trait;

use relsnap_utils::{get_json_with_query, FetchConfig};

use crate::base_provider::*;
use crate::data::{ChannelReleases, ReleaseInfo};
use crate::wikitext::{clean_wikitext, extract_field, parse_wiki_date};

pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const WIKIPEDIA_ARTICLE_URL: &str = "https://en.wikipedia.org/wiki";

const STABLE_VERSION_KEYS: &[&str] = &["latest_release_version", "latest_release"];
const STABLE_DATE_KEYS: &[&str] = &["latest_release_date"];
const BETA_VERSION_KEYS: &[&str] = &["latest_preview_version", "latest_beta_version"];
const BETA_DATE_KEYS: &[&str] = &["latest_preview_date", "latest_beta_release_date"];

// Safari's article often has no preview fields; fall back to the release.
const SAFARI_BETA_VERSION_KEYS: &[&str] = &[
    "latest_preview_version",
    "latest_beta_version",
    "latest_release_version",
];
const SAFARI_BETA_DATE_KEYS: &[&str] = &[
    "latest_preview_date",
    "latest_beta_release_date",
    "latest_release_date",
];

/// Infobox aliases for one channel, most preferred first.
#[derive(Debug, Clone, Copy)]
pub struct ChannelFields {
    pub version: &'static [&'static str],
    pub date: &'static [&'static str],
    /// Fields holding a build number distinct from the marketing version.
    pub code: &'static [&'static str],
}

impl ChannelFields {
    pub const fn new(version: &'static [&'static str], date: &'static [&'static str]) -> Self {
        ChannelFields {
            version,
            date,
            code: &[],
        }
    }

    pub fn with_code(mut self, code: &'static [&'static str]) -> Self {
        self.code = code;
        self
    }
}

const STABLE_FIELDS: ChannelFields = ChannelFields::new(STABLE_VERSION_KEYS, STABLE_DATE_KEYS);
const BETA_FIELDS: ChannelFields = ChannelFields::new(BETA_VERSION_KEYS, BETA_DATE_KEYS);

/// Reads a product's releases from the infobox of its Wikipedia article.
pub struct WikipediaProvider {
    name: &'static str,
    kind: SourceKind,
    page: &'static str,
    stable: ChannelFields,
    beta: ChannelFields,
}

impl WikipediaProvider {
    pub fn new(name: &'static str, kind: SourceKind, page: &'static str) -> Self {
        WikipediaProvider {
            name,
            kind,
            page,
            stable: STABLE_FIELDS,
            beta: BETA_FIELDS,
        }
    }

    pub fn with_fields(mut self, stable: ChannelFields, beta: ChannelFields) -> Self {
        self.stable = stable;
        self.beta = beta;
        self
    }

    pub fn windows() -> Self {
        Self::new("windows", SourceKind::OperatingSystem, "Windows_11")
    }

    pub fn macos() -> Self {
        Self::new("macos", SourceKind::OperatingSystem, "macOS")
    }

    pub fn android() -> Self {
        Self::new(
            "android",
            SourceKind::OperatingSystem,
            "Android_(operating_system)",
        )
    }

    pub fn ios() -> Self {
        Self::new("ios", SourceKind::OperatingSystem, "iOS")
    }

    pub fn ipados() -> Self {
        Self::new("ipados", SourceKind::OperatingSystem, "iPadOS")
    }

    pub fn safari() -> Self {
        Self::new("safari", SourceKind::Browser, "Safari_(web_browser)").with_fields(
            STABLE_FIELDS,
            ChannelFields::new(SAFARI_BETA_VERSION_KEYS, SAFARI_BETA_DATE_KEYS),
        )
    }

    pub fn whale() -> Self {
        Self::new("whale", SourceKind::Browser, "Whale_(web_browser)")
    }

    pub fn page(&self) -> &'static str {
        self.page
    }

    pub fn article_url(&self) -> String {
        format!("{}/{}", WIKIPEDIA_ARTICLE_URL, self.page)
    }

    async fn fetch_wikitext(&self, config: &FetchConfig) -> Result<String, SourceError> {
        let query = [
            ("action", "parse"),
            ("page", self.page),
            ("prop", "wikitext"),
            ("format", "json"),
        ];
        let data = get_json_with_query(config, WIKIPEDIA_API_URL, &query).await?;
        if let Some(info) = data.pointer("/error/info").and_then(|v| v.as_str()) {
            return Err(SourceError::shape(
                WIKIPEDIA_API_URL,
                format!("{}: {}", self.page, info),
            ));
        }
        data.pointer("/parse/wikitext/*")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                SourceError::shape(WIKIPEDIA_API_URL, format!("no wikitext for {}", self.page))
            })
    }

    /// Builds one channel's record from article source.
    pub fn release_from_wikitext(&self, wikitext: &str, fields: &ChannelFields) -> ReleaseInfo {
        let version = extract_field(wikitext, fields.version).and_then(|v| clean_wikitext(&v));
        let version_code = extract_field(wikitext, fields.code)
            .and_then(|v| clean_wikitext(&v))
            .or_else(|| version.clone());
        let release_date = extract_field(wikitext, fields.date).and_then(|v| parse_wiki_date(&v));
        ReleaseInfo::new(version, version_code, release_date, self.article_url())
    }

    pub fn releases_from_wikitext(&self, wikitext: &str) -> ChannelReleases {
        ChannelReleases::new(
            self.release_from_wikitext(wikitext, &self.stable),
            self.release_from_wikitext(wikitext, &self.beta),
        )
    }
}

#[async_trait]
impl ReleaseSource for WikipediaProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, config: &FetchConfig) -> Result<ChannelReleases, SourceError> {
        let wikitext = self.fetch_wikitext(config).await?;
        let releases = self.releases_from_wikitext(&wikitext);
        if releases.stable.version.is_none() {
            tracing::warn!("no stable version field in {}", self.page);
        }
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_INFOBOX: &str = "{{Infobox OS version\n\
| name = Windows 11\n\
| latest_release_version = 23H2 (10.0.22631.2861)<ref name=\"release-info\" />\n\
| latest_release_date = {{Start date and age|2023|12|12}}<ref>{{cite web|title=December 12, 2023}}</ref>\n\
| latest_preview_version = 10.0.26010.1000<ref>{{cite web|title=Canary}}</ref>\n\
| latest_preview_date = {{Start date and age|2023|12|6}}\n\
}}";

    #[test]
    fn test_releases_from_wikitext() {
        let provider = WikipediaProvider::windows();
        let releases = provider.releases_from_wikitext(WINDOWS_INFOBOX);
        assert_eq!(
            releases.stable,
            ReleaseInfo::new(
                Some("23H2 (10.0.22631.2861)".to_string()),
                Some("23H2 (10.0.22631.2861)".to_string()),
                Some("2023-12-12".to_string()),
                "https://en.wikipedia.org/wiki/Windows_11",
            )
        );
        assert_eq!(releases.beta.version.as_deref(), Some("10.0.26010.1000"));
        assert_eq!(releases.beta.release_date.as_deref(), Some("2023-12-06"));
    }

    #[test]
    fn test_code_field_preferred_over_version() {
        let provider = WikipediaProvider::macos().with_fields(
            ChannelFields::new(STABLE_VERSION_KEYS, STABLE_DATE_KEYS)
                .with_code(&["latest_release_build"]),
            BETA_FIELDS,
        );
        let text = "| latest_release_version = 14.2\n| latest_release_build = 23C64\n";
        let release = provider.release_from_wikitext(text, &provider.stable);
        assert_eq!(release.version.as_deref(), Some("14.2"));
        assert_eq!(release.version_code.as_deref(), Some("23C64"));
        assert_eq!(release.release_date, None);
    }

    #[test]
    fn test_missing_fields_are_null() {
        let provider = WikipediaProvider::whale();
        let releases = provider.releases_from_wikitext("{{Infobox software\n| name = Whale\n}}");
        assert!(releases.stable.is_empty());
        assert!(releases.beta.is_empty());
        assert_eq!(
            releases.beta.source,
            "https://en.wikipedia.org/wiki/Whale_(web_browser)"
        );
    }

    #[test]
    fn test_safari_beta_falls_back_to_release() {
        let provider = WikipediaProvider::safari();
        let text = "| latest_release_version = 17.2\n| latest_release_date = {{Start date|2023|12|11}}\n";
        let releases = provider.releases_from_wikitext(text);
        assert_eq!(releases.beta.version.as_deref(), Some("17.2"));
        assert_eq!(releases.beta.release_date.as_deref(), Some("2023-12-11"));
    }

    #[test]
    fn test_provider_names() {
        let providers = [
            WikipediaProvider::windows(),
            WikipediaProvider::macos(),
            WikipediaProvider::android(),
            WikipediaProvider::ios(),
            WikipediaProvider::ipados(),
        ];
        assert!(providers
            .iter()
            .all(|p| p.kind() == SourceKind::OperatingSystem));
        assert_eq!(WikipediaProvider::whale().kind(), SourceKind::Browser);
        assert_eq!(WikipediaProvider::android().page(), "Android_(operating_system)");
    }
}
