use regex::Regex;
use std::time::Duration;

pub const USER_AGENT: &str = "scrap_os_browser_info/1.0 (+https://example.com)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const REGEX_PREFIX: &str = "regex:";

/// Settings shared by every request a provider makes.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    reverse_proxy: Vec<(String, String)>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            reverse_proxy: Vec::new(),
        }
    }
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds URL rewrite rules, one per line, in the form `prefix -> replacement`.
    ///
    /// A prefix starting with `regex:` is treated as a regular expression and
    /// every match is replaced. Lines missing either side are ignored.
    pub fn with_reverse_proxy(mut self, rules: &str) -> Self {
        let parsed = rules
            .lines()
            .map(|line| {
                let mut parts = line.splitn(2, "->");
                let url_prefix = parts.next().unwrap_or_default().trim();
                let proxy_url = parts.next().unwrap_or_default().trim();
                (url_prefix.to_string(), proxy_url.to_string())
            })
            .filter(|v| !v.0.is_empty() && !v.1.is_empty());
        self.reverse_proxy.extend(parsed);
        self
    }

    pub fn reverse_proxy(&self) -> &[(String, String)] {
        &self.reverse_proxy
    }

    pub fn resolve_url(&self, url: &str) -> String {
        let mut result_url = url.to_string();
        for (url_prefix, proxy_url) in &self.reverse_proxy {
            if let Some(pattern) = url_prefix.strip_prefix(REGEX_PREFIX) {
                match Regex::new(pattern.trim()) {
                    Ok(re) => {
                        result_url = re.replace_all(&result_url, proxy_url.as_str()).to_string();
                    }
                    Err(e) => tracing::warn!("ignoring invalid proxy pattern {}: {}", pattern, e),
                }
            } else {
                result_url = result_url.replace(url_prefix.as_str(), proxy_url);
            }
        }
        result_url
    }
}
