use serde::{Deserialize, Serialize};

/// One channel's release as reported by a source.
///
/// Absent values serialize as `null`; the keys are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub version: Option<String>,
    pub version_code: Option<String>,
    pub release_date: Option<String>,
    pub source: String,
}

impl ReleaseInfo {
    pub fn new(
        version: Option<String>,
        version_code: Option<String>,
        release_date: Option<String>,
        source: impl Into<String>,
    ) -> Self {
        ReleaseInfo {
            version,
            version_code,
            release_date,
            source: source.into(),
        }
    }

    /// A record with nothing resolved, pointing at where we looked.
    pub fn empty(source: impl Into<String>) -> Self {
        Self::new(None, None, None, source)
    }

    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.version_code.is_none() && self.release_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelReleases {
    pub stable: ReleaseInfo,
    pub beta: ReleaseInfo,
}

impl ChannelReleases {
    pub fn new(stable: ReleaseInfo, beta: ReleaseInfo) -> Self {
        ChannelReleases { stable, beta }
    }
}
