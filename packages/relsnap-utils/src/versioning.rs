use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static DOTTED_NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)*$").unwrap());

/// A release version string with numeric ordering.
///
/// Dotted numeric versions compare component-wise, with the shorter one padded
/// with zeros, so `90.0.1` equals `90.0.1.0`. Anything else is compared by
/// `version_compare`.
#[derive(Debug, Clone)]
pub struct Version {
    string: String,
}

impl Version {
    pub fn new(string: impl Into<String>) -> Self {
        Version {
            string: string.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }

    pub fn is_dotted_numeric(&self) -> bool {
        DOTTED_NUMERIC_REGEX.is_match(&self.string)
    }

    fn numeric_parts(&self) -> Option<Vec<u64>> {
        if !self.is_dotted_numeric() {
            return None;
        }
        self.string.split('.').map(|part| part.parse().ok()).collect()
    }

    /// Total ordering for sorting; incomparable versions are treated as equal.
    pub fn cmp_lossy(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

fn cmp_padded(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.numeric_parts(), other.numeric_parts()) {
            return Some(cmp_padded(&a, &b));
        }
        let version = version_compare::Version::from(self.string.as_str())?;
        let other_version = version_compare::Version::from(other.string.as_str())?;
        version.partial_cmp(&other_version)
    }
}
