//! Domain classification: preferred, blocked or neutral.
//!
//! Rules are plain data ([`DomainRules`]) so deployments and tests can
//! supply their own lists. Matching is case-insensitive and works on the
//! hostname, with two extra pattern forms:
//!
//! - `investor.*` matches hosts whose first label is `investor`
//!   (`investor.apple.com`), not hosts merely containing `investor.`
//! - `medium.com/@` matches the host `medium.com` only for paths under `/@`
//!
//! Any other pattern matches when the hostname contains it.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::DomainClass;

/// Default high-trust publishers, research bodies, regulators and wire services.
pub const DEFAULT_PREFERRED: &[&str] = &[
    // business and tech press
    "reuters.com",
    "bloomberg.com",
    "wsj.com",
    "ft.com",
    "economist.com",
    "nytimes.com",
    "washingtonpost.com",
    "cnbc.com",
    "forbes.com",
    "seekingalpha.com",
    "techcrunch.com",
    "theverge.com",
    "wired.com",
    "arstechnica.com",
    // research, regulators, primary documents
    "arxiv.org",
    "nature.com",
    "science.org",
    "acm.org",
    "ieee.org",
    "ec.europa.eu",
    "whitehouse.gov",
    "congress.gov",
    "house.gov",
    "senate.gov",
    "federalregister.gov",
    "fti.org",
    "bis.doc.gov",
    // corporate primary sources
    "prnewswire.com",
    "businesswire.com",
    "investor.*",
    "ir.*",
];

/// Default aggregator, social and low-signal domains.
pub const DEFAULT_BLOCKED: &[&str] = &[
    "githubusercontent.com",
    "medium.com/@",
    "youtube.com",
    "x.com",
    "twitter.com",
    "reddit.com",
    "substack.com",
    "quora.com",
    "facebook.com",
    "tiktok.com",
];

/// One domain-matching pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DomainPattern {
    /// Hostname contains this text.
    Substring(String),
    /// Hostname's first label equals this text and more labels follow.
    LeadingLabel(String),
    /// Hostname contains `host` and the URL path starts with `path`.
    HostPath {
        /// Text the hostname must contain.
        host: String,
        /// Required path prefix, including the leading `/`.
        path: String,
    },
}

impl DomainPattern {
    /// Parse a pattern string. Every string is a valid pattern.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_lowercase();
        if let Some(label) = raw.strip_suffix(".*") {
            return Self::LeadingLabel(label.to_owned());
        }
        match raw.find('/') {
            Some(idx) => Self::HostPath {
                host: raw[..idx].to_owned(),
                path: raw[idx..].to_owned(),
            },
            None => Self::Substring(raw),
        }
    }

    /// Returns `true` if this pattern matches the lower-cased host and path.
    pub fn matches(&self, host: &str, path: &str) -> bool {
        match self {
            Self::Substring(text) => !text.is_empty() && host.contains(text.as_str()),
            Self::LeadingLabel(label) => host
                .split_once('.')
                .is_some_and(|(first, rest)| first == label && !rest.is_empty()),
            Self::HostPath { host: h, path: p } => {
                !h.is_empty() && host.contains(h.as_str()) && path.starts_with(p.as_str())
            }
        }
    }
}

impl From<String> for DomainPattern {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<DomainPattern> for String {
    fn from(pattern: DomainPattern) -> Self {
        match pattern {
            DomainPattern::Substring(text) => text,
            DomainPattern::LeadingLabel(label) => format!("{label}.*"),
            DomainPattern::HostPath { host, path } => format!("{host}{path}"),
        }
    }
}

/// Preferred and blocked pattern lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainRules {
    /// Patterns whose hosts receive the domain-quality boost.
    pub preferred: Vec<DomainPattern>,
    /// Patterns whose hosts are never admitted. Checked before `preferred`.
    pub blocked: Vec<DomainPattern>,
}

impl Default for DomainRules {
    fn default() -> Self {
        Self {
            preferred: DEFAULT_PREFERRED.iter().map(|p| DomainPattern::parse(p)).collect(),
            blocked: DEFAULT_BLOCKED.iter().map(|p| DomainPattern::parse(p)).collect(),
        }
    }
}

impl DomainRules {
    /// Rules with no patterns: every parseable URL is neutral.
    pub fn empty() -> Self {
        Self {
            preferred: Vec::new(),
            blocked: Vec::new(),
        }
    }

    /// Build rules from `(pattern, class)` pairs. `Neutral` pairs are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, DomainClass)>) -> Self {
        let mut rules = Self::empty();
        for (pattern, class) in pairs {
            rules.insert(pattern, class);
        }
        rules
    }

    /// Add a pattern for the given class. `Neutral` is a no-op.
    pub fn insert(&mut self, pattern: &str, class: DomainClass) {
        let parsed = DomainPattern::parse(pattern);
        match class {
            DomainClass::Preferred => self.preferred.push(parsed),
            DomainClass::Blocked => self.blocked.push(parsed),
            DomainClass::Neutral => {}
        }
    }

    /// Classify a URL. Unparseable URLs and URLs without a host are blocked.
    pub fn classify(&self, url: &str) -> DomainClass {
        match UrlTarget::parse(url) {
            Some(target) => self.classify_target(&target),
            None => DomainClass::Blocked,
        }
    }

    /// Classify an already-parsed target.
    pub(crate) fn classify_target(&self, target: &UrlTarget) -> DomainClass {
        let host = target.host.as_str();
        let path = target.path.as_str();
        if self.blocked.iter().any(|p| p.matches(host, path)) {
            DomainClass::Blocked
        } else if self.preferred.iter().any(|p| p.matches(host, path)) {
            DomainClass::Preferred
        } else {
            DomainClass::Neutral
        }
    }
}

/// Host and path of a URL, lower-cased host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UrlTarget {
    pub(crate) host: String,
    pub(crate) path: String,
}

impl UrlTarget {
    pub(crate) fn parse(url: &str) -> Option<Self> {
        let parsed = Url::parse(url.trim()).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        if host.is_empty() {
            return None;
        }
        Some(Self {
            host,
            path: parsed.path().to_owned(),
        })
    }

    /// The domain used for per-domain capping: host without a leading `www.`.
    pub(crate) fn domain(&self) -> String {
        self.host
            .strip_prefix("www.")
            .unwrap_or(&self.host)
            .to_owned()
    }
}

/// Normalized domain of a URL, or `None` if it has no parseable host.
///
/// # Examples
///
/// ```
/// use digest_sources::orchestrator::domain::domain_of;
///
/// assert_eq!(domain_of("https://WWW.Example.com/a").as_deref(), Some("example.com"));
/// assert_eq!(domain_of("not a url"), None);
/// ```
pub fn domain_of(url: &str) -> Option<String> {
    UrlTarget::parse(url).map(|t| t.domain())
}
