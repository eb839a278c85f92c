//! Relevance scoring for search hits.
//!
//! Three additive signals, no normalisation across hits:
//!
//! ```text
//! score = domain_bonus                        (preferred domains only)
//!       + recency_weight * exp(-age_days / recency_decay_days)
//!       + keyword_bonus * matched_keywords    (lower-cased title)
//!       + informative_title_bonus             (title >= min_title_chars)
//! ```
//!
//! Scores are only compared within one collection run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DomainClass, SearchHit};

/// Topical keywords rewarded in titles, English and Japanese variants.
pub const DEFAULT_TITLE_KEYWORDS: &[&str] = &[
    "regulation",
    "規制",
    "investment",
    "投資",
    "acquisition",
    "買収",
    "partnership",
    "提携",
    "benchmark",
    "ベンチマーク",
    "roadmap",
    "ロードマップ",
    "hiring",
    "採用",
];

/// Tunable constants of the scoring formula.
///
/// Defaults: +1.0 for preferred domains, 0.8 decaying over 60 days for recency,
/// +0.1 per title keyword and +0.1 for titles of 25+ characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Added when the hit's domain is preferred.
    pub preferred_bonus: f64,
    /// Credit for same-day content.
    pub recency_weight: f64,
    /// Decay constant of the recency term, in days.
    pub recency_decay_days: f64,
    /// Added once per keyword found in the title.
    pub keyword_bonus: f64,
    /// Keywords matched as substrings of the lower-cased title.
    pub title_keywords: Vec<String>,
    /// Titles with at least this many characters count as informative.
    pub min_title_chars: usize,
    /// Added for informative titles.
    pub informative_title_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            preferred_bonus: 1.0,
            recency_weight: 0.8,
            recency_decay_days: 60.0,
            keyword_bonus: 0.1,
            title_keywords: DEFAULT_TITLE_KEYWORDS.iter().map(|k| (*k).to_owned()).collect(),
            min_title_chars: 25,
            informative_title_bonus: 0.1,
        }
    }
}

/// Score one hit.
///
/// `class` must not be [`DomainClass::Blocked`]; blocked hits are filtered
/// before scoring and would simply receive no domain bonus here. `now` is the
/// reference time for the recency term.
pub fn score_hit(
    hit: &SearchHit,
    class: DomainClass,
    now: DateTime<Utc>,
    weights: &ScoringWeights,
) -> f64 {
    let published = hit.published_at.as_deref().and_then(parse_timestamp);
    domain_signal(class, weights)
        + recency_signal(published, now, weights)
        + title_signal(&hit.title, weights)
}

/// Domain-quality term.
pub fn domain_signal(class: DomainClass, weights: &ScoringWeights) -> f64 {
    if class == DomainClass::Preferred {
        weights.preferred_bonus
    } else {
        0.0
    }
}

/// Recency term. Zero when the timestamp is missing; future dates count as today.
pub fn recency_signal(
    published: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    weights: &ScoringWeights,
) -> f64 {
    let Some(published) = published else {
        return 0.0;
    };
    if weights.recency_decay_days <= 0.0 {
        return 0.0;
    }
    let age_days = ((now - published).num_milliseconds() as f64 / 86_400_000.0).max(0.0);
    (weights.recency_weight * (-age_days / weights.recency_decay_days).exp()).max(0.0)
}

/// Title term: keyword hits plus the informative-length bonus.
pub fn title_signal(title: &str, weights: &ScoringWeights) -> f64 {
    let lowered = title.to_lowercase();
    let hits = weights
        .title_keywords
        .iter()
        .filter(|kw| !kw.is_empty() && lowered.contains(kw.to_lowercase().as_str()))
        .count();
    let mut score = weights.keyword_bonus * hits as f64;
    if lowered.chars().count() >= weights.min_title_chars {
        score += weights.informative_title_bonus;
    }
    score
}

/// Parse a provider timestamp.
///
/// Accepts RFC 3339 (`2025-10-01T08:00:00Z`, offsets), RFC 2822
/// (`Wed, 01 Oct 2025 08:00:00 GMT`), naive ISO date-times and plain dates.
/// Naive values are read as UTC. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
