//! Cross-query merge: deduplication, scoring and cap-aware ranking.
//!
//! Runs once, single-threaded, after every query has returned. The pass is
//! deterministic: identical hit-lists and reference time give identical output.
//!
//! 1. Flatten all hit-lists in first-seen order.
//! 2. Drop hits with an empty URL, a URL already seen (exact match), or a
//!    blocked domain.
//! 3. Score the survivors.
//! 4. Stable-sort by score descending, so equal scores keep first-seen order.
//! 5. Admit hits while their domain's running count is below the cap.
//! 6. Optionally truncate.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::types::{DomainClass, ScoredHit, SearchHit};

use super::domain::{DomainRules, UrlTarget};
use super::scoring::{parse_timestamp, score_hit, ScoringWeights};

/// Default maximum number of admitted hits sharing one domain.
pub const DEFAULT_PER_DOMAIN_CAP: usize = 3;

/// Parameters of one merge pass.
#[derive(Debug, Clone, Copy)]
pub struct MergeOptions<'a> {
    /// Domain rules used to drop blocked hits and boost preferred ones.
    pub rules: &'a DomainRules,
    /// Scoring constants.
    pub weights: &'a ScoringWeights,
    /// Maximum admitted hits per domain.
    pub per_domain_cap: usize,
    /// Truncate the admitted list to this many hits, if set.
    pub limit: Option<usize>,
    /// Reference time for the recency term.
    pub now: DateTime<Utc>,
}

/// Deduplicate and score hits without ranking or capping.
///
/// Output is in first-seen order.
pub fn dedup_and_score<'h, I>(hit_lists: I, options: &MergeOptions<'_>) -> Vec<ScoredHit>
where
    I: IntoIterator<Item = &'h [SearchHit]>,
{
    let mut seen: HashSet<&'h str> = HashSet::new();
    let mut scored = Vec::new();

    for hit in hit_lists.into_iter().flatten() {
        let url = hit.url.as_str();
        if url.trim().is_empty() || !seen.insert(url) {
            continue;
        }
        let Some(target) = UrlTarget::parse(url) else {
            continue;
        };
        let class = options.rules.classify_target(&target);
        if class == DomainClass::Blocked {
            continue;
        }
        scored.push(ScoredHit {
            hit: hit.clone(),
            score: score_hit(hit, class, options.now, options.weights),
            domain: target.domain(),
            published_at: hit.published_at.as_deref().and_then(parse_timestamp),
        });
    }

    scored
}

/// Rank scored hits: stable sort by score, then enforce the per-domain cap.
pub fn rank_with_cap(
    mut scored: Vec<ScoredHit>,
    per_domain_cap: usize,
    limit: Option<usize>,
) -> Vec<ScoredHit> {
    // `sort_by` is stable: equal scores keep their first-seen order.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let limit = limit.unwrap_or(usize::MAX);
    let mut domain_counts: HashMap<String, usize> = HashMap::new();
    let mut admitted = Vec::new();

    for hit in scored {
        if admitted.len() >= limit {
            break;
        }
        let count = domain_counts.entry(hit.domain.clone()).or_insert(0);
        if *count >= per_domain_cap {
            continue;
        }
        *count += 1;
        admitted.push(hit);
    }

    admitted
}

/// Full merge pass over the per-query hit-lists.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use digest_sources::orchestrator::domain::DomainRules;
/// use digest_sources::orchestrator::merge::{merge_hits, MergeOptions};
/// use digest_sources::orchestrator::scoring::ScoringWeights;
/// use digest_sources::SearchHit;
///
/// let rules = DomainRules::default();
/// let weights = ScoringWeights::default();
/// let options = MergeOptions {
///     rules: &rules,
///     weights: &weights,
///     per_domain_cap: 3,
///     limit: None,
///     now: Utc::now(),
/// };
/// let first = vec![SearchHit::new("https://a.org/1", "One")];
/// let second = vec![SearchHit::new("https://a.org/1", "One again")];
/// let merged = merge_hits([first.as_slice(), second.as_slice()], &options);
/// assert_eq!(merged.len(), 1);
/// ```
pub fn merge_hits<'h, I>(hit_lists: I, options: &MergeOptions<'_>) -> Vec<ScoredHit>
where
    I: IntoIterator<Item = &'h [SearchHit]>,
{
    let scored = dedup_and_score(hit_lists, options);
    rank_with_cap(scored, options.per_domain_cap, options.limit)
}
