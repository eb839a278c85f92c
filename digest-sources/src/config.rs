//! Collector configuration with sensible defaults.
//!
//! [`CollectorConfig`] controls result limits, source diversity, pacing,
//! concurrency and the ranking heuristics. The defaults give
//! sequential, politely paced behaviour: one query and one page at a time.

use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::orchestrator::domain::DomainRules;
use crate::orchestrator::merge::DEFAULT_PER_DOMAIN_CAP;
use crate::orchestrator::planner::QueryLanguage;
use crate::orchestrator::scoring::ScoringWeights;
use crate::types::MAX_CONTENT_CHARS;

/// Configuration for a collection run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour. Deserializes from partial input
/// with missing fields taking their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Maximum documents in the bundle, also the per-query hit request size.
    pub max_results: usize,
    /// Maximum admitted candidates sharing one domain.
    pub per_domain_cap: usize,
    /// Language of the query expansion terms.
    pub language: QueryLanguage,
    /// HTTP timeout for provider calls and page fetches, in seconds.
    pub timeout_seconds: u64,
    /// Minimum interval between search calls, in milliseconds. 0 disables.
    pub search_interval_ms: u64,
    /// Minimum interval between page extractions, in milliseconds. 0 disables.
    pub extract_interval_ms: u64,
    /// Minimum interval between fetches to the same host, in milliseconds. 0 disables.
    pub per_host_interval_ms: u64,
    /// Search calls allowed in flight at once.
    pub query_workers: usize,
    /// Page extractions allowed in flight at once.
    pub extract_workers: usize,
    /// Characters kept from each extracted page.
    pub max_content_chars: usize,
    /// Send a `HEAD` request before fetching a page.
    pub probe_reachability: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Preferred and blocked domain patterns.
    pub domains: DomainRules,
    /// Scoring constants.
    pub scoring: ScoringWeights,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_results: 12,
            per_domain_cap: DEFAULT_PER_DOMAIN_CAP,
            language: QueryLanguage::default(),
            timeout_seconds: 25,
            search_interval_ms: 300,
            extract_interval_ms: 500,
            per_host_interval_ms: 1_000,
            query_workers: 1,
            extract_workers: 1,
            max_content_chars: MAX_CONTENT_CHARS,
            probe_reachability: true,
            user_agent: None,
            domains: DomainRules::default(),
            scoring: ScoringWeights::default(),
        }
    }
}

impl CollectorConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results`, `per_domain_cap` and `max_content_chars` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `query_workers` and `extract_workers` must be greater than 0
    /// - `scoring.recency_decay_days` must be positive and finite
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.max_results == 0 {
            return Err(SourceError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.per_domain_cap == 0 {
            return Err(SourceError::Config(
                "per_domain_cap must be greater than 0".into(),
            ));
        }
        if self.max_content_chars == 0 {
            return Err(SourceError::Config(
                "max_content_chars must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SourceError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.query_workers == 0 || self.extract_workers == 0 {
            return Err(SourceError::Config(
                "query_workers and extract_workers must be greater than 0".into(),
            ));
        }
        let decay = self.scoring.recency_decay_days;
        if !decay.is_finite() || decay <= 0.0 {
            return Err(SourceError::Config(
                "scoring.recency_decay_days must be a positive number".into(),
            ));
        }
        Ok(())
    }
}
