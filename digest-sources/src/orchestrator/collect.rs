//! Collection orchestrator: plan, search, merge, extract.
//!
//! # Pipeline
//!
//! 1. Expand the topic into facet queries ([`plan_queries`])
//! 2. Run every query through the [`SearchProvider`], paced and with at
//!    most `query_workers` in flight; failures become [`QueryStatus::Failed`]
//! 3. After all queries have returned, merge in one deterministic pass:
//!    dedup, drop blocked domains, score, rank, cap per domain
//! 4. Extract candidates in rank order through the [`PageFetcher`], paced
//!    globally and per host, with at most `extract_workers` in flight;
//!    empty extractions are dropped and the next candidate takes the slot
//! 5. Stop once `max_results` documents exist
//!
//! The collector reports what happened through [`Collection`] diagnostics
//! and leaves logging to the caller.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::config::CollectorConfig;
use crate::content::PageFetcher;
use crate::error::{Result, SourceError};
use crate::pacing::Pacer;
use crate::provider::SearchProvider;
use crate::types::{
    Bundle, Collection, Document, ExtractionReport, ExtractionStatus, QueryReport, QueryStatus,
    ScoredHit, SearchHit,
};

use super::merge::{merge_hits, MergeOptions};
use super::planner::plan_queries;

/// Runs collection passes against one search provider and one page fetcher.
#[derive(Debug)]
pub struct Collector<P, F> {
    provider: P,
    fetcher: F,
    config: CollectorConfig,
    search_pacer: Pacer,
    extract_pacer: Pacer,
}

impl<P, F> Collector<P, F>
where
    P: SearchProvider,
    F: PageFetcher,
{
    /// Create a collector.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if `config` fails validation.
    pub fn new(provider: P, fetcher: F, config: CollectorConfig) -> Result<Self> {
        config.validate()?;
        let search_pacer = Pacer::global(Duration::from_millis(config.search_interval_ms));
        let extract_pacer = Pacer::new(
            Duration::from_millis(config.extract_interval_ms),
            Duration::from_millis(config.per_host_interval_ms),
        );
        Ok(Self {
            provider,
            fetcher,
            config,
            search_pacer,
            extract_pacer,
        })
    }

    /// The configuration this collector runs with.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// The search provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The page fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Collect up to `max_results` documents for `topic`.
    ///
    /// Individual query and extraction failures never fail the call; they
    /// show up in the returned diagnostics and, at worst, as an empty bundle.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] only for invalid input: an empty
    /// topic or `max_results == 0`.
    pub async fn collect(
        &self,
        topic: &str,
        max_results: usize,
        extended_mode: bool,
    ) -> Result<Collection> {
        self.collect_at(topic, max_results, extended_mode, Utc::now())
            .await
    }

    /// Same as [`Collector::collect`], scoring recency against `now`.
    ///
    /// # Errors
    ///
    /// Same as [`Collector::collect`].
    pub async fn collect_at(
        &self,
        topic: &str,
        max_results: usize,
        extended_mode: bool,
        now: DateTime<Utc>,
    ) -> Result<Collection> {
        if max_results == 0 {
            return Err(SourceError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        let queries = plan_queries(topic, extended_mode, self.config.language);
        if queries.is_empty() {
            return Err(SourceError::Config("topic must not be empty".into()));
        }

        let (query_reports, hit_lists) = self.run_queries(&queries, max_results).await;

        let options = MergeOptions {
            rules: &self.config.domains,
            weights: &self.config.scoring,
            per_domain_cap: self.config.per_domain_cap,
            limit: None,
            now,
        };
        let candidates = merge_hits(hit_lists.iter().map(Vec::as_slice), &options);

        let (bundle, extractions) = self.extract_candidates(&candidates, max_results).await;

        Ok(Collection {
            topic: topic.to_owned(),
            bundle,
            queries: query_reports,
            extractions,
        })
    }

    /// Run every planned query, returning reports and hit-lists in plan order.
    async fn run_queries(
        &self,
        queries: &[String],
        max_results: usize,
    ) -> (Vec<QueryReport>, Vec<Vec<SearchHit>>) {
        let outcomes: Vec<_> = stream::iter(queries)
            .map(|query| async move {
                self.search_pacer.wait().await;
                let outcome = self.provider.search(query, max_results).await;
                (query, outcome)
            })
            .buffered(self.config.query_workers)
            .collect()
            .await;

        let mut reports = Vec::with_capacity(outcomes.len());
        let mut hit_lists = Vec::with_capacity(outcomes.len());
        for (query, outcome) in outcomes {
            let status = match outcome {
                Ok(hits) if hits.is_empty() => QueryStatus::Empty,
                Ok(hits) => {
                    let count = hits.len();
                    hit_lists.push(hits);
                    QueryStatus::Hits(count)
                }
                Err(err) => QueryStatus::Failed(err.to_string()),
            };
            reports.push(QueryReport {
                query: query.clone(),
                status,
            });
        }
        (reports, hit_lists)
    }

    /// Extract candidates in rank order until `max_results` documents exist.
    async fn extract_candidates(
        &self,
        candidates: &[ScoredHit],
        max_results: usize,
    ) -> (Bundle, Vec<ExtractionReport>) {
        let mut bundle = Bundle::new();
        let mut reports = Vec::new();

        let mut attempts = std::pin::pin!(stream::iter(candidates)
            .map(|candidate| async move {
                self.extract_pacer.wait_for_host(&candidate.domain).await;
                let text = self.fetcher.fetch_clean(&candidate.hit.url).await;
                (candidate, text)
            })
            .buffered(self.config.extract_workers));

        while let Some((candidate, text)) = attempts.next().await {
            let status = match text.filter(|t| !t.trim().is_empty()) {
                Some(text) => {
                    let document =
                        Document::from_hit(candidate, &text, self.config.max_content_chars);
                    let chars = document.content.chars().count();
                    bundle.push(document);
                    ExtractionStatus::Extracted(chars)
                }
                None => ExtractionStatus::Empty,
            };
            reports.push(ExtractionReport {
                url: candidate.hit.url.clone(),
                status,
            });
            if bundle.len() >= max_results {
                break;
            }
        }

        (bundle, reports)
    }
}
