//! # digest-sources
//!
//! Source collection for topic digests.
//!
//! Given a topic, this crate expands it into several facet queries, runs
//! them through a search provider, merges the hits into one ranked and
//! source-diverse candidate list, and extracts readable page text until a
//! bundle of documents is full. The bundle feeds a downstream summarizer.
//!
//! ## Design
//!
//! - Search backends plug in through [`SearchProvider`]; [`TavilyProvider`]
//!   is the bundled implementation
//! - Page text comes through [`PageFetcher`]; [`HttpPageFetcher`] fetches
//!   over HTTP and strips boilerplate with CSS selectors
//! - Ranking is a deterministic pure function of the collected hits, the
//!   [`DomainRules`] and [`ScoringWeights`], and the current time
//! - A per-domain cap keeps one site from dominating the bundle
//! - Individual query or extraction failures degrade the result instead of
//!   failing the call; they are reported in [`Collection`]
//!
//! ## Security
//!
//! - The provider API key never appears in error messages
//! - Queries and fetched URLs are logged only at trace/debug level

pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod pacing;
pub mod provider;
pub mod providers;
pub mod types;

pub use config::CollectorConfig;
pub use content::{HttpPageFetcher, PageFetcher};
pub use error::{Result, SourceError};
pub use orchestrator::{Collector, DomainRules, QueryLanguage, ScoringWeights};
pub use provider::SearchProvider;
pub use providers::TavilyProvider;
pub use types::{
    Bundle, Collection, DomainClass, Document, ExtractionReport, ExtractionStatus, QueryReport,
    QueryStatus, ScoredHit, SearchHit,
};

/// Collect a source bundle for `topic` using Tavily and plain HTTP fetching.
///
/// Builds a [`TavilyProvider`] and an [`HttpPageFetcher`] from `config` and
/// runs one [`Collector::collect`] pass with `config.max_results`.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if `config` is invalid or `topic` is
/// empty, or [`SourceError::Http`] if an HTTP client cannot be built.
/// Search and extraction failures are reported in the returned
/// [`Collection`], not as errors.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> digest_sources::Result<()> {
/// let config = digest_sources::CollectorConfig::default();
/// let collection =
///     digest_sources::collect_sources("tvly-...", "quantum computing", false, &config).await?;
/// for doc in &collection.bundle {
///     println!("{}: {}", doc.title, doc.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn collect_sources(
    api_key: &str,
    topic: &str,
    extended_mode: bool,
    config: &CollectorConfig,
) -> Result<Collection> {
    config.validate()?;
    let provider = TavilyProvider::new(api_key, config)?;
    let fetcher = HttpPageFetcher::new(config)?;
    let collector = Collector::new(provider, fetcher, config.clone())?;
    collector
        .collect(topic, config.max_results, extended_mode)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_sources_validates_zero_max_results() {
        let config = CollectorConfig {
            max_results: 0,
            ..Default::default()
        };
        let result = collect_sources("k", "topic", false, &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_results"));
    }

    #[tokio::test]
    async fn collect_sources_validates_zero_timeout() {
        let config = CollectorConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let result = collect_sources("k", "topic", false, &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn collect_sources_rejects_empty_topic() {
        let config = CollectorConfig::default();
        let result = collect_sources("k", "   ", false, &config).await;
        assert!(matches!(result, Err(SourceError::Config(_))));
    }
}
