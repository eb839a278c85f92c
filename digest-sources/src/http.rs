//! HTTP client shared by the search provider and the page fetcher.
//!
//! One client per adapter, built from [`CollectorConfig`]: request timeout,
//! cookie store, bounded redirects, a browser User-Agent and an
//! `Accept-Language` matching the query language, so fetched pages come back
//! in the language the queries were written in.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};

use crate::config::CollectorConfig;
use crate::error::SourceError;
use crate::orchestrator::planner::QueryLanguage;

/// Redirect hops followed before a fetch is abandoned.
pub const MAX_REDIRECTS: usize = 10;

const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build the client used for provider calls and page fetches.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the client cannot be constructed.
pub fn build_client(config: &CollectorConfig) -> Result<reqwest::Client, SourceError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(accept_language(config.language)),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(resolve_user_agent(config))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| SourceError::Http(format!("failed to build HTTP client: {e}")))
}

/// `Accept-Language` value for a query language.
pub fn accept_language(language: QueryLanguage) -> &'static str {
    match language {
        QueryLanguage::Japanese => "ja,en-US;q=0.8,en;q=0.6",
        QueryLanguage::English => "en-US,en;q=0.9",
    }
}

/// The configured User-Agent, or a random browser one when unset or blank.
pub fn resolve_user_agent(config: &CollectorConfig) -> String {
    match config.user_agent.as_deref().map(str::trim) {
        Some(custom) if !custom.is_empty() => custom.to_owned(),
        _ => random_user_agent().to_owned(),
    }
}

/// Pick a browser User-Agent at random.
pub fn random_user_agent() -> &'static str {
    BROWSER_USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(BROWSER_USER_AGENTS[0])
}
