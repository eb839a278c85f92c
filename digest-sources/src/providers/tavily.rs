//! Tavily search API client.
//!
//! Sends one `POST /search` per query with answer generation and raw
//! content disabled; only URL, title and publication date are used.

use serde::{Deserialize, Serialize};

use crate::config::CollectorConfig;
use crate::error::SourceError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::SearchHit;

/// Production Tavily endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Tavily API request body.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
}

/// Tavily API response.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// Individual search result from Tavily.
#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
}

impl From<TavilyResult> for SearchHit {
    fn from(r: TavilyResult) -> Self {
        Self {
            url: r.url.unwrap_or_default(),
            title: r.title.unwrap_or_default(),
            published_at: r.published_date.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// [`SearchProvider`] backed by the Tavily search API.
#[derive(Debug, Clone)]
pub struct TavilyProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TavilyProvider {
    /// Create a client for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>, config: &CollectorConfig) -> Result<Self, SourceError> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            client: http::build_client(config)?,
        })
    }

    /// Point the client at another endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}

impl SearchProvider for TavilyProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SourceError> {
        tracing::trace!(query, max_results, "Tavily search");

        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
            include_answer: false,
            include_raw_content: false,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                SourceError::Provider(format!("Tavily request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Provider(format!("Tavily API error: HTTP {status}")));
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Provider(format!("Tavily response decode failed: {e}")))?;

        let hits: Vec<SearchHit> = body.results.into_iter().map(SearchHit::from).collect();
        tracing::trace!(count = hits.len(), "Tavily response received");
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}
