//! Core types for search hits, ranked candidates and the final document bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters kept from an extracted page.
pub const MAX_CONTENT_CHARS: usize = 14_000;

/// A single raw result returned by one search query.
///
/// Not yet deduplicated or scored. `published_at` is kept exactly as the
/// provider sent it; parsing happens at scoring time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The URL of the hit. May be empty when the provider omits it.
    pub url: String,
    /// The title of the result page.
    pub title: String,
    /// Publication timestamp as reported by the provider, if any.
    pub published_at: Option<String>,
}

impl SearchHit {
    /// Create a hit without a publication timestamp.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            published_at: None,
        }
    }

    /// Attach a raw publication timestamp.
    #[must_use]
    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }
}

/// Classification tier of a hit's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainClass {
    /// Known high-trust publisher, research body, regulator or wire service.
    Preferred,
    /// Aggregator, social or low-signal domain. Never admitted.
    Blocked,
    /// Everything else.
    Neutral,
}

impl DomainClass {
    /// Returns the lowercase name of this class.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Preferred => "preferred",
            Self::Blocked => "blocked",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for DomainClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A deduplicated, scored hit ready for content extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHit {
    /// The original hit.
    pub hit: SearchHit,
    /// Relevance score. Only meaningful relative to other hits of the same run.
    pub score: f64,
    /// Normalized hostname used for per-domain capping.
    pub domain: String,
    /// Parsed publication timestamp, if the raw value was parseable.
    pub published_at: Option<DateTime<Utc>>,
}

/// A content-bearing result included in the final bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Title of the source page as reported by the search provider.
    pub title: String,
    /// URL of the source page. Unique within a bundle.
    pub url: String,
    /// Cleaned body text, at most [`MAX_CONTENT_CHARS`] characters.
    pub content: String,
    /// Publication timestamp, if known.
    pub published_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Build a document from a ranked hit and its extracted text.
    ///
    /// The content is truncated to `max_chars` characters.
    pub fn from_hit(hit: &ScoredHit, content: &str, max_chars: usize) -> Self {
        Self {
            title: hit.hit.title.clone(),
            url: hit.hit.url.clone(),
            content: crate::content::truncate_chars(content, max_chars),
            published_at: hit.published_at,
        }
    }
}

/// The ordered collection of documents returned by one collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle {
    documents: Vec<Document>,
}

impl Bundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in the bundle.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the bundle holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The documents in rank order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Iterate over the documents in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Returns `true` if a document with this URL is already present.
    pub fn contains_url(&self, url: &str) -> bool {
        self.documents.iter().any(|d| d.url == url)
    }

    /// Append a document, ignoring it if its URL is already present.
    pub(crate) fn push(&mut self, document: Document) -> bool {
        if self.contains_url(&document.url) {
            return false;
        }
        self.documents.push(document);
        true
    }
}

impl FromIterator<Document> for Bundle {
    /// Collect documents in order, keeping the first of any repeated URL.
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut bundle = Self::new();
        for document in iter {
            bundle.push(document);
        }
        bundle
    }
}

impl<'a> IntoIterator for &'a Bundle {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Outcome of one planned search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum QueryStatus {
    /// The provider returned this many hits.
    Hits(usize),
    /// The provider answered with zero hits.
    Empty,
    /// The provider call failed; the message is the error's display form.
    Failed(String),
}

/// Diagnostics for one planned query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryReport {
    /// The query string sent to the provider.
    pub query: String,
    /// What happened.
    pub status: QueryStatus,
}

/// Outcome of one content extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "chars", rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// Text was extracted; carries the stored character count.
    Extracted(usize),
    /// Nothing usable came back. The candidate was dropped.
    Empty,
}

/// Diagnostics for one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// The candidate URL.
    pub url: String,
    /// What happened.
    pub status: ExtractionStatus,
}

/// Everything a collection run produced: the bundle plus per-item diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// The topic as given by the caller.
    pub topic: String,
    /// The bundle handed to the downstream consumer.
    pub bundle: Bundle,
    /// One report per planned query, in plan order.
    pub queries: Vec<QueryReport>,
    /// One report per attempted extraction, in rank order.
    pub extractions: Vec<ExtractionReport>,
}

impl Collection {
    /// Returns `true` if every planned query failed.
    pub fn all_queries_failed(&self) -> bool {
        !self.queries.is_empty()
            && self
                .queries
                .iter()
                .all(|q| matches!(q.status, QueryStatus::Failed(_)))
    }

    /// Error messages of the failed queries, paired with the query text.
    pub fn query_failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.queries.iter().filter_map(|q| match &q.status {
            QueryStatus::Failed(msg) => Some((q.query.as_str(), msg.as_str())),
            _ => None,
        })
    }

    /// Number of candidates whose extraction came back empty.
    pub fn empty_extractions(&self) -> usize {
        self.extractions
            .iter()
            .filter(|e| e.status == ExtractionStatus::Empty)
            .count()
    }
}
