//! Page fetching and HTML content extraction.
//!
//! Parses raw HTML, removes non-content elements (scripts, styles,
//! navigation, tables), finds the main content area, and returns clean
//! readable text for the downstream summarizer. Extraction favours recall:
//! when the detected content area is thin, the whole body is used instead.
//!
//! Fetch failures never surface as errors to the collector. A
//! [`PageFetcher`] returns `None` for anything that did not produce text.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};

use crate::config::CollectorConfig;
use crate::error::{Result, SourceError};
use crate::http;

/// Content areas shorter than this fall back to the whole `<body>`.
const MIN_CONTENT_AREA_CHARS: usize = 200;

/// Elements removed together with their content before parsing.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe", "table",
];

/// Media types whose bodies are parsed as markup. Anything else is skipped.
const TEXT_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/plain"];

/// A source of cleaned page text.
///
/// Implementations swallow every failure (transport error, timeout, HTTP
/// error status, empty extraction) and return `None`.
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its cleaned body text, or `None`.
    fn fetch_clean(&self, url: &str) -> impl Future<Output = Option<String>> + Send;
}

/// [`PageFetcher`] over HTTP: optional `HEAD` probe, `GET`, then [`extract_text`].
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    probe_reachability: bool,
    max_chars: usize,
}

impl HttpPageFetcher {
    /// Build a fetcher from collector configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            probe_reachability: config.probe_reachability,
            max_chars: config.max_content_chars,
        })
    }

    /// Fetch and extract, keeping the failure reason for logging.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] for transport failures and error
    /// statuses, [`SourceError::Parse`] when the body is neither markup nor
    /// plain text or no text could be extracted.
    pub async fn try_fetch_clean(&self, url: &str) -> Result<String> {
        if self.probe_reachability {
            // Only transport failures count; the probe status is ignored.
            self.client
                .head(url)
                .send()
                .await
                .map_err(|e| SourceError::Http(format!("reachability probe failed: {e}")))?;
        }

        let response = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| SourceError::Http(format!("page request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SourceError::Http(format!("page HTTP error: {e}")))?;

        // Bodies without a Content-Type are still parsed.
        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !is_text_media_type(content_type) {
                return Err(SourceError::Parse(format!(
                    "unsupported content type: {content_type}"
                )));
            }
        }

        let html = response
            .text()
            .await
            .map_err(|e| SourceError::Http(format!("page body read failed: {e}")))?;

        tracing::trace!(url, bytes = html.len(), "page fetched");

        extract_text(&html, self.max_chars)
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch_clean(&self, url: &str) -> Option<String> {
        match self.try_fetch_clean(url).await {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!(url, error = %err, "page extraction yielded nothing");
                None
            }
        }
    }
}

/// Returns `true` for `Content-Type` values naming a markup or plain-text body.
///
/// Parameters such as `charset` are ignored.
fn is_text_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    TEXT_MEDIA_TYPES.contains(&essence.as_str())
}

/// Extract readable text from raw HTML, truncated to `max_chars` characters.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if no extractable content is found.
pub fn extract_text(html: &str, max_chars: usize) -> Result<String> {
    let cleaned_html = strip_boilerplate_tags(html);
    let document = Html::parse_document(&cleaned_html);

    let text = normalise_whitespace(&extract_main_text(&document));
    if text.is_empty() {
        return Err(SourceError::Parse("no extractable content found".into()));
    }

    Ok(truncate_chars(&text, max_chars))
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_owned(),
        None => text.to_owned(),
    }
}

/// Extract text from the main content area of the document.
///
/// Tries content-specific selectors in priority order. All matching
/// elements of the first productive selector are joined, so pages with
/// several `<article>` blocks keep all of them. Thin content areas fall
/// back to `<body>`.
fn extract_main_text(document: &Html) -> String {
    let body = selector_text(document, "body");

    for selector_str in ["article", "main", "[role=\"main\"]"] {
        let text = selector_text(document, selector_str);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().count() < MIN_CONTENT_AREA_CHARS
            && body.trim().chars().count() > trimmed.chars().count()
        {
            break;
        }
        return trimmed.to_owned();
    }

    body.trim().to_owned()
}

/// Text of every element matching `selector_str`, elements separated by blank lines.
fn selector_text(document: &Html, selector_str: &str) -> String {
    let Ok(selector) = Selector::parse(selector_str) else {
        return String::new();
    };
    document
        .select(&selector)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Remove boilerplate HTML tags and their content before parsing.
fn strip_boilerplate_tags(html: &str) -> String {
    let mut result = html.to_owned();
    for tag in BOILERPLATE_TAGS {
        result = strip_tag(&result, tag);
    }
    result
}

/// Remove all instances of a specific HTML tag and its content.
fn strip_tag(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    // ASCII lowercase keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");

    let mut pos = 0;
    loop {
        let start = match lower[pos..].find(&open_tag) {
            Some(offset) => pos + offset,
            None => {
                result.push_str(&html[pos..]);
                break;
            }
        };

        // Verify this is actually the target tag (not e.g. <navigate> for <nav>).
        let after_tag = start + open_tag.len();
        if after_tag < lower.len() {
            let next_byte = lower.as_bytes()[after_tag];
            if !matches!(next_byte, b' ' | b'>' | b'/' | b'\n' | b'\r' | b'\t') {
                result.push_str(&html[pos..after_tag]);
                pos = after_tag;
                continue;
            }
        }

        result.push_str(&html[pos..start]);

        let end = match lower[start..].find(&close_tag) {
            Some(offset) => start + offset + close_tag.len(),
            None => match lower[start..].find('>') {
                Some(offset) => start + offset + 1,
                None => html.len(),
            },
        };

        pos = end;
    }

    result
}

/// Collapse excess whitespace: multiple spaces become one, 3+ newlines become 2.
fn normalise_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = false;
    let mut newline_count: u32 = 0;

    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            newline_count += 1;
            prev_was_space = false;
            if newline_count <= 2 {
                result.push('\n');
            }
        } else if ch.is_whitespace() {
            newline_count = 0;
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            newline_count = 0;
            prev_was_space = false;
            result.push(ch);
        }
    }

    result
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}
