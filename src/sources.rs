//! Rendering a collected bundle for the downstream summarizer.
//!
//! The text form is the numbered source block a summarizer prompt cites by
//! index: one entry per document, `[n] title — url`, an excerpt label, and
//! the first [`EXCERPT_CHARS`] characters of the content.

use digest_sources::content::truncate_chars;
use digest_sources::{Bundle, Collection, QueryLanguage};

use crate::error::{DigestError, Result};

/// Characters of content shown per source.
pub const EXCERPT_CHARS: usize = 700;

/// Output format of the collect binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Numbered source block.
    #[default]
    Text,
    /// The full [`Collection`] as pretty-printed JSON.
    Json,
}

fn excerpt_label(language: QueryLanguage) -> &'static str {
    match language {
        QueryLanguage::Japanese => "抜粋:",
        QueryLanguage::English => "Excerpt:",
    }
}

/// Render the numbered source block, entries separated by blank lines.
///
/// Numbering starts at 1 and follows bundle order. An empty bundle renders
/// as an empty string.
pub fn render_source_block(bundle: &Bundle, language: QueryLanguage) -> String {
    let label = excerpt_label(language);
    bundle
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            format!(
                "[{}] {} — {}\n{label}\n{}",
                i + 1,
                doc.title,
                doc.url,
                truncate_chars(&doc.content, EXCERPT_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a collection in the requested format.
///
/// # Errors
///
/// Returns [`DigestError::Config`] if JSON serialization fails.
pub fn render(
    collection: &Collection,
    format: OutputFormat,
    language: QueryLanguage,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_source_block(&collection.bundle, language)),
        OutputFormat::Json => serde_json::to_string_pretty(collection)
            .map_err(|e| DigestError::Config(format!("failed to serialize collection: {e}"))),
    }
}
