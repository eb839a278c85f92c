//! Error types for the digest-sources crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys appear in error messages.

/// Errors that can occur while collecting sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The search provider was unreachable or rejected the request.
    #[error("provider error: {0}")]
    Provider(String),

    /// An HTTP request outside the provider call failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to extract content from a response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid collector configuration or input.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for digest-sources results.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_provider() {
        let err = SourceError::Provider("401 Unauthorized".into());
        assert_eq!(err.to_string(), "provider error: 401 Unauthorized");
    }

    #[test]
    fn display_http() {
        let err = SourceError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_parse() {
        let err = SourceError::Parse("no extractable content found".into());
        assert_eq!(err.to_string(), "parse error: no extractable content found");
    }

    #[test]
    fn display_config() {
        let err = SourceError::Config("max_results must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "config error: max_results must be greater than 0"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SourceError>();
    }
}
