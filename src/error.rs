//! Error types for the topic-digest host.

use digest_sources::SourceError;

/// Top-level error type for digest collection.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// Configuration file could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),

    /// A required setting (such as an API key) is absent.
    #[error("missing configuration: {0}")]
    ConfigurationMissing(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source collection error.
    #[error(transparent)]
    Sources(#[from] SourceError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_names_the_setting() {
        let err = DigestError::ConfigurationMissing("TAVILY_API_KEY is not set".into());
        assert_eq!(
            err.to_string(),
            "missing configuration: TAVILY_API_KEY is not set"
        );
    }

    #[test]
    fn source_errors_pass_through() {
        let err: DigestError = SourceError::Config("topic must not be empty".into()).into();
        assert_eq!(err.to_string(), "config error: topic must not be empty");
        assert!(matches!(err, DigestError::Sources(_)));
    }

    #[test]
    fn io_errors_convert() {
        let err: DigestError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
