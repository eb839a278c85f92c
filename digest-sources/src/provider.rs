//! Trait definition for pluggable search providers.
//!
//! The collector talks to the search backend only through
//! [`SearchProvider`], so tests can substitute in-process fakes and
//! deployments can swap the backend.

use crate::error::SourceError;
use crate::types::SearchHit;

/// A pluggable search backend.
///
/// Contract:
///
/// - one backend call per invocation, no internal retry
/// - zero hits is `Ok(vec![])`, not an error
/// - transport or authentication failures are [`SourceError::Provider`]
///
/// All implementations must be `Send + Sync` so queries can run concurrently.
pub trait SearchProvider: Send + Sync {
    /// Run one search and return its raw hits.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Provider`] if the backend is unreachable or
    /// rejects the request.
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, SourceError>> + Send;

    /// Short provider name for diagnostics.
    fn name(&self) -> &'static str;
}
