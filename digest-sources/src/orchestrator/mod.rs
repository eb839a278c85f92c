//! Collection orchestrator: query planning, domain classification,
//! scoring, merge and ranking, and the end-to-end [`Collector`].
//!
//! Everything except [`collect`] is pure and synchronous; the collector
//! is the only part that performs I/O.

pub mod collect;
pub mod domain;
pub mod merge;
pub mod planner;
pub mod scoring;

pub use collect::Collector;
pub use domain::{DomainPattern, DomainRules};
pub use merge::{merge_hits, MergeOptions};
pub use planner::{plan_queries, QueryLanguage};
pub use scoring::ScoringWeights;
