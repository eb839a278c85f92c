//! Search provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::SearchProvider`].

pub mod tavily;

pub use tavily::TavilyProvider;
