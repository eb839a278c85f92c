//! # topic-digest
//!
//! Host for the `digest-sources` collection pipeline: configuration file and
//! credentials, and rendering of the collected bundle for a summarizer.

pub mod config;
pub mod error;
pub mod sources;

pub use config::{DigestConfig, ExtendedMode};
pub use error::{DigestError, Result};
pub use sources::{render_source_block, OutputFormat};
