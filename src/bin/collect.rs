//! `digest-collect`: collect a source bundle for one topic and print it.
//!
//! The bundle goes to stdout (numbered source block or JSON). All tracing
//! output goes to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use digest_sources::{Collection, Collector, HttpPageFetcher, SearchProvider, TavilyProvider};
use topic_digest::config::api_key_from_env;
use topic_digest::sources::render;
use topic_digest::{DigestConfig, ExtendedMode, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Collect ranked, source-diverse documents on a topic.
#[derive(Parser)]
#[command(name = "digest-collect", version, about)]
struct Cli {
    /// Topic to research.
    topic: String,

    /// Path to TOML configuration file.
    #[arg(short, long, env = "TOPIC_DIGEST_CONFIG")]
    config: Option<PathBuf>,

    /// Override the maximum number of documents.
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Override when the extended research facet is queried.
    #[arg(long, value_enum)]
    extended: Option<ExtendedArg>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtendedArg {
    Auto,
    On,
    Off,
}

impl From<ExtendedArg> for ExtendedMode {
    fn from(arg: ExtendedArg) -> Self {
        match arg {
            ExtendedArg::Auto => Self::Auto,
            ExtendedArg::On => Self::On,
            ExtendedArg::Off => Self::Off,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = DigestConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(max_results) = cli.max_results {
        config.sources.max_results = max_results;
    }
    if let Some(extended) = cli.extended {
        config.extended_mode = extended.into();
    }
    let api_key = api_key_from_env()?;

    let today = chrono::Local::now().date_naive();
    let extended_mode = config.extended_mode.resolve(today);
    tracing::info!(topic = %cli.topic, extended_mode, "collecting sources");

    let provider = TavilyProvider::new(api_key, &config.sources)?;
    let fetcher = HttpPageFetcher::new(&config.sources)?;
    let collector = Collector::new(provider, fetcher, config.sources.clone())?;
    let collection = collector
        .collect(&cli.topic, config.sources.max_results, extended_mode)
        .await?;
    log_diagnostics(collector.provider().name(), &collection);

    let output = render(&collection, cli.format.into(), config.sources.language)?;
    println!("{output}");
    Ok(())
}

fn log_diagnostics(provider: &str, collection: &Collection) {
    for (query, error) in collection.query_failures() {
        tracing::warn!(query, error, "search query failed");
    }
    if collection.all_queries_failed() {
        tracing::warn!("every search query failed; the bundle is empty");
    }
    tracing::info!(
        provider,
        documents = collection.bundle.len(),
        queries = collection.queries.len(),
        empty_extractions = collection.empty_extractions(),
        "collection finished"
    );
}
