//! Integration tests for the collection pipeline.
//!
//! Most tests drive [`Collector`] with in-process fakes (no network). The
//! last group runs the bundled Tavily client and HTTP fetcher against a
//! local mock server.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use digest_sources::orchestrator::plan_queries;
use digest_sources::{
    Collector, CollectorConfig, ExtractionStatus, HttpPageFetcher, PageFetcher, QueryLanguage,
    QueryStatus, SearchHit, SearchProvider, SourceError, TavilyProvider,
};

/// Provider returning canned hits per facet index; unknown queries yield nothing.
struct FakeProvider {
    responses: HashMap<String, Result<Vec<SearchHit>, String>>,
}

impl FakeProvider {
    fn new(topic: &str, by_facet: Vec<(usize, Result<Vec<SearchHit>, String>)>) -> Self {
        let queries = plan_queries(topic, true, QueryLanguage::English);
        let responses = by_facet
            .into_iter()
            .map(|(idx, response)| (queries[idx].clone(), response))
            .collect();
        Self { responses }
    }

    fn failing(topic: &str) -> Self {
        Self::new(
            topic,
            (0..5).map(|i| (i, Err(format!("facet {i} down")))).collect(),
        )
    }
}

impl SearchProvider for FakeProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SourceError> {
        match self.responses.get(query) {
            Some(Ok(hits)) => Ok(hits.iter().take(max_results).cloned().collect()),
            Some(Err(msg)) => Err(SourceError::Provider(msg.clone())),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Fetcher that records every URL it is asked for. URLs containing
/// `/paywalled` extract to nothing.
#[derive(Default)]
struct RecordingFetcher {
    fetched: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().expect("lock").clone()
    }
}

impl PageFetcher for RecordingFetcher {
    async fn fetch_clean(&self, url: &str) -> Option<String> {
        self.fetched.lock().expect("lock").push(url.to_owned());
        if url.contains("/paywalled") {
            None
        } else {
            Some(format!("Body text extracted from {url}."))
        }
    }
}

fn test_config() -> CollectorConfig {
    CollectorConfig {
        language: QueryLanguage::English,
        search_interval_ms: 0,
        extract_interval_ms: 0,
        per_host_interval_ms: 0,
        ..Default::default()
    }
}

fn hit(url: &str, title: &str) -> SearchHit {
    SearchHit::new(url, title)
}

fn urls(collection: &digest_sources::Collection) -> Vec<&str> {
    collection.bundle.iter().map(|d| d.url.as_str()).collect()
}

#[tokio::test]
async fn overlapping_results_appear_once() {
    let topic = "quantum computing";
    let provider = FakeProvider::new(
        topic,
        vec![
            (
                0,
                Ok(vec![
                    hit("https://www.nature.com/articles/q1", "Quantum advantage shown"),
                    hit("https://alpha.org/news", "Alpha news"),
                ]),
            ),
            (
                1,
                Ok(vec![
                    hit("https://www.nature.com/articles/q1", "Quantum advantage shown"),
                    hit("https://beta.org/press", "Beta press release"),
                ]),
            ),
        ],
    );
    let collector = Collector::new(provider, RecordingFetcher::default(), test_config())
        .expect("valid config");

    let collection = collector.collect(topic, 12, false).await.expect("collect");

    let found = urls(&collection);
    assert_eq!(found.len(), 3);
    assert_eq!(
        found
            .iter()
            .filter(|u| **u == "https://www.nature.com/articles/q1")
            .count(),
        1
    );
    // Preferred domain ranks first.
    assert_eq!(found[0], "https://www.nature.com/articles/q1");
    assert_eq!(collection.queries.len(), 4);
    assert_eq!(collection.queries[0].status, QueryStatus::Hits(2));
    assert_eq!(collection.queries[2].status, QueryStatus::Empty);
}

#[tokio::test]
async fn all_provider_failures_yield_empty_bundle() {
    let topic = "solid state batteries";
    let fetcher = RecordingFetcher::default();
    let collector =
        Collector::new(FakeProvider::failing(topic), fetcher, test_config()).expect("valid");

    let collection = collector.collect(topic, 12, true).await.expect("not an error");

    assert!(collection.bundle.is_empty());
    assert!(collection.all_queries_failed());
    assert_eq!(collection.query_failures().count(), 5);
    assert!(collection.extractions.is_empty());
}

#[tokio::test]
async fn empty_extraction_does_not_cost_a_slot() {
    let topic = "topic";
    let provider = FakeProvider::new(
        topic,
        vec![(
            0,
            Ok(vec![
                hit("https://alpha.org/paywalled/1", "Alpha"),
                hit("https://beta.org/2", "Beta"),
                hit("https://gamma.org/3", "Gamma"),
            ]),
        )],
    );
    let collector =
        Collector::new(provider, RecordingFetcher::default(), test_config()).expect("valid");

    let collection = collector.collect(topic, 2, false).await.expect("collect");

    assert_eq!(
        urls(&collection),
        vec!["https://beta.org/2", "https://gamma.org/3"]
    );
    assert_eq!(collection.empty_extractions(), 1);
    assert_eq!(collection.extractions[0].status, ExtractionStatus::Empty);
}

#[tokio::test]
async fn one_domain_capped_at_three() {
    let topic = "topic";
    let mut hits: Vec<SearchHit> = (0..20)
        .map(|i| hit(&format!("https://bigsite.org/post/{i}"), "Post"))
        .collect();
    hits.push(hit("https://small.org/a", "Small A"));
    hits.push(hit("https://other.org/b", "Other B"));
    let provider = FakeProvider::new(topic, vec![(0, Ok(hits))]);
    let collector =
        Collector::new(provider, RecordingFetcher::default(), test_config()).expect("valid");

    let collection = collector.collect(topic, 12, false).await.expect("collect");

    let from_big = urls(&collection)
        .into_iter()
        .filter(|u| u.contains("bigsite.org"))
        .count();
    assert_eq!(from_big, 3);
    assert_eq!(collection.bundle.len(), 5);
}

#[tokio::test]
async fn blocked_domains_are_never_fetched() {
    let topic = "topic";
    let provider = FakeProvider::new(
        topic,
        vec![(
            0,
            Ok(vec![
                hit("https://www.reddit.com/r/topic/1", "Thread"),
                hit("https://medium.com/@someone/post", "Personal blog"),
                hit("https://alpha.org/report", "Report"),
            ]),
        )],
    );
    let collector =
        Collector::new(provider, RecordingFetcher::default(), test_config()).expect("valid");

    let collection = collector.collect(topic, 12, false).await.expect("collect");

    assert_eq!(urls(&collection), vec!["https://alpha.org/report"]);
    assert_eq!(collector.fetcher().fetched(), vec!["https://alpha.org/report"]);
}

#[tokio::test]
async fn ranking_is_deterministic_for_fixed_time() {
    let topic = "topic";
    let make = || {
        FakeProvider::new(
            topic,
            vec![
                (
                    0,
                    Ok(vec![
                        hit("https://alpha.org/1", "Alpha"),
                        hit("https://beta.org/2", "Beta")
                            .with_published_at("2026-10-10T00:00:00Z"),
                    ]),
                ),
                (
                    3,
                    Ok(vec![
                        hit("https://gamma.org/3", "Gamma pricing benchmark results"),
                        hit("https://delta.org/4", "Delta"),
                    ]),
                ),
            ],
        )
    };
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).single().expect("valid date");

    let first = Collector::new(make(), RecordingFetcher::default(), test_config())
        .expect("valid")
        .collect_at(topic, 12, false, now)
        .await
        .expect("collect");
    let second = Collector::new(make(), RecordingFetcher::default(), test_config())
        .expect("valid")
        .collect_at(topic, 12, false, now)
        .await
        .expect("collect");

    assert_eq!(urls(&first), urls(&second));
    // Recent and keyword-bearing titles outrank the undated plain ones.
    assert_eq!(urls(&first)[0], "https://beta.org/2");
    assert_eq!(urls(&first)[1], "https://gamma.org/3");
    assert_eq!(
        first.bundle.documents()[0].published_at,
        Utc.with_ymd_and_hms(2026, 10, 10, 0, 0, 0).single()
    );
}

#[tokio::test]
async fn concurrent_workers_preserve_rank_order() {
    let topic = "topic";
    let hits: Vec<SearchHit> = (0..8)
        .map(|i| hit(&format!("https://site{i}.org/a"), "Plain"))
        .collect();
    let config = CollectorConfig {
        query_workers: 4,
        extract_workers: 4,
        ..test_config()
    };
    let sequential = Collector::new(
        FakeProvider::new(topic, vec![(0, Ok(hits.clone()))]),
        RecordingFetcher::default(),
        test_config(),
    )
    .expect("valid")
    .collect(topic, 5, false)
    .await
    .expect("collect");
    let concurrent = Collector::new(
        FakeProvider::new(topic, vec![(0, Ok(hits))]),
        RecordingFetcher::default(),
        config,
    )
    .expect("valid")
    .collect(topic, 5, false)
    .await
    .expect("collect");

    assert_eq!(urls(&sequential), urls(&concurrent));
    assert_eq!(concurrent.bundle.len(), 5);
}

mod pacing {
    use super::*;

    /// Slack for clock differences between the limiter and `Instant`.
    const SLACK: Duration = Duration::from_millis(15);

    fn distinct_hosts(n: usize) -> Vec<SearchHit> {
        (0..n)
            .map(|i| hit(&format!("https://host{i}.org/a"), "Plain"))
            .collect()
    }

    async fn timed_collect(
        provider: FakeProvider,
        config: CollectorConfig,
        max_results: usize,
    ) -> (digest_sources::Collection, Duration) {
        let collector =
            Collector::new(provider, RecordingFetcher::default(), config).expect("valid");
        let start = Instant::now();
        let collection = collector
            .collect("topic", max_results, false)
            .await
            .expect("collect");
        (collection, start.elapsed())
    }

    #[tokio::test]
    async fn extract_interval_holds_with_parallel_workers() {
        let config = CollectorConfig {
            extract_interval_ms: 100,
            extract_workers: 4,
            ..test_config()
        };
        let provider = FakeProvider::new("topic", vec![(0, Ok(distinct_hosts(4)))]);

        let (collection, elapsed) = timed_collect(provider, config, 4).await;

        assert_eq!(collection.bundle.len(), 4);
        assert!(
            elapsed + SLACK >= Duration::from_millis(3 * 100),
            "4 extractions finished in {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn search_interval_holds_with_parallel_workers() {
        let config = CollectorConfig {
            search_interval_ms: 100,
            query_workers: 4,
            ..test_config()
        };
        let provider = FakeProvider::new("topic", Vec::new());

        let (collection, elapsed) = timed_collect(provider, config, 4).await;

        assert_eq!(collection.queries.len(), 4);
        assert!(
            elapsed + SLACK >= Duration::from_millis(3 * 100),
            "4 queries finished in {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn per_host_interval_spaces_same_host_fetches() {
        let config = CollectorConfig {
            per_host_interval_ms: 150,
            extract_workers: 3,
            ..test_config()
        };
        let same_host: Vec<SearchHit> = (0..3)
            .map(|i| hit(&format!("https://alpha.org/{i}"), "Plain"))
            .collect();
        let provider = FakeProvider::new("topic", vec![(0, Ok(same_host))]);

        let (collection, elapsed) = timed_collect(provider, config, 3).await;

        assert_eq!(collection.bundle.len(), 3);
        assert!(
            elapsed + SLACK >= Duration::from_millis(2 * 150),
            "3 same-host fetches finished in {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn per_host_interval_does_not_space_distinct_hosts() {
        let config = CollectorConfig {
            per_host_interval_ms: 150,
            extract_workers: 3,
            ..test_config()
        };
        let provider = FakeProvider::new("topic", vec![(0, Ok(distinct_hosts(3)))]);

        let (collection, elapsed) = timed_collect(provider, config, 3).await;

        assert_eq!(collection.bundle.len(), 3);
        assert!(
            elapsed < Duration::from_millis(250),
            "distinct hosts were spaced: {elapsed:?}"
        );
    }
}

mod http_backed {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARTICLE: &str = r#"<html><head><title>t</title><script>track()</script></head>
        <body><nav>Home | About</nav>
        <article><h1>Chip export rules tighten</h1>
        <p>The new guidance expands licensing requirements for advanced accelerators shipped abroad.</p>
        </article><footer>Copyright</footer></body></html>"#;

    #[tokio::test]
    async fn tavily_and_http_fetcher_end_to_end() {
        let server = MockServer::start().await;
        let base = server.uri();
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"url": format!("{base}/article"), "title": "Chip export rules tighten"},
                    {"url": format!("{base}/missing"), "title": "Gone"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = CollectorConfig {
            timeout_seconds: 5,
            ..test_config()
        };
        let provider = TavilyProvider::new("tvly-test", &config)
            .expect("client")
            .with_base_url(&base);
        let fetcher = HttpPageFetcher::new(&config).expect("client");
        let collector = Collector::new(provider, fetcher, config).expect("valid");

        let collection = collector
            .collect("export controls", 5, false)
            .await
            .expect("collect");

        assert_eq!(collection.bundle.len(), 1);
        let doc = &collection.bundle.documents()[0];
        assert_eq!(doc.url, format!("{base}/article"));
        assert!(doc.content.contains("licensing requirements"));
        assert!(!doc.content.contains("track()"));
        assert!(!doc.content.contains("Home | About"));
        assert!(collection
            .extractions
            .iter()
            .any(|e| e.url.ends_with("/missing") && e.status == ExtractionStatus::Empty));
    }

    #[tokio::test]
    async fn provider_outage_is_reported_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = CollectorConfig {
            timeout_seconds: 5,
            ..test_config()
        };
        let provider = TavilyProvider::new("tvly-test", &config)
            .expect("client")
            .with_base_url(server.uri());
        let fetcher = HttpPageFetcher::new(&config).expect("client");
        let collector = Collector::new(provider, fetcher, config).expect("valid");

        let collection = collector.collect("topic", 5, false).await.expect("collect");
        assert!(collection.bundle.is_empty());
        assert!(collection.all_queries_failed());
    }
}
