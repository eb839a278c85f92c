//! Query expansion: one topic becomes several facet-specific search queries.
//!
//! Each query is the trimmed topic followed by a fixed set of expansion
//! terms. The facets are, in order: recency and trends, corporate
//! announcements, regulation and policy, pricing and benchmarks. Extended
//! mode (used on weekends) appends a technical/research facet.

use serde::{Deserialize, Serialize};

/// Language of the expansion terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
    /// Japanese expansion terms.
    #[default]
    Japanese,
    /// English expansion terms.
    English,
}

impl QueryLanguage {
    fn facets(self) -> &'static [&'static str] {
        match self {
            Self::Japanese => JA_FACETS,
            Self::English => EN_FACETS,
        }
    }

    fn extended_facet(self) -> &'static str {
        match self {
            Self::Japanese => "アーキテクチャ 実装 研究 論文 arXiv ベストプラクティス",
            Self::English => "architecture implementation research paper arXiv best practices",
        }
    }
}

const JA_FACETS: &[&str] = &[
    "最新 動向 規制 投資 資金調達 提携 買収 採用 ロードマップ 価格 性能 ベンチマーク 導入事例 PoC セキュリティ 大手企業",
    "企業 発表 プレスリリース 投資家向け情報 IR 提携",
    "規制 政策 ガイドライン 標準化 標準規格",
    "価格 性能 ベンチマーク 評価 比較",
];

const EN_FACETS: &[&str] = &[
    "latest trends regulation investment funding partnership acquisition hiring roadmap pricing performance benchmark case study PoC security enterprise",
    "company announcement press release investor relations IR partnership",
    "regulation policy guidelines standardization standards",
    "pricing performance benchmark evaluation comparison",
];

/// Expand a topic into its ordered search queries.
///
/// Returns an empty list for an empty (or whitespace-only) topic; callers
/// reject such topics before planning.
///
/// # Examples
///
/// ```
/// use digest_sources::orchestrator::planner::{plan_queries, QueryLanguage};
///
/// let queries = plan_queries("quantum computing", false, QueryLanguage::English);
/// assert_eq!(queries.len(), 4);
/// assert!(queries.iter().all(|q| q.starts_with("quantum computing ")));
/// ```
pub fn plan_queries(topic: &str, extended_mode: bool, language: QueryLanguage) -> Vec<String> {
    let base = topic.trim();
    if base.is_empty() {
        return Vec::new();
    }

    let mut queries: Vec<String> = language
        .facets()
        .iter()
        .map(|terms| format!("{base} {terms}"))
        .collect();
    if extended_mode {
        queries.push(format!("{base} {}", language.extended_facet()));
    }
    queries
}
