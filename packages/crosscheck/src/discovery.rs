//! Source discovery: web search plus trust-aware re-ranking.
//!
//! Discovery over-fetches from the backend (later stages filter and
//! deduplicate), annotates each hit with its trust status, and re-ranks
//! trusted sources first. A failing backend degrades to a small hardcoded
//! list of trusted search pages instead of failing the request.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::SearchError;
use crate::registry::{normalized_domain, TrustRegistry};
use crate::traits::{SearchHit, WebSearcher};
use crate::types::Source;

const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Degraded-mode candidates when the search backend is unreachable:
/// search pages of a few highly trusted outlets.
const FALLBACK_SEARCH_PAGES: &[(&str, &str)] = &[
    ("https://www.bbc.com/search", "BBC Search Results"),
    ("https://www.reuters.com/search", "Reuters Search"),
    ("https://apnews.com/search", "AP News Search"),
];

/// Search backend using DuckDuckGo's HTML endpoint (no API key required).
pub struct DuckDuckGoSearcher {
    client: reqwest::Client,
}

impl DuckDuckGoSearcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }
}

#[async_trait]
impl WebSearcher for DuckDuckGoSearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .post(DUCKDUCKGO_HTML_URL)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(SearchError::Backend)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status { status });
        }

        let html = response.text().await.map_err(SearchError::Backend)?;
        let hits = parse_result_links(&html, limit);
        debug!(query = %query, hits = hits.len(), "search backend returned results");

        Ok(hits)
    }
}

/// Parse result anchors out of a DuckDuckGo HTML response.
fn parse_result_links(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            // Skip DuckDuckGo-internal redirect links
            if href.starts_with("//duckduckgo.com") {
                return None;
            }

            let url = if href.starts_with("http") {
                href.to_string()
            } else {
                format!("https:{href}")
            };

            let title = anchor.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                return None;
            }

            Some(SearchHit { url, title })
        })
        .take(limit)
        .collect()
}

/// Stable re-ranking: trusted sources first, then descending registry
/// reliability within each tier. Pure function of (is_trusted, reliability).
pub fn rank_sources(mut sources: Vec<Source>, registry: &TrustRegistry) -> Vec<Source> {
    sources.sort_by(|a, b| {
        b.is_trusted.cmp(&a.is_trusted).then_with(|| {
            registry
                .reliability(&b.url)
                .partial_cmp(&registry.reliability(&a.url))
                .unwrap_or(Ordering::Equal)
        })
    });
    sources
}

/// Discovers and ranks candidate sources for a query.
pub struct SourceDiscovery {
    searcher: Arc<dyn WebSearcher>,
    registry: Arc<TrustRegistry>,
}

impl SourceDiscovery {
    pub fn new(searcher: Arc<dyn WebSearcher>, registry: Arc<TrustRegistry>) -> Self {
        Self { searcher, registry }
    }

    /// Discover up to `limit` sources, trusted-first.
    ///
    /// Requests `limit * 2` raw candidates to compensate for filtering, then
    /// ranks and truncates. Backend failure falls back to
    /// [`FALLBACK_SEARCH_PAGES`]; the `Err` arm is reserved for discovery
    /// being wholly unavailable.
    pub async fn discover(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Source>, SearchError> {
        let hits = match self.searcher.search(query, limit * 2).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "search backend failed, using fallback sources");
                return Ok(self.fallback_sources());
            }
        };

        let sources: Vec<Source> = hits
            .into_iter()
            .filter_map(|hit| self.annotate(hit))
            .collect();

        let mut ranked = rank_sources(sources, &self.registry);
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Turn a raw hit into a trust-annotated source. Hits with unparsable
    /// URLs are dropped.
    fn annotate(&self, hit: SearchHit) -> Option<Source> {
        let domain = normalized_domain(&hit.url)?;
        let is_trusted = self.registry.is_trusted(&hit.url);

        Some(Source {
            url: hit.url,
            title: hit.title,
            domain,
            is_trusted,
            publish_date: None,
        })
    }

    fn fallback_sources(&self) -> Vec<Source> {
        FALLBACK_SEARCH_PAGES
            .iter()
            .filter_map(|(url, title)| self.annotate(SearchHit::new(*url, *title)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSearcher;

    fn source(url: &str, registry: &TrustRegistry) -> Source {
        Source {
            url: url.to_string(),
            title: "Title".to_string(),
            domain: normalized_domain(url).unwrap(),
            is_trusted: registry.is_trusted(url),
            publish_date: None,
        }
    }

    #[test]
    fn parses_result_anchors() {
        let html = r#"
            <div class="result">
                <a class="result__a" href="https://bbc.com/news/item">BBC Item</a>
            </div>
            <div class="result">
                <a class="result__a" href="//duckduckgo.com/l/?uddg=x">Internal</a>
            </div>
            <div class="result">
                <a class="result__a" href="//example.com/page">Scheme Relative</a>
            </div>
        "#;

        let hits = parse_result_links(html, 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://bbc.com/news/item");
        assert_eq!(hits[0].title, "BBC Item");
        assert_eq!(hits[1].url, "https://example.com/page");
    }

    #[test]
    fn parse_respects_limit() {
        let html = (0..10)
            .map(|i| format!(r#"<a class="result__a" href="https://site{i}.com/">Site {i}</a>"#))
            .collect::<String>();
        assert_eq!(parse_result_links(&html, 3).len(), 3);
    }

    #[test]
    fn ranking_puts_trusted_before_untrusted() {
        let registry = TrustRegistry::new();
        let sources = vec![
            source("https://random-blog.example/post", &registry),
            source("https://www.bbc.com/news", &registry),
        ];

        let ranked = rank_sources(sources, &registry);
        assert!(ranked[0].is_trusted);
        assert_eq!(ranked[0].domain, "bbc.com");
    }

    #[test]
    fn ranking_orders_by_reliability_within_tier() {
        let registry = TrustRegistry::new();
        let sources = vec![
            source("https://www.theguardian.com/story", &registry), // 0.90
            source("https://www.nature.com/article", &registry),    // 0.98
            source("https://www.bbc.com/news", &registry),          // 0.95
        ];

        let ranked = rank_sources(sources, &registry);
        let domains: Vec<&str> = ranked.iter().map(|s| s.domain.as_str()).collect();
        assert_eq!(domains, vec!["nature.com", "bbc.com", "theguardian.com"]);
    }

    #[test]
    fn ranking_is_stable_for_equal_keys() {
        let registry = TrustRegistry::new();
        let sources = vec![
            source("https://first.example/a", &registry),
            source("https://second.example/b", &registry),
        ];

        let ranked = rank_sources(sources, &registry);
        assert_eq!(ranked[0].domain, "first.example");
        assert_eq!(ranked[1].domain, "second.example");
    }

    #[tokio::test]
    async fn discover_truncates_to_limit() {
        let hits: Vec<SearchHit> = (0..8)
            .map(|i| SearchHit::new(format!("https://site{i}.example/"), format!("Site {i}")))
            .collect();
        let searcher = Arc::new(MockSearcher::with_hits(hits));
        let discovery = SourceDiscovery::new(searcher, Arc::new(TrustRegistry::new()));

        let sources = discovery.discover("anything", 3).await.unwrap();
        assert_eq!(sources.len(), 3);
    }

    #[tokio::test]
    async fn discover_drops_unparsable_urls() {
        let searcher = Arc::new(MockSearcher::with_hits(vec![
            SearchHit::new("not a url", "Broken"),
            SearchHit::new("https://www.bbc.com/news", "Fine"),
        ]));
        let discovery = SourceDiscovery::new(searcher, Arc::new(TrustRegistry::new()));

        let sources = discovery.discover("anything", 10).await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].domain, "bbc.com");
    }

    #[tokio::test]
    async fn discover_falls_back_when_backend_fails() {
        let searcher = Arc::new(MockSearcher::failing());
        let discovery = SourceDiscovery::new(searcher, Arc::new(TrustRegistry::new()));

        let sources = discovery.discover("anything", 10).await.unwrap();
        assert_eq!(sources.len(), FALLBACK_SEARCH_PAGES.len());
        assert!(sources.iter().all(|s| s.is_trusted));
    }

    #[tokio::test]
    async fn discover_overfetches_from_backend() {
        let searcher = Arc::new(MockSearcher::with_hits(Vec::new()));
        let discovery = SourceDiscovery::new(searcher.clone(), Arc::new(TrustRegistry::new()));

        discovery.discover("anything", 10).await.unwrap();
        assert_eq!(searcher.requested_limits(), vec![20]);
    }
}
