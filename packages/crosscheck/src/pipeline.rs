//! Pipeline orchestrator: request -> discovery -> per-source processing ->
//! cross-check analysis -> optional delegate enrichment.
//!
//! Source processing runs in sequential batches of [`BATCH_SIZE`] concurrent
//! fetches, which caps outbound concurrency without a worker pool. A failed
//! source is logged and dropped; it never fails the batch or the request.

use std::sync::Arc;

use futures::future;
use tracing::{info, warn};

use crate::analysis::{relevance_score, CrossCheckAnalyzer};
use crate::config::ResearchConfig;
use crate::discovery::{DuckDuckGoSearcher, SourceDiscovery};
use crate::error::ResearchError;
use crate::extractor::HttpExtractor;
use crate::quotes::select_quotes;
use crate::registry::{normalized_domain, TrustRegistry};
use crate::traits::{
    create_delegate, create_translator, Extractor, ResearchDelegate, Translator, WebSearcher,
};
use crate::types::{
    truncate_chars, CrossCheckResult, Quote, ResearchRequest, SearchResult, Source,
};

/// Maximum number of sources processed per request.
pub const MAX_SOURCES: usize = 10;

/// Number of URLs fetched concurrently; batches run sequentially.
pub const BATCH_SIZE: usize = 3;

/// Cap on the body snippet carried into each [`SearchResult`].
const SNIPPET_MAX_CHARS: usize = 1_000;

/// The full research pipeline, wired once at startup.
pub struct ResearchPipeline {
    discovery: SourceDiscovery,
    extractor: Arc<dyn Extractor>,
    translator: Arc<dyn Translator>,
    delegate: Arc<dyn ResearchDelegate>,
    analyzer: CrossCheckAnalyzer,
    registry: Arc<TrustRegistry>,
}

impl ResearchPipeline {
    pub fn new(
        searcher: Arc<dyn WebSearcher>,
        extractor: Arc<dyn Extractor>,
        translator: Arc<dyn Translator>,
        delegate: Arc<dyn ResearchDelegate>,
    ) -> Self {
        let registry = Arc::new(TrustRegistry::new());

        Self {
            discovery: SourceDiscovery::new(searcher, registry.clone()),
            extractor,
            translator,
            delegate: delegate.clone(),
            analyzer: CrossCheckAnalyzer::new(registry.clone(), delegate),
            registry,
        }
    }

    /// Build a production pipeline from configuration: DuckDuckGo search,
    /// HTTP extraction, and translator/delegate selected by what is
    /// configured.
    pub fn from_config(config: &ResearchConfig) -> Self {
        Self::new(
            Arc::new(DuckDuckGoSearcher::new(config.fetch_timeout)),
            Arc::new(HttpExtractor::new(
                &config.paywall_bypass_url,
                config.fetch_timeout,
            )),
            create_translator(config),
            create_delegate(config),
        )
    }

    /// Run the full research flow for one request.
    ///
    /// Fails only when source discovery is wholly unavailable; everything
    /// downstream degrades to a best-effort result.
    pub async fn research(
        &self,
        request: &ResearchRequest,
    ) -> Result<CrossCheckResult, ResearchError> {
        let workflow_id = self.delegate.start_research(request).await;
        info!(workflow_id = %workflow_id, query = %request.query, "research started");

        let sources = self.discovery.discover(&request.query, MAX_SOURCES).await?;
        let urls: Vec<String> = sources.into_iter().map(|s| s.url).collect();

        let results = self.process_sources(&urls, &request.query).await;
        info!(
            query = %request.query,
            sources_processed = results.len(),
            sources_discovered = urls.len(),
            "source processing finished"
        );

        let local = self.analyzer.analyze(&request.query, results).await;

        // The delegate may enrich or replace the computed result; the local
        // result is the guaranteed fallback.
        let payload = serde_json::json!({
            "query": request.query,
            "results": local.sources,
            "crossCheck": &local,
        });

        Ok(self.delegate.cross_check(payload).await.unwrap_or(local))
    }

    async fn process_sources(&self, urls: &[String], query: &str) -> Vec<SearchResult> {
        let mut results = Vec::new();

        for batch in urls.chunks(BATCH_SIZE) {
            let futures = batch.iter().map(|url| self.process_single_source(url, query));
            let batch_results = future::join_all(futures).await;
            results.extend(batch_results.into_iter().flatten());
        }

        results
    }

    /// Process one URL end to end. Any failure yields `None`; the source is
    /// simply absent from the result set.
    async fn process_single_source(&self, url: &str, query: &str) -> Option<SearchResult> {
        let scraped = match self.extractor.extract(url).await {
            Ok(scraped) => scraped,
            Err(e) => {
                warn!(url = %url, error = %e, "skipping source: extraction failed");
                return None;
            }
        };

        let Some(domain) = normalized_domain(&scraped.url) else {
            warn!(url = %scraped.url, "skipping source: unparsable URL");
            return None;
        };

        let quotes = self
            .translate_quotes(select_quotes(&scraped.body, query), &scraped.url)
            .await;

        Some(SearchResult {
            source: Source {
                url: scraped.url.clone(),
                title: scraped.title,
                domain,
                is_trusted: self.registry.is_trusted(&scraped.url),
                publish_date: scraped.publish_date,
            },
            content: truncate_chars(&scraped.body, SNIPPET_MAX_CHARS),
            relevance_score: relevance_score(&scraped.body, query),
            quotes,
        })
    }

    async fn translate_quotes(&self, quotes: Vec<String>, source_url: &str) -> Vec<Quote> {
        let mut annotated = Vec::with_capacity(quotes.len());

        for (position, text) in quotes.into_iter().enumerate() {
            let translation = self.translator.translate(&text, None).await;
            annotated.push(Quote {
                text,
                source_url: source_url.to_string(),
                position,
                translation,
            });
        }

        annotated
    }
}
