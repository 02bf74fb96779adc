//! Claim-Verification Research Pipeline
//!
//! Given a natural-language query or claim, this library discovers candidate
//! web sources, scrapes and cleans their content, selects query-relevant
//! excerpts, cross-references the sources against a curated trust registry,
//! and produces a verdict (verified / disputed / mixed / unverified) with a
//! confidence score.
//!
//! # Design Philosophy
//!
//! This is a heuristic aggregator of searchable web content, not a truth
//! oracle. Every outbound collaborator (search backend, page fetcher,
//! translation service, enrichment webhook) sits behind a trait with a local
//! fallback, so a degraded environment yields a degraded result instead of
//! an error. The scoring formulas are plain, independently tested pure
//! functions so they can be replaced without touching I/O code.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crosscheck::{ResearchConfig, ResearchPipeline, ResearchRequest};
//!
//! let config = ResearchConfig::from_env();
//! let pipeline = ResearchPipeline::from_config(&config);
//!
//! let request = ResearchRequest::new("Climate policy changes 2024", user_id, chat_id);
//! let result = pipeline.research(&request).await?;
//!
//! println!("{}: {:.0}%", result.verdict, result.confidence * 100.0);
//! ```
//!
//! # Modules
//!
//! - [`registry`] - Static domain trust/reliability table
//! - [`discovery`] - Web search and trusted-first re-ranking
//! - [`extractor`] - Page fetching (with paywall bypass) and content extraction
//! - [`quotes`] - Query-relevant excerpt selection
//! - [`analysis`] - Relevance, verdict, confidence, and topic summaries
//! - [`pipeline`] - The orchestrator tying the stages together
//! - [`traits`] - Collaborator seams (searcher, extractor, translator, delegate)
//! - [`testing`] - Mock collaborators

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod quotes;
pub mod registry;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::ResearchConfig;
pub use error::{FetchError, ResearchError, SearchError};
pub use pipeline::{ResearchPipeline, BATCH_SIZE, MAX_SOURCES};
pub use registry::{SourceCategory, TrustRegistry, TrustedSource, TRUST_THRESHOLD};
pub use types::{
    CrossCheckResult, Quote, ResearchRequest, ScrapedContent, SearchResult, Source, TopicSummary,
    Verdict,
};

// Re-export pipeline stages
pub use analysis::{
    confidence, determine_verdict, relevance_score, CrossCheckAnalyzer,
    HIGH_RELEVANCE_THRESHOLD, VERIFIED_MIN_TRUSTED,
};
pub use discovery::{rank_sources, DuckDuckGoSearcher, SourceDiscovery};
pub use extractor::{HttpExtractor, CONTENT_MAX_CHARS};
pub use quotes::{select_quotes, MAX_QUOTES};

// Re-export collaborator seams
pub use traits::{
    create_delegate, create_translator, DelegateAction, Extractor, NoopDelegate, NoopTranslator,
    ResearchDelegate, SearchHit, Translator, WebSearcher,
};
