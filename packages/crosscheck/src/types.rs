//! Core data model for the cross-check pipeline.
//!
//! All of these are constructed fresh per incoming request and dropped once
//! the response is produced; nothing here is cached across requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An incoming research request with its requester context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    /// The claim or query to verify.
    pub query: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl ResearchRequest {
    pub fn new(query: impl Into<String>, user_id: i64, chat_id: i64) -> Self {
        Self {
            query: query.into(),
            user_id,
            chat_id,
            timestamp: Utc::now(),
        }
    }
}

/// A candidate web source discovered for a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub url: String,
    pub title: String,
    /// Hostname with any leading `www.` stripped.
    pub domain: String,
    /// True iff the registry reliability for this URL exceeds the trust
    /// threshold.
    pub is_trusted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
}

/// The cleaned result of fetching and parsing one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedContent {
    pub url: String,
    pub title: String,
    /// Main text body, whitespace-normalized and capped in length.
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    /// Whether the URL belongs to a known-paywalled domain.
    pub is_paywalled: bool,
}

/// A short, query-relevant excerpt from a source's body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub text: String,
    pub source_url: String,
    /// Index of this quote within the source's selected sequence.
    pub position: usize,
    /// Set only when a translation collaborator is configured and the text
    /// was not already in the target language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

/// One successfully processed source. Failed fetches produce no record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub source: Source,
    /// Truncated body snippet carried along for summaries and rendering.
    pub content: String,
    /// Term-frequency density of the query in the body, in [0, 1].
    pub relevance_score: f64,
    /// Relevance-ordered excerpts.
    pub quotes: Vec<Quote>,
}

/// A group of sources summarized under one topic.
///
/// Grouping currently always yields a single topic equal to the original
/// query; see `analysis::group_by_topic`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub topic: String,
    pub summary: String,
    /// URLs of the contributing sources.
    pub sources: Vec<String>,
    /// At most `quotes::MAX_QUOTES` representative quotes.
    pub quotes: Vec<Quote>,
}

/// The pipeline's terminal assessment of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Verified,
    Disputed,
    Unverified,
    Mixed,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::Verified => "verified",
            Verdict::Disputed => "disputed",
            Verdict::Unverified => "unverified",
            Verdict::Mixed => "mixed",
        };
        f.write_str(s)
    }
}

/// The final artifact of a research request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossCheckResult {
    pub original_claim: String,
    pub sources: Vec<SearchResult>,
    pub summary: Vec<TopicSummary>,
    pub verdict: Verdict,
    /// Aggregate reliability-weighted relevance, in [0, 1].
    pub confidence: f64,
}

/// Truncate to at most `max_chars` characters, on a char boundary.
///
/// Idempotent: truncating already-truncated text returns it unchanged.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
