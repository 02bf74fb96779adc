//! Web search trait for source discovery.

use async_trait::async_trait;

use crate::error::SearchError;

/// A raw (url, title) candidate returned by a search backend, before trust
/// annotation and ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Search backend abstraction.
///
/// Implementations must tolerate whatever response shape their backend
/// produces (HTML or JSON) and surface failures as [`SearchError`]; the
/// discovery layer decides whether to fall back.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search the web, returning up to `limit` candidate pages in backend
    /// order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}
