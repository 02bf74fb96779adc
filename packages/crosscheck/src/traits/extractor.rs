//! Content extraction trait.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::ScrapedContent;

/// Fetches a URL and extracts structured content from it.
///
/// The production implementation is [`crate::extractor::HttpExtractor`];
/// tests use [`crate::testing::MockExtractor`].
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ScrapedContent, FetchError>;
}
