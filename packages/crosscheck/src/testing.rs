//! Mock collaborators for tests.
//!
//! These back both the unit tests in this crate and downstream consumers
//! that want to exercise the pipeline without a network.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{FetchError, SearchError};
use crate::traits::{
    DelegateAction, Extractor, ResearchDelegate, SearchHit, Translator, WebSearcher,
};
use crate::types::ScrapedContent;

/// Search backend returning canned hits, or failing on demand.
pub struct MockSearcher {
    hits: Vec<SearchHit>,
    fail: bool,
    requested_limits: Mutex<Vec<usize>>,
}

impl MockSearcher {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            fail: false,
            requested_limits: Mutex::new(Vec::new()),
        }
    }

    /// A backend that always errors, for exercising the fallback path.
    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
            requested_limits: Mutex::new(Vec::new()),
        }
    }

    /// The `limit` values passed to `search`, in call order.
    pub fn requested_limits(&self) -> Vec<usize> {
        self.requested_limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.requested_limits.lock().unwrap().push(limit);

        if self.fail {
            return Err(SearchError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }

        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

/// Extractor serving pages from a fixed map; unknown URLs 404.
#[derive(Default)]
pub struct MockExtractor {
    pages: HashMap<String, ScrapedContent>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, content: ScrapedContent) -> Self {
        self.pages.insert(content.url.clone(), content);
        self
    }
}

/// Build a minimal scraped page for tests.
pub fn page(url: &str, title: &str, body: &str) -> ScrapedContent {
    ScrapedContent {
        url: url.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        author: None,
        publish_date: None,
        is_paywalled: false,
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, url: &str) -> Result<ScrapedContent, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                url: url.to_string(),
            })
    }
}

/// Translator that prefixes every text, making translations observable.
pub struct MockTranslator {
    prefix: String,
}

impl MockTranslator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _target_language: Option<&str>) -> Option<String> {
        Some(format!("{}{}", self.prefix, text))
    }
}

/// Delegate with canned per-action responses that records every call.
#[derive(Default)]
pub struct RecordingDelegate {
    responses: HashMap<&'static str, Value>,
    calls: Mutex<Vec<String>>,
}

impl RecordingDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to an action with a fixed JSON value.
    pub fn respond_to(mut self, action: DelegateAction, response: Value) -> Self {
        self.responses.insert(action.as_str(), response);
        self
    }

    /// Action tags received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchDelegate for RecordingDelegate {
    async fn trigger(&self, action: DelegateAction, _data: Value) -> Option<Value> {
        self.calls.lock().unwrap().push(action.as_str().to_string());
        self.responses.get(action.as_str()).cloned()
    }
}
