//! Typed errors for the cross-check pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The propagation policy is deliberately lopsided: failures in a single
//! source's fetch/parse are absorbed at the call site (the source is dropped
//! from the result set), and only a failure of source discovery itself is
//! allowed to fail a whole research request.

use thiserror::Error;

/// Errors that can occur while fetching and extracting page content.
///
/// A `FetchError` for one URL never fails the pipeline; the orchestrator
/// logs it and excludes that source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connect error, timeout, bad TLS, ...)
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Errors from the web search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Request to the search backend failed
    #[error("search backend request failed: {0}")]
    Backend(#[source] reqwest::Error),

    /// Search backend answered with a non-success status
    #[error("search backend returned HTTP {status}")]
    Status { status: reqwest::StatusCode },
}

/// Errors that fail an entire research request.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Source discovery was wholly unavailable (backend and fallback)
    #[error("source discovery failed: {0}")]
    Discovery(#[from] SearchError),
}
