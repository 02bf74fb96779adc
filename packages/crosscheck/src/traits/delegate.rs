//! Optional external enrichment delegate (webhook-based workflow service).
//!
//! The delegate can observe a research run, enrich or replace the computed
//! cross-check result, and generate summaries. Every call site has a local
//! fallback: a missing or failing delegate degrades to exactly the behavior
//! of [`NoopDelegate`], never to an error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ResearchConfig;
use crate::types::{CrossCheckResult, ResearchRequest};

/// Workflow id reported when no delegate is configured.
pub const LOCAL_WORKFLOW_ID: &str = "local_research";

/// Action tags understood by the delegate webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateAction {
    StartResearch,
    CrossCheck,
    GenerateSummary,
}

impl DelegateAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DelegateAction::StartResearch => "start_research",
            DelegateAction::CrossCheck => "cross_check",
            DelegateAction::GenerateSummary => "generate_summary",
        }
    }
}

impl fmt::Display for DelegateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External workflow delegate.
///
/// Only [`trigger`](Self::trigger) talks to the wire; the typed helpers are
/// default methods that parse the delegate's response and fall back locally
/// when it is absent, malformed, or null.
#[async_trait]
pub trait ResearchDelegate: Send + Sync {
    /// Fire an action at the delegate. `None` means "no enrichment": the
    /// delegate is unconfigured, unreachable, or returned null.
    async fn trigger(&self, action: DelegateAction, data: Value) -> Option<Value>;

    /// Announce a research run; returns a workflow id for log correlation.
    async fn start_research(&self, request: &ResearchRequest) -> String {
        let data = serde_json::json!({
            "query": request.query,
            "userId": request.user_id,
            "chatId": request.chat_id,
            "timestamp": request.timestamp,
        });

        self.trigger(DelegateAction::StartResearch, data)
            .await
            .and_then(|v| {
                v.get("workflowId")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| LOCAL_WORKFLOW_ID.to_string())
    }

    /// Offer the locally computed result for enrichment. `None` keeps the
    /// local result.
    async fn cross_check(&self, data: Value) -> Option<CrossCheckResult> {
        let value = self.trigger(DelegateAction::CrossCheck, data).await?;
        let enriched = value.get("crossCheckResult")?.clone();
        match serde_json::from_value(enriched) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, "delegate returned malformed cross-check result");
                None
            }
        }
    }

    /// Ask the delegate to summarize the grouped contents. `None` selects
    /// the local extractive summarizer.
    async fn generate_summary(&self, contents: &[String], query: &str) -> Option<String> {
        let data = serde_json::json!({ "content": contents, "query": query });

        self.trigger(DelegateAction::GenerateSummary, data)
            .await
            .and_then(|v| v.get("summary").and_then(Value::as_str).map(str::to_string))
    }
}

/// Local-only delegate: every trigger is a no-op, so every helper takes its
/// fallback path.
pub struct NoopDelegate;

#[async_trait]
impl ResearchDelegate for NoopDelegate {
    async fn trigger(&self, action: DelegateAction, _data: Value) -> Option<Value> {
        debug!(action = %action, "delegate not configured, using local fallback");
        None
    }
}

/// Webhook-backed delegate.
///
/// Posts `{ action, data, timestamp }` with an optional bearer token.
pub struct WebhookDelegate {
    client: reqwest::Client,
    webhook_url: String,
    api_key: Option<String>,
}

impl WebhookDelegate {
    pub fn new(
        webhook_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            webhook_url: webhook_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ResearchDelegate for WebhookDelegate {
    async fn trigger(&self, action: DelegateAction, data: Value) -> Option<Value> {
        let payload = serde_json::json!({
            "action": action.as_str(),
            "data": data,
            "timestamp": Utc::now(),
        });

        let mut request = self.client.post(&self.webhook_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(action = %action, error = %e, "delegate call failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                action = %action,
                status = %response.status(),
                "delegate returned error status"
            );
            return None;
        }

        match response.json::<Value>().await {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                warn!(action = %action, error = %e, "unparsable delegate response");
                None
            }
        }
    }
}

/// Select the delegate once at startup based on configuration.
pub fn create_delegate(config: &ResearchConfig) -> Arc<dyn ResearchDelegate> {
    match &config.delegate_webhook_url {
        Some(url) if !url.is_empty() => {
            info!("delegate webhook enabled");
            Arc::new(WebhookDelegate::new(
                url,
                config.delegate_api_key.clone(),
                config.delegate_timeout,
            ))
        }
        _ => {
            info!("delegate webhook disabled, local fallbacks only");
            Arc::new(NoopDelegate)
        }
    }
}
