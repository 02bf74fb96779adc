//! Translation collaborator.
//!
//! Translation is strictly best-effort: a missing backend, a backend error,
//! or text already in the target language all yield `None`, and a quote is
//! never dropped because its translation failed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::ResearchConfig;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the target language (or the implementation's
    /// default when `target_language` is `None`).
    ///
    /// `None` means "no translation": disabled backend, failure, or the text
    /// is already in the target language.
    async fn translate(&self, text: &str, target_language: Option<&str>) -> Option<String>;
}

/// The legal unconfigured mode: never translates, never errors.
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, _text: &str, _target_language: Option<&str>) -> Option<String> {
        None
    }
}

/// HTTP translation backend (LibreTranslate-style API).
///
/// Posts `{ q, target }` and expects `{ translatedText, detectedLanguage? }`.
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
    target_language: String,
}

impl HttpTranslator {
    pub fn new(
        endpoint: impl Into<String>,
        target_language: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
            target_language: target_language.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
    #[serde(default)]
    detected_language: Option<String>,
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_language: Option<&str>) -> Option<String> {
        let target = target_language.unwrap_or(&self.target_language);

        let response = match self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "q": text, "target": target }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "translation request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "translation backend error");
            return None;
        }

        let body: TranslateResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "unparsable translation response");
                return None;
            }
        };

        // Source language already equals the target: nothing to do.
        if body.detected_language.as_deref() == Some(target) {
            return None;
        }

        Some(body.translated_text)
    }
}

/// Select the translator once at startup based on configuration.
pub fn create_translator(config: &ResearchConfig) -> Arc<dyn Translator> {
    match &config.translation_url {
        Some(url) if !url.is_empty() => {
            info!(target = %config.translation_target, "translation enabled");
            Arc::new(HttpTranslator::new(
                url,
                &config.translation_target,
                config.fetch_timeout,
            ))
        }
        _ => {
            info!("translation disabled (no backend configured)");
            Arc::new(NoopTranslator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_translator_always_yields_none() {
        let translator = NoopTranslator;
        assert_eq!(translator.translate("hello world", None).await, None);
        assert_eq!(translator.translate("hello world", Some("de")).await, None);
    }

    #[test]
    fn create_translator_defaults_to_noop() {
        let config = ResearchConfig::default();
        // No translation URL configured; the noop must be selected. Verified
        // indirectly: a noop translator never produces a translation.
        let translator = create_translator(&config);
        let result = tokio_test::block_on(translator.translate("text", None));
        assert_eq!(result, None);
    }
}
