//! Pipeline configuration.
//!
//! Builder-style, with a `from_env` loader for deployments. The library
//! never reads the environment on its own; callers decide.

use std::time::Duration;

/// Configuration for a research pipeline.
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Timeout applied to search and page fetches.
    pub fetch_timeout: Duration,
    /// Timeout for delegate webhook calls. Workflows can be slow.
    pub delegate_timeout: Duration,
    /// Prefix the target URL is appended to for paywall bypass.
    pub paywall_bypass_url: String,
    /// Enrichment webhook endpoint. `None` selects the local-only delegate.
    pub delegate_webhook_url: Option<String>,
    /// Bearer token for the delegate webhook.
    pub delegate_api_key: Option<String>,
    /// Translation backend endpoint. `None` disables translation.
    pub translation_url: Option<String>,
    /// Default target language for quote translation.
    pub translation_target: String,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            delegate_timeout: Duration::from_secs(60),
            paywall_bypass_url: "https://removepaywall.com/".to_string(),
            delegate_webhook_url: None,
            delegate_api_key: None,
            translation_url: None,
            translation_target: "ru".to_string(),
        }
    }
}

impl ResearchConfig {
    /// Load configuration from `CROSSCHECK_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = env_nonempty("CROSSCHECK_DELEGATE_WEBHOOK_URL") {
            config.delegate_webhook_url = Some(url);
        }
        if let Some(key) = env_nonempty("CROSSCHECK_DELEGATE_API_KEY") {
            config.delegate_api_key = Some(key);
        }
        if let Some(url) = env_nonempty("CROSSCHECK_TRANSLATION_URL") {
            config.translation_url = Some(url);
        }
        if let Some(target) = env_nonempty("CROSSCHECK_TRANSLATION_TARGET") {
            config.translation_target = target;
        }
        if let Some(url) = env_nonempty("CROSSCHECK_PAYWALL_BYPASS_URL") {
            config.paywall_bypass_url = url;
        }

        config
    }

    pub fn with_delegate(
        mut self,
        webhook_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        self.delegate_webhook_url = Some(webhook_url.into());
        self.delegate_api_key = api_key;
        self
    }

    pub fn with_translation(
        mut self,
        url: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.translation_url = Some(url.into());
        self.translation_target = target.into();
        self
    }

    pub fn with_paywall_bypass(mut self, url: impl Into<String>) -> Self {
        self.paywall_bypass_url = url.into();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_only() {
        let config = ResearchConfig::default();
        assert!(config.delegate_webhook_url.is_none());
        assert!(config.translation_url.is_none());
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.delegate_timeout, Duration::from_secs(60));
    }

    #[test]
    fn builder_methods_compose() {
        let config = ResearchConfig::default()
            .with_delegate("https://hooks.example/research", Some("key".into()))
            .with_translation("https://translate.example/api", "en");

        assert_eq!(
            config.delegate_webhook_url.as_deref(),
            Some("https://hooks.example/research")
        );
        assert_eq!(config.translation_target, "en");
    }
}
