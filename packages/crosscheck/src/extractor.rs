//! Content extraction: fetch a page (with a paywall-bypass fallback for
//! known-paywalled domains) and pull out structured metadata plus the main
//! text body.
//!
//! Every metadata field is resolved through an ordered fallback chain; the
//! first non-empty candidate wins. Parsing never fails a fetch: malformed
//! dates and missing fields degrade to `None` or a placeholder.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::traits::Extractor;
use crate::types::{truncate_chars, ScrapedContent};

/// Cap on extracted body length; bounds downstream scoring cost.
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// Domains known to serve paywalled articles; these get the bypass proxy
/// attempt first.
const PAYWALLED_DOMAINS: &[&str] = &[
    "wsj.com",
    "nytimes.com",
    "washingtonpost.com",
    "ft.com",
    "economist.com",
    "bloomberg.com",
];

/// Content containers tried in order; first non-empty match wins.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    r#"[role="main"]"#,
    ".article-content",
    ".entry-content",
    ".post-content",
    ".content",
    "main",
    "#content",
];

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// HTTP-backed extractor with browser-like headers.
pub struct HttpExtractor {
    client: reqwest::Client,
    paywall_bypass_url: String,
}

impl HttpExtractor {
    pub fn new(paywall_bypass_url: impl Into<String>, timeout: Duration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .parse()
                .unwrap(),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5".parse().unwrap(),
        );
        headers.insert(
            reqwest::header::ACCEPT_ENCODING,
            "gzip, deflate".parse().unwrap(),
        );
        headers.insert(reqwest::header::CONNECTION, "keep-alive".parse().unwrap());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            paywall_bypass_url: paywall_bypass_url.into(),
        }
    }

    /// Whether a URL belongs to a known-paywalled domain.
    pub fn is_paywalled(url: &str) -> bool {
        PAYWALLED_DOMAINS.iter().any(|domain| url.contains(domain))
    }

    async fn fetch_direct(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// Try the bypass proxy first; fall back to a direct fetch if it fails.
    async fn fetch_with_paywall_bypass(&self, url: &str) -> Result<String, FetchError> {
        let bypass_url = format!("{}{}", self.paywall_bypass_url, url);

        match self.fetch_direct(&bypass_url).await {
            Ok(html) => Ok(html),
            Err(e) => {
                debug!(url = %url, error = %e, "paywall bypass failed, fetching directly");
                self.fetch_direct(url).await
            }
        }
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Result<ScrapedContent, FetchError> {
        let is_paywalled = Self::is_paywalled(url);

        let html = if is_paywalled {
            self.fetch_with_paywall_bypass(url).await?
        } else {
            self.fetch_direct(url).await?
        };

        let content = parse_page(url, &html, is_paywalled);
        if content.body.is_empty() {
            warn!(url = %url, "page yielded no body text");
        }

        Ok(content)
    }
}

/// Parse fetched HTML into structured content. Pure, so it can be tested
/// without a network.
pub fn parse_page(url: &str, html: &str, is_paywalled: bool) -> ScrapedContent {
    let stripped = strip_noise(html);
    let document = Html::parse_document(&stripped);

    ScrapedContent {
        url: url.to_string(),
        title: extract_title(&document),
        body: extract_body(&document),
        author: extract_author(&document),
        publish_date: extract_publish_date(&document),
        is_paywalled,
    }
}

/// Remove script/style/noscript elements before text extraction.
fn strip_noise(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut result = html.to_string();

    for tag in ["script", "style", "noscript"] {
        if let Ok(selector) = Selector::parse(tag) {
            for element in document.select(&selector) {
                result = result.replace(&element.html(), "");
            }
        }
    }

    result
}

/// First matching element's `content` attribute, trimmed and non-empty.
fn meta_content(document: &Html, selector: &str) -> Option<String> {
    attr_of(document, selector, "content")
}

fn attr_of(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First matching element's text, trimmed and non-empty.
fn text_of(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_title(document: &Html) -> String {
    meta_content(document, r#"meta[property="og:title"]"#)
        .or_else(|| meta_content(document, r#"meta[name="twitter:title"]"#))
        .or_else(|| text_of(document, "title"))
        .or_else(|| text_of(document, "h1"))
        .unwrap_or_else(|| "Untitled".to_string())
}

fn extract_author(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[name="author"]"#)
        .or_else(|| meta_content(document, r#"meta[property="article:author"]"#))
        .or_else(|| text_of(document, r#"[rel="author"]"#))
        .or_else(|| text_of(document, ".author"))
        .or_else(|| text_of(document, ".by-author"))
        .or_else(|| text_of(document, ".byline"))
}

fn extract_publish_date(document: &Html) -> Option<DateTime<Utc>> {
    let raw = meta_content(document, r#"meta[property="article:published_time"]"#)
        .or_else(|| meta_content(document, r#"meta[name="publish_date"]"#))
        .or_else(|| attr_of(document, "time", "datetime"))
        .or_else(|| attr_of(document, r#"[itemprop="datePublished"]"#, "content"))?;

    parse_date(&raw)
}

/// RFC 3339 first, then a bare date. Unparsable strings yield `None`.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn extract_body(document: &Html) -> String {
    let mut text = String::new();

    for selector in CONTENT_SELECTORS {
        if let Some(found) = text_of(document, selector) {
            text = found;
            break;
        }
    }

    if text.is_empty() {
        text = text_of(document, "body").unwrap_or_default();
    }

    truncate_content(&clean_text(&text))
}

/// Collapse whitespace runs and excess blank lines, then trim.
fn clean_text(text: &str) -> String {
    let ws = Regex::new(r"[ \t\r\f]+").unwrap();
    let newlines = Regex::new(r"\n{3,}").unwrap();

    let collapsed = ws.replace_all(text, " ");
    newlines.replace_all(&collapsed, "\n\n").trim().to_string()
}

/// Cap body length. Idempotent: truncating already-truncated content
/// returns it unchanged.
pub fn truncate_content(text: &str) -> String {
    truncate_chars(text, CONTENT_MAX_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_og_title() {
        let html = r#"<html><head>
            <meta property="og:title" content="OG Title">
            <title>Doc Title</title>
        </head><body><h1>Heading</h1></body></html>"#;
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.title, "OG Title");
    }

    #[test]
    fn title_falls_back_through_the_chain() {
        let html = "<html><head></head><body><h1>Only Heading</h1></body></html>";
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.title, "Only Heading");

        let empty = "<html><head></head><body></body></html>";
        let page = parse_page("https://example.com/a", empty, false);
        assert_eq!(page.title, "Untitled");
    }

    #[test]
    fn author_from_meta_then_byline() {
        let html = r#"<html><head><meta name="author" content="Jane Doe"></head></html>"#;
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.author.as_deref(), Some("Jane Doe"));

        let html = r#"<html><body><span class="byline">By Sam Roe</span></body></html>"#;
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.author.as_deref(), Some("By Sam Roe"));

        let html = "<html><body><p>No author here.</p></body></html>";
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.author, None);
    }

    #[test]
    fn publish_date_parses_rfc3339() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="2024-03-05T10:30:00Z">
        </head></html>"#;
        let page = parse_page("https://example.com/a", html, false);
        let date = page.publish_date.unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-05T10:30:00+00:00");
    }

    #[test]
    fn publish_date_from_time_element() {
        let html = r#"<html><body><time datetime="2024-03-05">March 5</time></body></html>"#;
        let page = parse_page("https://example.com/a", html, false);
        assert!(page.publish_date.is_some());
    }

    #[test]
    fn unparsable_date_yields_none() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="last Tuesday">
        </head></html>"#;
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.publish_date, None);
    }

    #[test]
    fn body_prefers_article_container() {
        let html = r#"<html><body>
            <nav>Navigation junk</nav>
            <article>The actual article text lives here.</article>
        </body></html>"#;
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.body, "The actual article text lives here.");
    }

    #[test]
    fn body_falls_back_to_full_body_text() {
        let html = "<html><body><div>Unstructured page text.</div></body></html>";
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.body, "Unstructured page text.");
    }

    #[test]
    fn scripts_and_styles_are_stripped() {
        let html = r#"<html><body>
            <script>var hidden = "should not appear";</script>
            <style>.x { color: red; }</style>
            <article>Visible content only.</article>
        </body></html>"#;
        let page = parse_page("https://example.com/a", html, false);
        assert!(!page.body.contains("hidden"));
        assert!(!page.body.contains("color"));
        assert!(page.body.contains("Visible content only."));
    }

    #[test]
    fn body_whitespace_is_collapsed() {
        let html = "<html><body><article>Spaced    out\t\ttext   here.</article></body></html>";
        let page = parse_page("https://example.com/a", html, false);
        assert_eq!(page.body, "Spaced out text here.");
    }

    #[test]
    fn body_is_capped() {
        let long = "word ".repeat(5_000);
        let html = format!("<html><body><article>{long}</article></body></html>");
        let page = parse_page("https://example.com/a", &html, false);
        assert!(page.body.chars().count() <= CONTENT_MAX_CHARS);
    }

    #[test]
    fn truncation_is_idempotent() {
        let capped = truncate_content(&"x".repeat(20_000));
        assert_eq!(truncate_content(&capped), capped);
        assert_eq!(truncate_content("short"), "short");
    }

    #[test]
    fn paywalled_domain_detection() {
        assert!(HttpExtractor::is_paywalled("https://www.wsj.com/articles/x"));
        assert!(HttpExtractor::is_paywalled("https://www.nytimes.com/2024/x"));
        assert!(!HttpExtractor::is_paywalled("https://www.bbc.com/news/x"));
    }
}
