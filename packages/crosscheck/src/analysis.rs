//! Cross-check analysis: relevance scoring, verdict, confidence, and topic
//! summaries.
//!
//! Relevance here is raw term-frequency density, not semantic similarity.
//! That is a known limitation, kept deliberately: the verdict table below is
//! calibrated against this formula, and swapping in a smarter scorer would
//! silently change verdict outcomes.

use std::sync::Arc;

use regex::Regex;

use crate::quotes::{query_words, split_sentences, MAX_QUOTES};
use crate::registry::TrustRegistry;
use crate::traits::ResearchDelegate;
use crate::types::{truncate_chars, CrossCheckResult, SearchResult, TopicSummary, Verdict};

/// Relevance above which a trusted source counts as agreeing with the claim.
pub const HIGH_RELEVANCE_THRESHOLD: f64 = 0.7;

/// A claim is `verified` only with strictly more than this many trusted
/// sources. The constant is inherited as-is; no rationale is recorded for
/// the value.
pub const VERIFIED_MIN_TRUSTED: usize = 2;

const SUMMARY_MAX_CHARS: usize = 500;
const SUMMARY_MAX_SENTENCES: usize = 5;

/// Score how densely the query's words occur in `content`, in [0, 1].
///
/// For each query word, counts literal case-insensitive occurrences, sums
/// across words, and normalizes by `word_count * 10`, clamped to 1.
pub fn relevance_score(content: &str, query: &str) -> f64 {
    let words = query_words(query);
    if words.is_empty() {
        return 0.0;
    }

    let content_lower = content.to_lowercase();
    let occurrences: usize = words
        .iter()
        .map(|word| content_lower.matches(word.as_str()).count())
        .sum();

    (occurrences as f64 / (words.len() as f64 * 10.0)).min(1.0)
}

/// Derive the verdict from the trusted-result relevance distribution.
///
/// Deterministic and total:
/// 1. no results, or no trusted results -> `unverified`
/// 2. every trusted result is high-relevance and there are more than
///    [`VERIFIED_MIN_TRUSTED`] of them -> `verified`
/// 3. no trusted result is high-relevance -> `disputed`
/// 4. otherwise -> `mixed`
pub fn determine_verdict(results: &[SearchResult]) -> Verdict {
    if results.is_empty() {
        return Verdict::Unverified;
    }

    let trusted: Vec<&SearchResult> = results.iter().filter(|r| r.source.is_trusted).collect();
    if trusted.is_empty() {
        return Verdict::Unverified;
    }

    let high_relevance = trusted
        .iter()
        .filter(|r| r.relevance_score > HIGH_RELEVANCE_THRESHOLD)
        .count();

    if high_relevance == trusted.len() && trusted.len() > VERIFIED_MIN_TRUSTED {
        Verdict::Verified
    } else if high_relevance == 0 {
        Verdict::Disputed
    } else {
        Verdict::Mixed
    }
}

/// Mean reliability-weighted relevance across all results, clamped to [0, 1].
/// Zero results yield confidence 0.
pub fn confidence(results: &[SearchResult], registry: &TrustRegistry) -> f64 {
    if results.is_empty() {
        return 0.0;
    }

    let total: f64 = results
        .iter()
        .map(|r| registry.reliability(&r.source.url) * r.relevance_score)
        .sum();

    (total / results.len() as f64).clamp(0.0, 1.0)
}

/// Local extractive summarizer, the fallback when no delegate answers.
///
/// Takes the first non-empty content string, normalizes whitespace, keeps
/// the first few sentences, and hard-truncates at [`SUMMARY_MAX_CHARS`].
pub fn local_summary(contents: &[String]) -> String {
    let Some(content) = contents.iter().find(|c| !c.trim().is_empty()) else {
        return "No relevant summary available.".to_string();
    };

    let ws = Regex::new(r"\s+").unwrap();
    let normalized = ws.replace_all(content, " ").trim().to_string();

    let mut summary = split_sentences(&normalized)
        .into_iter()
        .take(SUMMARY_MAX_SENTENCES)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");

    // Content without sentence terminators still gets summarized.
    if summary.is_empty() {
        summary = normalized;
    }

    if summary.chars().count() > SUMMARY_MAX_CHARS {
        format!("{}...", truncate_chars(&summary, SUMMARY_MAX_CHARS))
    } else {
        summary
    }
}

/// Group results into topics.
///
/// All results currently land in a single group keyed by the original query.
/// TODO: real topic clustering.
fn group_by_topic<'a>(
    query: &str,
    results: &'a [SearchResult],
) -> Vec<(String, Vec<&'a SearchResult>)> {
    vec![(query.to_string(), results.iter().collect())]
}

/// Aggregates per-source results into the final cross-check artifact.
pub struct CrossCheckAnalyzer {
    registry: Arc<TrustRegistry>,
    delegate: Arc<dyn ResearchDelegate>,
}

impl CrossCheckAnalyzer {
    pub fn new(registry: Arc<TrustRegistry>, delegate: Arc<dyn ResearchDelegate>) -> Self {
        Self { registry, delegate }
    }

    /// Compute topic summaries, verdict, and confidence for the processed
    /// results.
    pub async fn analyze(&self, query: &str, results: Vec<SearchResult>) -> CrossCheckResult {
        let summary = self.topic_summaries(query, &results).await;
        let verdict = determine_verdict(&results);
        let confidence = confidence(&results, &self.registry);

        CrossCheckResult {
            original_claim: query.to_string(),
            sources: results,
            summary,
            verdict,
            confidence,
        }
    }

    async fn topic_summaries(&self, query: &str, results: &[SearchResult]) -> Vec<TopicSummary> {
        let groups = group_by_topic(query, results);
        let mut summaries = Vec::with_capacity(groups.len());

        for (topic, members) in groups {
            let contents: Vec<String> = members.iter().map(|r| r.content.clone()).collect();

            let summary = match self.delegate.generate_summary(&contents, &topic).await {
                Some(summary) => summary,
                None => local_summary(&contents),
            };

            summaries.push(TopicSummary {
                topic,
                summary,
                sources: members.iter().map(|r| r.source.url.clone()).collect(),
                quotes: members
                    .iter()
                    .flat_map(|r| r.quotes.iter().cloned())
                    .take(MAX_QUOTES)
                    .collect(),
            });
        }

        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoopDelegate;
    use crate::types::{Quote, Source};

    fn result(url: &str, is_trusted: bool, relevance_score: f64) -> SearchResult {
        SearchResult {
            source: Source {
                url: url.to_string(),
                title: "Title".to_string(),
                domain: crate::registry::normalized_domain(url).unwrap(),
                is_trusted,
                publish_date: None,
            },
            content: String::new(),
            relevance_score,
            quotes: Vec::new(),
        }
    }

    #[test]
    fn relevance_counts_occurrences_per_query_word() {
        // "climate" x3, "policy" x1, two words => 4 / (2 * 10) = 0.2
        let content = "climate Climate CLIMATE policy";
        let score = relevance_score(content, "climate policy");
        assert!((score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn relevance_clamps_to_one() {
        let content = "word ".repeat(100);
        assert_eq!(relevance_score(&content, "word"), 1.0);
    }

    #[test]
    fn relevance_of_empty_query_is_zero() {
        assert_eq!(relevance_score("anything", ""), 0.0);
    }

    #[test]
    fn verdict_no_results_is_unverified() {
        assert_eq!(determine_verdict(&[]), Verdict::Unverified);
    }

    #[test]
    fn verdict_no_trusted_results_is_unverified() {
        let results = vec![result("https://blog.example/a", false, 0.9)];
        assert_eq!(determine_verdict(&results), Verdict::Unverified);
    }

    #[test]
    fn verdict_all_high_relevance_with_enough_trusted_is_verified() {
        let results = vec![
            result("https://bbc.com/a", true, 0.8),
            result("https://reuters.com/b", true, 0.8),
            result("https://apnews.com/c", true, 0.8),
        ];
        assert_eq!(determine_verdict(&results), Verdict::Verified);
    }

    #[test]
    fn verdict_needs_strictly_more_than_min_trusted() {
        // Two trusted sources, both high relevance: not enough for verified.
        let results = vec![
            result("https://bbc.com/a", true, 0.9),
            result("https://reuters.com/b", true, 0.9),
        ];
        assert_eq!(determine_verdict(&results), Verdict::Mixed);
    }

    #[test]
    fn verdict_no_high_relevance_is_disputed() {
        let results = vec![
            result("https://bbc.com/a", true, 0.3),
            result("https://reuters.com/b", true, 0.3),
            result("https://apnews.com/c", true, 0.3),
        ];
        assert_eq!(determine_verdict(&results), Verdict::Disputed);
    }

    #[test]
    fn verdict_partial_agreement_is_mixed() {
        let results = vec![
            result("https://bbc.com/a", true, 0.9),
            result("https://reuters.com/b", true, 0.3),
        ];
        assert_eq!(determine_verdict(&results), Verdict::Mixed);
    }

    #[test]
    fn verdict_ignores_untrusted_results_past_the_filter() {
        // Untrusted high-relevance results must not tip a disputed verdict.
        let results = vec![
            result("https://bbc.com/a", true, 0.1),
            result("https://blog.example/b", false, 1.0),
        ];
        assert_eq!(determine_verdict(&results), Verdict::Disputed);
    }

    #[test]
    fn confidence_of_no_results_is_zero() {
        let registry = TrustRegistry::new();
        assert_eq!(confidence(&[], &registry), 0.0);
    }

    #[test]
    fn confidence_is_mean_of_reliability_times_relevance() {
        let registry = TrustRegistry::new();
        let results = vec![
            result("https://bbc.com/a", true, 1.0),       // 0.95 * 1.0
            result("https://unknown.example/b", false, 0.5), // 0.50 * 0.5
        ];
        let expected = (0.95 + 0.25) / 2.0;
        assert!((confidence(&results, &registry) - expected).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_monotonic_in_relevance() {
        let registry = TrustRegistry::new();
        let low = vec![result("https://bbc.com/a", true, 0.2)];
        let high = vec![result("https://bbc.com/a", true, 0.9)];
        assert!(confidence(&high, &registry) > confidence(&low, &registry));
    }

    #[test]
    fn confidence_never_exceeds_one() {
        let registry = TrustRegistry::new();
        // relevance_score is clamped upstream, but confidence must clamp on
        // its own regardless of input magnitude.
        let results = vec![result("https://bbc.com/a", true, 100.0)];
        assert_eq!(confidence(&results, &registry), 1.0);
    }

    #[test]
    fn local_summary_uses_first_nonempty_content() {
        let contents = vec![
            "   ".to_string(),
            "First sentence here. Second sentence here.".to_string(),
            "Ignored later content.".to_string(),
        ];
        let summary = local_summary(&contents);
        assert!(summary.starts_with("First sentence here."));
        assert!(!summary.contains("Ignored"));
    }

    #[test]
    fn local_summary_truncates_with_ellipsis() {
        let long_sentence = format!("{}.", "word ".repeat(200).trim());
        let summary = local_summary(&[long_sentence]);
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn local_summary_handles_no_content() {
        assert_eq!(local_summary(&[]), "No relevant summary available.");
        assert_eq!(
            local_summary(&["".to_string()]),
            "No relevant summary available."
        );
    }

    #[tokio::test]
    async fn analyze_produces_single_topic_group_with_capped_quotes() {
        let registry = Arc::new(TrustRegistry::new());
        let analyzer = CrossCheckAnalyzer::new(registry, Arc::new(NoopDelegate));

        let mut r = result("https://bbc.com/a", true, 0.9);
        r.content = "Climate policy moved forward. More happened after that.".to_string();
        r.quotes = (0..8)
            .map(|position| Quote {
                text: format!("Quote number {position} about the climate."),
                source_url: "https://bbc.com/a".to_string(),
                position,
                translation: None,
            })
            .collect();

        let outcome = analyzer.analyze("climate policy", vec![r]).await;

        assert_eq!(outcome.summary.len(), 1);
        assert_eq!(outcome.summary[0].topic, "climate policy");
        assert_eq!(outcome.summary[0].quotes.len(), MAX_QUOTES);
        assert_eq!(outcome.summary[0].sources, vec!["https://bbc.com/a"]);
        // Noop delegate forces the local summarizer.
        assert!(outcome.summary[0].summary.contains("Climate policy"));
    }
}
