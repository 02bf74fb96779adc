//! Excerpt selection: pull the most query-relevant sentences out of a
//! source's body text.

use regex::Regex;

/// Maximum number of quotes selected per source (and consumed per summary).
pub const MAX_QUOTES: usize = 5;

/// A quote must be strictly longer than this many characters.
pub const MIN_QUOTE_CHARS: usize = 30;

/// A quote must be strictly shorter than this many characters.
pub const MAX_QUOTE_CHARS: usize = 500;

/// Split text into sentences on `.`, `!`, `?` boundaries, keeping the
/// terminator with each sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let boundary = Regex::new(r"[^.!?]+[.!?]+").unwrap();
    boundary.find_iter(text).map(|m| m.as_str()).collect()
}

/// Lowercased, whitespace-split query words.
pub fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Select up to [`MAX_QUOTES`] sentences relevant to the query.
///
/// A sentence qualifies when it contains at least one query word and its
/// length lies strictly between [`MIN_QUOTE_CHARS`] and [`MAX_QUOTE_CHARS`].
/// Qualifying sentences are ordered by how many query words they contain;
/// the sort is stable, so ties keep original text order.
pub fn select_quotes(content: &str, query: &str) -> Vec<String> {
    let words = query_words(query);
    if words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, String)> = Vec::new();
    for sentence in split_sentences(content) {
        let trimmed = sentence.trim();
        let len = trimmed.chars().count();
        if len <= MIN_QUOTE_CHARS || len >= MAX_QUOTE_CHARS {
            continue;
        }

        let lower = trimmed.to_lowercase();
        let matches = words.iter().filter(|w| lower.contains(w.as_str())).count();
        if matches > 0 {
            scored.push((matches, trimmed.to_string()));
        }
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(MAX_QUOTES)
        .map(|(_, sentence)| sentence)
        .collect()
}
