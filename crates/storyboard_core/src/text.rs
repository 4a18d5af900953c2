//! Small text utilities shared by the analysis, pedagogy and quality stages.
//!
//! Everything here is a pure function over `&str`.

use std::collections::BTreeSet;

const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "among", "and", "are", "been",
    "before", "being", "between", "both", "but", "can", "could", "does", "doing", "each", "every",
    "for", "from", "have", "having", "here", "into", "its", "learner", "learners", "more", "most",
    "must", "other", "over", "own", "same", "should", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "under",
    "until", "very", "were", "what", "when", "where", "which", "while", "will", "with", "within",
    "without", "would", "your", "able", "using", "different", "various", "key", "main",
];

/// Number of whitespace-separated words.
///
/// # Examples
///
/// ```
/// use storyboard_core::text::word_count;
///
/// assert_eq!(word_count("  one two\nthree "), 3);
/// assert_eq!(word_count(""), 0);
/// ```
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased alphanumeric tokens, in order of appearance.
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
        .map(|t| t.trim_matches(|c: char| c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Whether a lowercased token is a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Significant keywords: tokens of four or more letters that are not stopwords.
///
/// # Examples
///
/// ```
/// use storyboard_core::text::keywords;
///
/// let kw = keywords("Identify the four CAPS types");
/// assert!(kw.contains("caps"));
/// assert!(kw.contains("types"));
/// assert!(!kw.contains("the"));
/// ```
pub fn keywords(text: &str) -> BTreeSet<String> {
    tokens(text)
        .into_iter()
        .filter(|t| t.chars().count() >= 4 && !is_stopword(t))
        .collect()
}

/// Fraction of `needles` keywords present in `haystack` (0.0 when `needles` has none).
pub fn keyword_overlap(needles: &BTreeSet<String>, haystack: &str) -> f64 {
    if needles.is_empty() {
        return 0.0;
    }
    let found = keywords(haystack);
    let hits = needles.iter().filter(|k| found.contains(*k)).count();
    hits as f64 / needles.len() as f64
}

/// Split text into trimmed, non-empty sentences.
///
/// Sentence boundaries are `.`, `!` or `?` followed by whitespace, and line breaks.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            current.push(c);
            if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|n| n.is_whitespace()) {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
                current.clear();
            }
        }
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Non-empty lines with leading bullet or numbering markers removed.
pub fn bullet_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_bullet)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip a leading `-`, `*`, `•` or `1.`/`1)` marker and surrounding whitespace.
pub fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    let without_symbol = trimmed.trim_start_matches(['-', '*', '•', '–']).trim_start();
    if without_symbol.len() != trimmed.len() {
        return without_symbol;
    }
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return stripped.trim_start();
        }
    }
    trimmed
}

/// Case-insensitive containment.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Shorten to at most `max_chars` characters on a word boundary, appending `…`.
pub fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out = String::new();
    for word in text.split_whitespace() {
        if out.chars().count() + word.chars().count() + 1 > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.push('…');
    out
}
