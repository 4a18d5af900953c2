//! Action-verb tables for taxonomy classification.

use storyboard_core::{TaxonomyLevel, text};

const REMEMBER: &[&str] = &[
    "identify", "list", "name", "recall", "define", "recognise", "recognize", "state", "label",
    "match", "memorise", "memorize",
];
const UNDERSTAND: &[&str] = &[
    "explain", "describe", "summarise", "summarize", "interpret", "classify", "discuss",
    "paraphrase", "understand", "outline",
];
const APPLY: &[&str] = &[
    "apply", "use", "demonstrate", "implement", "execute", "perform", "practise", "practice",
    "solve", "conduct", "handle",
];
const ANALYZE: &[&str] = &[
    "analyse", "analyze", "compare", "contrast", "differentiate", "examine", "distinguish",
    "investigate", "diagnose", "categorise", "categorize",
];
const EVALUATE: &[&str] = &[
    "evaluate", "assess", "judge", "critique", "justify", "prioritise", "prioritize",
    "recommend", "select", "decide",
];
const CREATE: &[&str] = &[
    "create", "design", "develop", "construct", "formulate", "plan", "produce", "compose",
    "build", "devise",
];

const TABLES: [(TaxonomyLevel, &[&str]); 6] = [
    (TaxonomyLevel::Remember, REMEMBER),
    (TaxonomyLevel::Understand, UNDERSTAND),
    (TaxonomyLevel::Apply, APPLY),
    (TaxonomyLevel::Analyze, ANALYZE),
    (TaxonomyLevel::Evaluate, EVALUATE),
    (TaxonomyLevel::Create, CREATE),
];

/// Level whose verb table contains the token, accepting simple inflections
/// (`identifies`, `explaining`, `applied`).
///
/// # Examples
///
/// ```
/// use storyboard_analysis::level_for_token;
/// use storyboard_core::TaxonomyLevel;
///
/// assert_eq!(level_for_token("compares"), Some(TaxonomyLevel::Analyze));
/// assert_eq!(level_for_token("types"), None);
/// ```
pub fn level_for_token(token: &str) -> Option<TaxonomyLevel> {
    let token = token.to_lowercase();
    stems(&token).into_iter().find_map(|stem| {
        TABLES
            .iter()
            .find(|(_, verbs)| verbs.contains(&stem.as_str()))
            .map(|(level, _)| *level)
    })
}

/// Level of the earliest verb in the text, `None` when no verb matches.
pub fn classify_verb(text: &str) -> Option<TaxonomyLevel> {
    text::tokens(text).iter().find_map(|t| level_for_token(t))
}

fn stems(token: &str) -> Vec<String> {
    let mut out = vec![token.to_string()];
    if let Some(base) = token.strip_suffix("ies") {
        out.push(format!("{base}y"));
    }
    if let Some(base) = token.strip_suffix("ied") {
        out.push(format!("{base}y"));
    }
    if let Some(base) = token.strip_suffix("es") {
        out.push(base.to_string());
    }
    if let Some(base) = token.strip_suffix('s') {
        out.push(base.to_string());
    }
    if let Some(base) = token.strip_suffix("ing") {
        out.push(base.to_string());
        out.push(format!("{base}e"));
    }
    if let Some(base) = token.strip_suffix("ed") {
        out.push(base.to_string());
        out.push(format!("{base}e"));
    }
    out
}
