//! Outcome analysis: taxonomy level, complexity, requirements and prerequisites.

use crate::verbs::{classify_verb, level_for_token};
use derive_getters::Getters;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use storyboard_core::{
    OutcomeAnalysis, OutcomeMap, RequirementPriority, SceneRequirement, SceneType,
    TaxonomyLevel, text,
};
use tracing::{debug, instrument};

/// Maximum number of outcomes inferred from source text.
const MAX_INFERRED_OUTCOMES: usize = 6;
/// Minimum trimmed source length for key-term inference.
const MIN_SOURCE_CHARS: usize = 50;

/// Broad experience level of the audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudienceLevel {
    /// New to the subject
    Beginner,
    /// No strong signal either way
    #[default]
    General,
    /// Experienced practitioners
    Expert,
}

impl AudienceLevel {
    /// Infer the level from a free-text audience description.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_analysis::AudienceLevel;
    ///
    /// assert_eq!(AudienceLevel::infer("New hires in retail"), AudienceLevel::Beginner);
    /// assert_eq!(AudienceLevel::infer("Senior engineers"), AudienceLevel::Expert);
    /// assert_eq!(AudienceLevel::infer("All staff"), AudienceLevel::General);
    /// ```
    pub fn infer(audience: &str) -> Self {
        const BEGINNER: &[&str] = &[
            "new", "beginner", "beginners", "novice", "novices", "entry", "introductory",
            "junior", "first-time", "starter", "starters", "graduate", "graduates", "trainee",
            "trainees",
        ];
        const EXPERT: &[&str] = &[
            "expert", "experts", "senior", "advanced", "experienced", "specialist",
            "specialists", "executive", "executives", "veteran",
        ];
        let tokens = text::tokens(audience);
        if tokens.iter().any(|t| EXPERT.contains(&t.as_str())) {
            Self::Expert
        } else if tokens.iter().any(|t| BEGINNER.contains(&t.as_str())) {
            Self::Beginner
        } else {
            Self::General
        }
    }

    fn adjustment(self) -> i32 {
        match self {
            Self::Beginner => -1,
            Self::General => 0,
            Self::Expert => 1,
        }
    }
}

/// Run-level facts that influence outcome analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
pub struct AnalysisContext {
    /// Module topic
    topic: String,
    /// Audience experience level
    audience: AudienceLevel,
}

impl AnalysisContext {
    /// Context for a topic and free-text audience description.
    pub fn new(topic: impl Into<String>, audience: &str) -> Self {
        Self {
            topic: topic.into(),
            audience: AudienceLevel::infer(audience),
        }
    }
}

/// Classifies outcomes and infers outcomes from source text.
#[derive(Debug, Clone)]
pub struct OutcomeAnalyzer {
    able_to: Regex,
    key_term: Regex,
}

impl Default for OutcomeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeAnalyzer {
    /// Create an analyzer, compiling its patterns.
    pub fn new() -> Self {
        let able_to = Regex::new(r"(?i)\bable\s+to\s+([a-z][^.;\n]{8,160})")
            .expect("Valid able-to regex");
        let key_term = Regex::new(r"\b(?:[A-Z]{2,6}|[A-Z][a-z]{3,}(?:\s+[A-Z][a-z]{3,}){0,2})\b")
            .expect("Valid key term regex");
        Self { able_to, key_term }
    }

    /// Analyze one outcome in isolation. Prerequisites are filled by [`Self::build_map`].
    #[instrument(skip(self, ctx))]
    pub fn analyze(&self, index: usize, outcome: &str, ctx: &AnalysisContext) -> OutcomeAnalysis {
        let taxonomy_level = classify_verb(outcome).unwrap_or_default();
        let complexity = complexity(outcome, taxonomy_level, *ctx.audience());
        let scene_requirements = requirements(taxonomy_level, complexity);
        let estimated_scenes = scene_requirements.iter().map(|r| r.count).sum();
        debug!(%taxonomy_level, complexity, estimated_scenes, "Analyzed outcome");
        OutcomeAnalysis {
            index,
            outcome: outcome.trim().to_string(),
            taxonomy_level,
            complexity,
            prerequisites: Vec::new(),
            scene_requirements,
            estimated_scenes,
        }
    }

    /// Analyze every outcome and link prerequisites.
    ///
    /// Outcome `j` is a prerequisite of a later outcome `i` when it sits at a
    /// lower taxonomy level and the two share a subject keyword.
    #[instrument(skip_all, fields(outcomes = outcomes.len()))]
    pub fn build_map(&self, outcomes: &[String], ctx: &AnalysisContext) -> OutcomeMap {
        let mut analyses: Vec<OutcomeAnalysis> = outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| self.analyze(i, o, ctx))
            .collect();
        let subjects: Vec<BTreeSet<String>> = outcomes.iter().map(|o| subject_keywords(o)).collect();

        for i in 0..analyses.len() {
            let prerequisites: Vec<usize> = (0..i)
                .filter(|&j| {
                    analyses[j].taxonomy_level < analyses[i].taxonomy_level
                        && !subjects[i].is_disjoint(&subjects[j])
                })
                .collect();
            if !prerequisites.is_empty() {
                debug!(outcome = i, ?prerequisites, "Linked prerequisites");
            }
            analyses[i].prerequisites = prerequisites;
        }

        OutcomeMap::from_analyses(analyses)
    }

    /// Recover outcomes from source text when the request supplied none.
    ///
    /// Explicit objective lines and "able to ..." clauses come first; if that
    /// yields fewer than three and the source is long enough, outcomes are
    /// derived from recurring key terms. Results are deduplicated and capped.
    #[instrument(skip(self, source), fields(source_len = source.len()))]
    pub fn extract_from_source(&self, source: &str, topic: &str) -> Vec<String> {
        let source = source.trim();
        if source.is_empty() {
            return Vec::new();
        }

        let mut found: Vec<String> = Vec::new();
        let push = |candidate: &str, found: &mut Vec<String>| {
            let cleaned = clean_outcome(candidate);
            let words = text::word_count(&cleaned);
            if (3..=30).contains(&words)
                && !found.iter().any(|f| f.eq_ignore_ascii_case(&cleaned))
            {
                found.push(cleaned);
            }
        };

        for line in source.lines() {
            let stripped = text::strip_bullet(line);
            let first = text::tokens(stripped).into_iter().next();
            if first.as_deref().and_then(level_for_token).is_some() {
                push(stripped, &mut found);
            }
        }
        for capture in self.able_to.captures_iter(source) {
            let clause = &capture[1];
            let first = text::tokens(clause).into_iter().next();
            if first.as_deref().and_then(level_for_token).is_some() {
                push(clause, &mut found);
            }
        }
        debug!(explicit = found.len(), "Explicit objectives found");

        if found.len() < 3 && source.chars().count() >= MIN_SOURCE_CHARS {
            for (i, term) in self.recurring_terms(source).iter().enumerate() {
                if found.len() >= MAX_INFERRED_OUTCOMES {
                    break;
                }
                push(&term_outcome(i, term, topic), &mut found);
            }
        }

        found.truncate(MAX_INFERRED_OUTCOMES);
        debug!(inferred = found.len(), "Inferred outcomes from source");
        found
    }

    /// Capitalised terms and acronyms appearing at least twice, in order of first use.
    fn recurring_terms(&self, source: &str) -> Vec<String> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut order: Vec<String> = Vec::new();
        for m in self.key_term.find_iter(source) {
            let term = m.as_str().to_string();
            let first_word = term.split_whitespace().next().unwrap_or_default().to_lowercase();
            if text::is_stopword(&first_word) || level_for_token(&first_word).is_some() {
                continue;
            }
            let count = counts.entry(term.clone()).or_insert(0);
            if *count == 0 {
                order.push(term);
            }
            *count += 1;
        }
        order
            .into_iter()
            .filter(|t| counts.get(t).copied().unwrap_or(0) >= 2)
            .collect()
    }
}

fn complexity(outcome: &str, level: TaxonomyLevel, audience: AudienceLevel) -> u8 {
    let base: i32 = match level {
        TaxonomyLevel::Remember => 2,
        TaxonomyLevel::Understand => 3,
        TaxonomyLevel::Apply => 5,
        TaxonomyLevel::Analyze => 6,
        TaxonomyLevel::Evaluate => 7,
        TaxonomyLevel::Create => 8,
    };
    let long = i32::from(text::word_count(outcome) > 12);
    let compound =
        i32::from(outcome.contains(';') || text::tokens(outcome).iter().any(|t| t == "and"));
    (base + long + compound + audience.adjustment()).clamp(1, 10) as u8
}

fn requirements(level: TaxonomyLevel, complexity: u8) -> Vec<SceneRequirement> {
    let required_from = |floor: TaxonomyLevel| {
        if level >= floor {
            RequirementPriority::Required
        } else {
            RequirementPriority::Recommended
        }
    };
    SceneType::CANONICAL
        .iter()
        .map(|&scene_type| {
            let (priority, count) = match scene_type {
                SceneType::Teach | SceneType::Check => (RequirementPriority::Required, 1),
                SceneType::Show => (required_from(TaxonomyLevel::Understand), 1),
                SceneType::Apply => (
                    required_from(TaxonomyLevel::Apply),
                    if complexity >= 7 { 2 } else { 1 },
                ),
                SceneType::Reflect => (required_from(TaxonomyLevel::Evaluate), 1),
                SceneType::Other => (RequirementPriority::Optional, 0),
            };
            SceneRequirement {
                scene_type,
                priority,
                count,
            }
        })
        .collect()
}

/// Keywords of an outcome with its action verbs removed.
///
/// Two outcomes sharing a subject keyword are treated as related.
pub fn subject_keywords(outcome: &str) -> BTreeSet<String> {
    text::keywords(outcome)
        .into_iter()
        .filter(|k| level_for_token(k).is_none())
        .collect()
}

fn clean_outcome(candidate: &str) -> String {
    let trimmed = candidate
        .trim()
        .trim_end_matches(['.', ';', ',', ':'])
        .trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn term_outcome(i: usize, term: &str, topic: &str) -> String {
    let topic = if topic.trim().is_empty() {
        "the workplace"
    } else {
        topic.trim()
    };
    match i % 3 {
        0 => format!("Identify the key elements of {term}"),
        1 => format!("Explain how {term} relates to {topic}"),
        _ => format!("Apply {term} in a realistic situation"),
    }
}
