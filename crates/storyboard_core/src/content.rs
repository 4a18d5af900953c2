//! Grounded content extracted from source material.

use crate::text;
use serde::{Deserialize, Serialize};

/// Whether a pool came from real source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentProvenance {
    /// Facts pulled from the supplied source text
    Extracted,
    /// Source was missing or too short; only topic and outcome phrases are present
    #[default]
    TopicDerived,
}

/// A named model or framework and its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    /// Framework name, e.g. an acronym
    pub name: String,
    /// Named components, e.g. the four types of a model
    pub components: Vec<String>,
}

/// A term and its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// The term
    pub term: String,
    /// Definition as written in the source (empty for topic-derived terms)
    pub definition: String,
}

/// A named person appearing in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Given name
    pub name: String,
    /// Role description
    pub role: String,
}

/// Flat pool of grounded facts, loosely keyed to outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentPool {
    /// Named models and frameworks
    pub frameworks: Vec<Framework>,
    /// Techniques, approaches and methods
    pub techniques: Vec<String>,
    /// Defined terms
    pub terminology: Vec<Term>,
    /// Worked examples
    pub examples: Vec<String>,
    /// Step-by-step processes
    pub processes: Vec<String>,
    /// Common mistakes
    pub pitfalls: Vec<String>,
    /// Named people
    pub characters: Vec<Character>,
    /// Where the pool came from
    pub provenance: ContentProvenance,
}

impl ContentPool {
    /// Pool used when no usable source text exists.
    ///
    /// Holds terminology only: the topic and the object phrase of each
    /// outcome (the outcome minus its leading verb), with empty definitions.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::{ContentPool, ContentProvenance};
    ///
    /// let pool = ContentPool::topic_derived("Fire safety", &["List the fire exits".to_string()]);
    /// assert_eq!(pool.provenance, ContentProvenance::TopicDerived);
    /// assert_eq!(pool.terminology[1].term, "the fire exits");
    /// ```
    pub fn topic_derived(topic: &str, outcomes: &[String]) -> Self {
        let mut terms: Vec<String> = Vec::new();
        let topic = topic.trim();
        if !topic.is_empty() {
            terms.push(topic.to_string());
        }
        for outcome in outcomes {
            let phrase = outcome
                .trim()
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest.trim().trim_end_matches(['.', ';']))
                .unwrap_or_default();
            if !phrase.is_empty() && !terms.iter().any(|t| t.eq_ignore_ascii_case(phrase)) {
                terms.push(phrase.to_string());
            }
        }
        Self {
            terminology: terms
                .into_iter()
                .map(|term| Term {
                    term,
                    definition: String::new(),
                })
                .collect(),
            provenance: ContentProvenance::TopicDerived,
            ..Default::default()
        }
    }

    /// Whether extraction found anything at all.
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
            && self.techniques.is_empty()
            && self.terminology.is_empty()
            && self.examples.is_empty()
            && self.processes.is_empty()
            && self.pitfalls.is_empty()
            && self.characters.is_empty()
    }

    /// Whether the pool reflects real source text.
    pub fn is_grounded(&self) -> bool {
        self.provenance == ContentProvenance::Extracted
    }

    /// Name of the first framework, used as the framework under validation.
    pub fn primary_framework(&self) -> Option<&Framework> {
        self.frameworks.first()
    }

    /// Items sharing at least one keyword with the outcome, as display strings.
    ///
    /// When nothing overlaps the first few items of each list are returned so
    /// synthesizers always see some grounded context.
    pub fn relevant_to(&self, outcome: &str, limit: usize) -> Vec<String> {
        let needles = text::keywords(outcome);
        let all = self.flatten();
        let mut hits: Vec<String> = all
            .iter()
            .filter(|item| text::keyword_overlap(&needles, item) > 0.0)
            .cloned()
            .collect();
        if hits.is_empty() {
            hits = all;
        }
        hits.truncate(limit);
        hits
    }

    fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        for f in &self.frameworks {
            if f.components.is_empty() {
                out.push(format!("Framework: {}", f.name));
            } else {
                out.push(format!("Framework: {} ({})", f.name, f.components.join(", ")));
            }
        }
        for t in &self.terminology {
            if t.definition.is_empty() {
                out.push(format!("Term: {}", t.term));
            } else {
                out.push(format!("Term: {} - {}", t.term, t.definition));
            }
        }
        out.extend(self.techniques.iter().map(|t| format!("Technique: {t}")));
        out.extend(self.processes.iter().map(|p| format!("Process: {p}")));
        out.extend(self.examples.iter().map(|e| format!("Example: {e}")));
        out.extend(self.pitfalls.iter().map(|p| format!("Pitfall: {p}")));
        out.extend(
            self.characters
                .iter()
                .map(|c| format!("Character: {}, {}", c.name, c.role)),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ContentPool {
        ContentPool {
            frameworks: vec![Framework {
                name: "CAPS".to_string(),
                components: vec![
                    "Controller".to_string(),
                    "Analyser".to_string(),
                    "Promoter".to_string(),
                    "Supporter".to_string(),
                ],
            }],
            pitfalls: vec!["Avoid labelling colleagues permanently.".to_string()],
            provenance: ContentProvenance::Extracted,
            ..Default::default()
        }
    }

    #[test]
    fn relevant_items_share_keywords() {
        let items = pool().relevant_to("Identify the four CAPS types", 5);
        assert_eq!(items.len(), 1);
        assert!(items[0].contains("Controller"));
    }

    #[test]
    fn falls_back_to_everything_when_nothing_overlaps() {
        let items = pool().relevant_to("Negotiate budgets", 5);
        assert_eq!(items.len(), 2);
    }
}
