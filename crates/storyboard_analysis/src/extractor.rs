//! Grounded content extraction from source text.
//!
//! Every item the extractor returns is a substring of the source. Nothing is
//! paraphrased or invented; short or missing sources fall back to a
//! topic-derived pool instead.

use regex::Regex;
use storyboard_core::{Character, ContentPool, ContentProvenance, Framework, Term, text};
use tracing::{debug, instrument};

/// Sources shorter than this (trimmed) are treated as absent.
const MIN_SOURCE_CHARS: usize = 50;
/// Cap on items per pool list.
const MAX_ITEMS: usize = 12;

const ARTICLES: &[&str] = &["The", "This", "That", "A", "An", "Our", "Each", "Their", "Its"];
const NOT_NAMES: &[&str] = &[
    "However", "First", "Then", "Next", "Finally", "Today", "Here", "There", "Also", "Instead",
    "Remember", "Note", "Example", "Step",
];

/// Pulls frameworks, techniques, terms, examples, processes, pitfalls and
/// characters out of source text.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    acronym_list: Regex,
    named_model: Regex,
    technique: Regex,
    definition: Regex,
    means: Regex,
    glossary: Regex,
    example: Regex,
    step_line: Regex,
    first_then: Regex,
    pitfall: Regex,
    character: Regex,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor {
    /// Create an extractor, compiling its patterns once.
    pub fn new() -> Self {
        let acronym_list = Regex::new(
            r"\b([A-Z]{2,6})\b[^.\n]*?([A-Z][A-Za-z-]+(?:,\s*[A-Z][A-Za-z-]+)+(?:,?\s+(?:and|or)\s+[A-Z][A-Za-z-]+)?)",
        )
        .expect("Valid acronym list regex");
        let named_model = Regex::new(
            r"\b((?:[A-Z][A-Za-z'-]*\s+){0,3}[A-Z][A-Za-z'-]*)\s+(?:model|framework|method|matrix|theory)\b",
        )
        .expect("Valid named model regex");
        let technique = Regex::new(r"(?i)\b(?:technique|approach|strategy|tactic|method)s?\b")
            .expect("Valid technique regex");
        let definition = Regex::new(r"^([A-Z][A-Za-z' -]{1,40}?)\s+(?:is|are)\s+(?:a|an|the)\s+(.{4,})$")
            .expect("Valid definition regex");
        let means = Regex::new(r"^([A-Z][A-Za-z' -]{1,40}?)\s+means\s+(.{4,})$")
            .expect("Valid means regex");
        let glossary = Regex::new(r"(?m)^\s*(?:[-*•]\s*)?([A-Z][A-Za-z' -]{1,40}):\s+(\S.*?)\s*$")
            .expect("Valid glossary regex");
        let example = Regex::new(r"(?i)\b(?:for example|e\.g\.|for instance|such as)")
            .expect("Valid example regex");
        let step_line = Regex::new(r"(?im)^\s*(?:\d+[.)]|step\s+\d+[:.)]?)\s+(\S.*?)\s*$")
            .expect("Valid step regex");
        let first_then =
            Regex::new(r"(?i)\bfirst\b.*\bthen\b").expect("Valid first-then regex");
        let pitfall = Regex::new(r"(?i)\b(?:avoid|mistakes?|pitfalls?|never|don't|do not)\b")
            .expect("Valid pitfall regex");
        let character = Regex::new(
            r"\b([A-Z][a-z]{2,}),\s+(?:a|an)\s+([a-z][a-z -]{2,40}?)(?:,|\.|;|\s+who\b|\s+at\b|\s+in\b|\s+from\b)",
        )
        .expect("Valid character regex");

        Self {
            acronym_list,
            named_model,
            technique,
            definition,
            means,
            glossary,
            example,
            step_line,
            first_then,
            pitfall,
            character,
        }
    }

    /// Extract a content pool from source text.
    ///
    /// Sources shorter than 50 characters produce
    /// [`ContentPool::topic_derived`].
    #[instrument(skip(self, source, outcomes), fields(source_len = source.len(), outcomes = outcomes.len()))]
    pub fn extract(&self, source: &str, outcomes: &[String], topic: &str) -> ContentPool {
        let source = source.trim();
        if source.chars().count() < MIN_SOURCE_CHARS {
            debug!("Source too short, deriving pool from topic and outcomes");
            return ContentPool::topic_derived(topic, outcomes);
        }

        let sentences = text::sentences(source);
        let pool = ContentPool {
            frameworks: self.frameworks(&sentences),
            techniques: self.matching_sentences(&sentences, &self.technique),
            terminology: self.terminology(source, &sentences),
            examples: self.matching_sentences(&sentences, &self.example),
            processes: self.processes(source, &sentences),
            pitfalls: self.matching_sentences(&sentences, &self.pitfall),
            characters: self.characters(source),
            provenance: ContentProvenance::Extracted,
        };
        debug!(
            frameworks = pool.frameworks.len(),
            techniques = pool.techniques.len(),
            terms = pool.terminology.len(),
            examples = pool.examples.len(),
            processes = pool.processes.len(),
            pitfalls = pool.pitfalls.len(),
            characters = pool.characters.len(),
            "Extracted content pool"
        );
        pool
    }

    fn frameworks(&self, sentences: &[String]) -> Vec<Framework> {
        let mut out: Vec<Framework> = Vec::new();
        for sentence in sentences {
            for caps in self.acronym_list.captures_iter(sentence) {
                let name = caps[1].to_string();
                let components: Vec<String> = caps[2]
                    .split(',')
                    .flat_map(|part| part.split(" and ").flat_map(|p| p.split(" or ")))
                    .map(|p| p.trim().trim_start_matches("and ").trim_start_matches("or ").trim())
                    .filter(|p| !p.is_empty() && *p != name)
                    .map(str::to_string)
                    .collect();
                if components.len() >= 3 {
                    upsert_framework(&mut out, name, components);
                }
            }
            for caps in self.named_model.captures_iter(sentence) {
                let name = strip_articles(&caps[1]);
                if !name.is_empty() {
                    upsert_framework(&mut out, name.to_string(), Vec::new());
                }
            }
        }
        out.truncate(MAX_ITEMS);
        out
    }

    fn terminology(&self, source: &str, sentences: &[String]) -> Vec<Term> {
        let mut out: Vec<Term> = Vec::new();
        let mut push = |term: &str, definition: &str| {
            let term = strip_articles(term.trim());
            if term.is_empty() || out.iter().any(|t| t.term.eq_ignore_ascii_case(term)) {
                return;
            }
            out.push(Term {
                term: term.to_string(),
                definition: definition.trim().trim_end_matches('.').to_string(),
            });
        };
        for caps in self.glossary.captures_iter(source) {
            push(&caps[1], &caps[2]);
        }
        for sentence in sentences {
            if let Some(caps) = self
                .definition
                .captures(sentence)
                .or_else(|| self.means.captures(sentence))
            {
                push(&caps[1], &caps[2]);
            }
        }
        out.truncate(MAX_ITEMS);
        out
    }

    fn processes(&self, source: &str, sentences: &[String]) -> Vec<String> {
        let mut out: Vec<String> = self
            .step_line
            .captures_iter(source)
            .map(|caps| caps[1].to_string())
            .collect();
        for sentence in sentences {
            if self.first_then.is_match(sentence) && !out.contains(sentence) {
                out.push(sentence.clone());
            }
        }
        out.dedup();
        out.truncate(MAX_ITEMS);
        out
    }

    fn characters(&self, source: &str) -> Vec<Character> {
        let mut out: Vec<Character> = Vec::new();
        for caps in self.character.captures_iter(source) {
            let name = &caps[1];
            if NOT_NAMES.contains(&name) || out.iter().any(|c| c.name == name) {
                continue;
            }
            out.push(Character {
                name: name.to_string(),
                role: caps[2].trim().to_string(),
            });
        }
        out.truncate(MAX_ITEMS);
        out
    }

    fn matching_sentences(&self, sentences: &[String], pattern: &Regex) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for sentence in sentences.iter().filter(|s| pattern.is_match(s)) {
            if !out.contains(sentence) {
                out.push(sentence.clone());
            }
        }
        out.truncate(MAX_ITEMS);
        out
    }
}

fn upsert_framework(out: &mut Vec<Framework>, name: String, components: Vec<String>) {
    match out.iter_mut().find(|f| f.name == name) {
        Some(existing) if existing.components.is_empty() => existing.components = components,
        Some(_) => {}
        None => out.push(Framework { name, components }),
    }
}

fn strip_articles(phrase: &str) -> &str {
    let mut rest = phrase.trim();
    while let Some((head, tail)) = rest.split_once(char::is_whitespace) {
        if ARTICLES.contains(&head) {
            rest = tail.trim_start();
        } else {
            break;
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPS_SOURCE: &str = "The CAPS model describes four communication styles: Controller, \
        Analyser, Promoter and Supporter. Each style reacts differently under pressure. \
        Maria, a new team lead, noticed that her Controller colleagues wanted brevity. \
        For example, a Controller prefers the bottom line first. \
        Avoid labelling people permanently because styles shift with context.\n\
        Flexing: adapting your own style to meet the other person's preference.\n\
        1. Observe the behaviour\n\
        2. Identify the likely style\n\
        3. Adapt your message";

    fn contains(haystack: &str, needle: &str) -> bool {
        haystack.contains(needle)
    }

    #[test]
    fn short_source_is_topic_derived() {
        let pool = ContentExtractor::new().extract(
            "Too short.",
            &["List the exits".to_string()],
            "Fire safety",
        );
        assert_eq!(pool.provenance, ContentProvenance::TopicDerived);
        assert!(pool.frameworks.is_empty());
        assert_eq!(pool.terminology[0].term, "Fire safety");
    }

    #[test]
    fn extracts_caps_framework_with_components() {
        let pool = ContentExtractor::new().extract(CAPS_SOURCE, &[], "Communication");
        assert_eq!(pool.provenance, ContentProvenance::Extracted);
        let caps = pool.primary_framework().expect("Framework extracted");
        assert_eq!(caps.name, "CAPS");
        assert_eq!(
            caps.components,
            vec!["Controller", "Analyser", "Promoter", "Supporter"]
        );
    }

    #[test]
    fn extracts_supporting_material() {
        let pool = ContentExtractor::new().extract(CAPS_SOURCE, &[], "Communication");
        assert_eq!(pool.characters.len(), 1);
        assert_eq!(pool.characters[0].name, "Maria");
        assert_eq!(pool.characters[0].role, "new team lead");
        assert_eq!(pool.examples.len(), 1);
        assert_eq!(pool.pitfalls.len(), 1);
        assert_eq!(pool.processes.len(), 3);
        assert!(pool.terminology.iter().any(|t| t.term == "Flexing"));
    }

    #[test]
    fn never_fabricates() {
        let pool = ContentExtractor::new().extract(CAPS_SOURCE, &[], "Communication");
        for f in &pool.frameworks {
            assert!(contains(CAPS_SOURCE, &f.name));
            for c in &f.components {
                assert!(contains(CAPS_SOURCE, c));
            }
        }
        for item in pool
            .techniques
            .iter()
            .chain(&pool.examples)
            .chain(&pool.processes)
            .chain(&pool.pitfalls)
        {
            assert!(contains(CAPS_SOURCE, item), "{item} not in source");
        }
        for t in &pool.terminology {
            assert!(contains(CAPS_SOURCE, &t.term));
            assert!(contains(CAPS_SOURCE, &t.definition));
        }
    }

    #[test]
    fn articles_are_stripped_from_names() {
        assert_eq!(strip_articles("The Situational Leadership"), "Situational Leadership");
        assert_eq!(strip_articles("GROW"), "GROW");
    }
}
