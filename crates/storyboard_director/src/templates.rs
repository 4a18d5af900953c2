//! Deterministic scenes: the welcome block, the summary, and stand-ins for
//! scenes the provider could not deliver.

use crate::estimate_seconds;
use storyboard_core::{
    ContentPool, LearningRequest, Scene, SceneMetadata, SceneRole, SceneType, VisualBrief, text,
};

const WELCOME_SECONDS: u32 = 30;
const OBJECTIVES_SECONDS: u32 = 45;
const SUMMARY_SECONDS: u32 = 45;
/// Grounded items quoted in a stand-in scene.
const GROUNDED_ITEMS: usize = 3;

/// Builds template scenes for one run.
#[derive(Debug, Clone)]
pub struct SceneTemplates<'a> {
    topic: &'a str,
    audience: &'a str,
    duration_minutes: u32,
    pool: &'a ContentPool,
    words_per_minute: u32,
}

impl<'a> SceneTemplates<'a> {
    /// Templates for a request, quoting facts from `pool`.
    pub fn new(request: &'a LearningRequest, pool: &'a ContentPool, words_per_minute: u32) -> Self {
        Self {
            topic: request.topic(),
            audience: request.audience(),
            duration_minutes: *request.duration_minutes(),
            pool,
            words_per_minute,
        }
    }

    /// Opening scene of the welcome block.
    pub fn welcome(&self, number: u32) -> Scene {
        let audience = if self.audience.trim().is_empty() {
            String::new()
        } else {
            format!(" It is designed for {}.", self.audience.trim())
        };
        structural(
            number,
            format!("Welcome to {}", self.topic),
            format!(
                "Welcome to this module on {}.{} It takes about {} minutes and mixes short explanations with practice.",
                self.topic, audience, self.duration_minutes
            ),
            format!("- {}\n- About {} minutes", self.topic, self.duration_minutes),
            format!("Title card introducing {}", self.topic),
            SceneRole::Welcome,
            WELCOME_SECONDS,
        )
    }

    /// Objectives scene listing every outcome.
    pub fn objectives(&self, number: u32, outcomes: &[String]) -> Scene {
        let bullets = outcomes
            .iter()
            .map(|o| format!("- {o}"))
            .collect::<Vec<_>>()
            .join("\n");
        structural(
            number,
            "What you will learn".to_string(),
            format!(
                "By the end of this module you will be able to {}.",
                join_clauses(outcomes)
            ),
            bullets,
            "Checklist of learning objectives".to_string(),
            SceneRole::Welcome,
            OBJECTIVES_SECONDS,
        )
    }

    /// Closing recap.
    pub fn summary(&self, number: u32, outcomes: &[String]) -> Scene {
        let bullets = outcomes
            .iter()
            .map(|o| format!("- {}", subject_of(o)))
            .collect::<Vec<_>>()
            .join("\n");
        structural(
            number,
            "Summary".to_string(),
            format!(
                "You have reached the end of this module on {}. You can now {}. Take these ideas back to your own work.",
                self.topic,
                join_clauses(outcomes)
            ),
            bullets,
            "Recap board with the module's key points".to_string(),
            SceneRole::Summary,
            SUMMARY_SECONDS,
        )
    }

    /// Stand-in for a content scene the provider failed to produce.
    ///
    /// Narration and on-screen text are never empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::{ContentPool, LearningRequestBuilder, SceneType};
    /// use storyboard_director::SceneTemplates;
    ///
    /// let request = LearningRequestBuilder::default()
    ///     .topic("Fire safety")
    ///     .build()
    ///     .expect("Valid request");
    /// let pool = ContentPool::default();
    /// let templates = SceneTemplates::new(&request, &pool, 140);
    ///
    /// let scene = templates.fallback(7, SceneType::Check, 0, "Identify fire exits");
    /// assert!(scene.metadata.fallback);
    /// assert!(!scene.narration.is_empty());
    /// assert!(!scene.on_screen_text.is_empty());
    /// ```
    pub fn fallback(&self, number: u32, scene_type: SceneType, outcome_index: usize, outcome: &str) -> Scene {
        let mut scene = self.content(number, scene_type, outcome_index, outcome);
        scene.metadata.fallback = true;
        scene
    }

    /// Minimal scene inserted by structural repair.
    pub fn placeholder(&self, scene_type: SceneType, outcome_index: usize, outcome: &str) -> Scene {
        let mut scene = self.content(0, scene_type, outcome_index, outcome);
        scene.metadata.placeholder = true;
        scene
    }

    fn content(&self, number: u32, scene_type: SceneType, outcome_index: usize, outcome: &str) -> Scene {
        let subject = subject_of(outcome);
        let goal = lowercase_first(outcome.trim().trim_end_matches('.'));
        let facts: Vec<String> = self
            .pool
            .relevant_to(outcome, GROUNDED_ITEMS)
            .iter()
            .map(|item| strip_label(item).to_string())
            .collect();

        let (title, narration) = match scene_type {
            SceneType::Teach => (
                format!("Understanding {subject}"),
                format!(
                    "In this part we look at what it takes to {goal}. {}",
                    lead_fact(&facts, "Start with the core ideas shown on screen.")
                ),
            ),
            SceneType::Show => (
                format!("{} in practice", capitalize(&subject)),
                format!(
                    "Here is how this looks in a real situation. {}",
                    lead_fact(&facts, "Notice how each step on screen builds on the last.")
                ),
            ),
            SceneType::Apply => {
                let who = self
                    .pool
                    .characters
                    .first()
                    .map(|c| format!("{}, {},", c.name, c.role))
                    .unwrap_or_else(|| "A colleague".to_string());
                (
                    format!("Practising {subject}"),
                    format!("{who} needs to {goal}. Decide what they should do first."),
                )
            }
            SceneType::Check => (
                "Check your understanding".to_string(),
                format!("Let's check how well you can {goal}. Choose the best answer."),
            ),
            SceneType::Reflect => (
                format!("Reflecting on {subject}"),
                format!(
                    "Take a moment to think about when you will next need to {goal}, and what you will do differently."
                ),
            ),
            SceneType::Other => (
                capitalize(&subject),
                format!("This part of the module covers how to {goal}."),
            ),
        };

        let on_screen_text = if facts.is_empty() {
            format!("- {}\n- {}", capitalize(&subject), self.topic)
        } else {
            facts
                .iter()
                .map(|f| format!("- {}", text::truncate_words(f, 80)))
                .collect::<Vec<_>>()
                .join("\n")
        };

        Scene {
            number,
            title,
            scene_type,
            duration_seconds: estimate_seconds(&narration, self.words_per_minute),
            narration,
            on_screen_text,
            visual: VisualBrief {
                prompt: format!("Illustration for a {scene_type} scene about {subject}"),
                alt_text: format!("Illustration of {subject}"),
            },
            interaction: None,
            metadata: SceneMetadata {
                outcome_index: Some(outcome_index),
                role: SceneRole::Content,
                ..Default::default()
            },
        }
    }
}

fn structural(
    number: u32,
    title: String,
    narration: String,
    on_screen_text: String,
    visual: String,
    role: SceneRole,
    duration_seconds: u32,
) -> Scene {
    Scene {
        number,
        title,
        scene_type: SceneType::Other,
        narration,
        on_screen_text,
        visual: VisualBrief {
            alt_text: visual.clone(),
            prompt: visual,
        },
        interaction: None,
        duration_seconds,
        metadata: SceneMetadata {
            role,
            ..Default::default()
        },
    }
}

/// The outcome without its leading verb.
pub(crate) fn subject_of(outcome: &str) -> String {
    let trimmed = outcome.trim().trim_end_matches('.');
    trimmed
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim().to_string())
        .filter(|rest| !rest.is_empty())
        .unwrap_or_else(|| trimmed.to_string())
}

fn join_clauses(outcomes: &[String]) -> String {
    let clauses: Vec<String> = outcomes
        .iter()
        .map(|o| lowercase_first(o.trim().trim_end_matches('.')))
        .collect();
    match clauses.as_slice() {
        [] => "apply what you learn".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

fn lead_fact(facts: &[String], default: &str) -> String {
    facts
        .first()
        .map(|f| {
            let f = f.trim_end_matches('.');
            format!("{f}.")
        })
        .unwrap_or_else(|| default.to_string())
}

/// Drop the `Kind: ` label that pool display strings carry.
fn strip_label(item: &str) -> &str {
    item.split_once(": ").map(|(_, rest)| rest).unwrap_or(item)
}

fn lowercase_first(s: &str) -> String {
    if is_acronym(s) {
        return s.to_string();
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_acronym(s: &str) -> bool {
    s.split_whitespace()
        .next()
        .is_some_and(|w| w.len() > 1 && w.chars().all(|c| c.is_ascii_uppercase()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
