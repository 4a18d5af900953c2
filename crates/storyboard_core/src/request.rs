//! The learning request that drives one generation run.

use crate::{InteractionType, ModuleCategory};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storyboard_error::BuilderError;

/// Generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// One scene of each canonical type per outcome
    #[default]
    Standard,
    /// Extra practice and assessment: at least two Apply and two Check scenes per outcome
    Upgrade,
}

/// Immutable input for one generation run.
///
/// # Examples
///
/// ```
/// use storyboard_core::LearningRequestBuilder;
///
/// let request = LearningRequestBuilder::default()
///     .topic("Workplace communication")
///     .audience("New team leads")
///     .duration_minutes(20u32)
///     .outcomes(vec!["Identify the four CAPS types".to_string()])
///     .build()
///     .expect("Valid request");
///
/// assert_eq!(request.topic(), "Workplace communication");
/// assert!(request.source_text().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(
    setter(into),
    build_fn(validate = "Self::validate", error = "storyboard_error::BuilderError")
)]
#[serde(rename_all = "camelCase")]
pub struct LearningRequest {
    /// Module topic
    topic: String,
    /// Target audience description
    #[builder(default)]
    #[serde(default)]
    audience: String,
    /// Target running time
    #[builder(default = "15")]
    #[serde(default = "default_duration")]
    duration_minutes: u32,
    /// Learning outcomes, possibly empty
    #[builder(default)]
    #[serde(default)]
    outcomes: Vec<String>,
    /// Source material, possibly empty
    #[builder(default)]
    #[serde(default)]
    source_text: String,
    /// Explicit module category
    #[builder(default)]
    #[serde(default)]
    category_hint: Option<ModuleCategory>,
    /// Requested number of interactions per type
    #[builder(default)]
    #[serde(default)]
    interaction_distribution: Option<BTreeMap<InteractionType, usize>>,
    /// Upper bound on total interactions
    #[builder(default)]
    #[serde(default)]
    max_interactions: Option<usize>,
    /// Generation mode
    #[builder(default)]
    #[serde(default)]
    mode: GenerationMode,
}

fn default_duration() -> u32 {
    15
}

impl LearningRequestBuilder {
    fn validate(&self) -> Result<(), BuilderError> {
        if self.topic.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BuilderError::invalid("topic", "must not be blank"));
        }
        if self.duration_minutes == Some(0) {
            return Err(BuilderError::invalid("duration_minutes", "must be at least one minute"));
        }
        Ok(())
    }
}

impl LearningRequest {
    /// Outcomes with blank entries removed and whitespace trimmed.
    pub fn usable_outcomes(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Copy of the request with a different mode.
    pub fn with_mode(&self, mode: GenerationMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_error::{BuilderErrorKind, StoryboardError, StoryboardErrorKind};

    #[test]
    fn deserializes_with_defaults() {
        let request: LearningRequest =
            serde_json::from_str(r#"{"topic":"Fire safety","outcomes":["  ","List exits"]}"#)
                .expect("Valid request JSON");
        assert_eq!(*request.duration_minutes(), 15);
        assert_eq!(*request.mode(), GenerationMode::Standard);
        assert_eq!(request.usable_outcomes(), vec!["List exits".to_string()]);
    }

    #[test]
    fn builder_reports_missing_and_invalid_fields() {
        let missing = LearningRequestBuilder::default()
            .audience("Office staff")
            .build()
            .expect_err("Topic is required");
        assert_eq!(missing.kind(), &BuilderErrorKind::MissingField("topic"));

        let blank = LearningRequestBuilder::default()
            .topic("   ")
            .build()
            .expect_err("Blank topic");
        assert!(matches!(blank.kind(), BuilderErrorKind::InvalidField { field: "topic", .. }));

        let zero = LearningRequestBuilder::default()
            .topic("Fire safety")
            .duration_minutes(0u32)
            .build()
            .expect_err("Zero duration");
        let err: StoryboardError = zero.into();
        assert!(matches!(err.kind(), StoryboardErrorKind::Builder(_)));
        assert!(!err.is_fatal_configuration());
    }

    #[test]
    fn distribution_keys_use_snake_case() {
        let request: LearningRequest = serde_json::from_str(
            r#"{"topic":"T","interactionDistribution":{"knowledge_check":2,"reflection":1}}"#,
        )
        .expect("Valid request JSON");
        let dist = request
            .interaction_distribution()
            .as_ref()
            .expect("Distribution present");
        assert_eq!(dist.get(&InteractionType::KnowledgeCheck), Some(&2));
    }
}
