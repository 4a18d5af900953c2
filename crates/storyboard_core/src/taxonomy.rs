//! Cognitive taxonomy levels.

use serde::{Deserialize, Serialize};

/// One of six ordered cognitive levels used to classify outcomes and scenes.
///
/// Ordering follows the canonical progression, so `Remember < Create`.
///
/// # Examples
///
/// ```
/// use storyboard_core::TaxonomyLevel;
///
/// assert!(TaxonomyLevel::Remember < TaxonomyLevel::Analyze);
/// assert_eq!(TaxonomyLevel::coerce("EVALUATE"), TaxonomyLevel::Evaluate);
/// assert_eq!(TaxonomyLevel::coerce("something else"), TaxonomyLevel::Understand);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Default,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyLevel {
    /// Recall facts and basic concepts
    #[display("remember")]
    Remember,
    /// Explain ideas or concepts
    #[default]
    #[display("understand")]
    Understand,
    /// Use information in new situations
    #[display("apply")]
    Apply,
    /// Draw connections among ideas
    #[display("analyze")]
    Analyze,
    /// Justify a stand or decision
    #[display("evaluate")]
    Evaluate,
    /// Produce new or original work
    #[display("create")]
    Create,
}

impl TaxonomyLevel {
    /// All levels in canonical order.
    pub const ALL: [TaxonomyLevel; 6] = [
        Self::Remember,
        Self::Understand,
        Self::Apply,
        Self::Analyze,
        Self::Evaluate,
        Self::Create,
    ];

    /// Zero-based position in the canonical order.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Map arbitrary text onto a level.
    ///
    /// Accepts level names in either spelling, their 1-based position, and
    /// common adjective forms. Anything unrecognized becomes [`Self::Understand`].
    pub fn coerce(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "remember" | "remembering" | "knowledge" | "recall" | "1" => Self::Remember,
            "understand" | "understanding" | "comprehension" | "2" => Self::Understand,
            "apply" | "applying" | "application" | "3" => Self::Apply,
            "analyze" | "analyse" | "analyzing" | "analysing" | "analysis" | "4" => Self::Analyze,
            "evaluate" | "evaluating" | "evaluation" | "5" => Self::Evaluate,
            "create" | "creating" | "synthesis" | "6" => Self::Create,
            _ => Self::default(),
        }
    }
}
