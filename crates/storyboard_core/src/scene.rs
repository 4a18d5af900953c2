//! Scenes and the interactions they carry.

use crate::InteractionType;
use serde::{Deserialize, Serialize};

/// The pedagogical function of a scene.
///
/// The first five variants are the canonical per-outcome sequence; `Other`
/// covers welcome, objectives and summary scenes.
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
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    /// Introduce and explain the concept
    #[display("teach")]
    Teach,
    /// Demonstrate it with an example
    #[display("show")]
    Show,
    /// Let the learner practise
    #[display("apply")]
    Apply,
    /// Check understanding
    #[display("check")]
    Check,
    /// Prompt reflection and transfer
    #[display("reflect")]
    Reflect,
    /// Any non-canonical scene
    #[display("other")]
    Other,
}

impl SceneType {
    /// Canonical per-outcome order.
    pub const CANONICAL: [SceneType; 5] = [
        Self::Teach,
        Self::Show,
        Self::Apply,
        Self::Check,
        Self::Reflect,
    ];

    /// Position in the canonical order, `None` for [`SceneType::Other`].
    pub fn canonical_position(self) -> Option<usize> {
        Self::CANONICAL.iter().position(|t| *t == self)
    }

    /// Lenient parse used at the provider boundary; unknown text becomes `Other`.
    pub fn coerce(value: &str) -> Self {
        let lower = value.trim().to_ascii_lowercase();
        let head = lower.split(|c: char| !c.is_alphabetic()).next().unwrap_or("");
        match head {
            "teach" | "teaching" | "explain" | "concept" | "introduce" => Self::Teach,
            "show" | "showing" | "demonstrate" | "demonstration" | "example" => Self::Show,
            "apply" | "application" | "practice" | "practise" | "scenario" => Self::Apply,
            "check" | "assess" | "assessment" | "quiz" | "knowledge" => Self::Check,
            "reflect" | "reflection" | "review" => Self::Reflect,
            _ => Self::Other,
        }
    }
}

/// Where a scene sits in the module outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneRole {
    /// Fixed opening block
    Welcome,
    /// Outcome-bearing content
    #[default]
    Content,
    /// Fixed closing recap
    Summary,
}

/// Derived facts about a scene, stamped by the phase that created it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMetadata {
    /// Index into the run's outcome list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_index: Option<usize>,
    /// Position in the module outline
    #[serde(default)]
    pub role: SceneRole,
    /// Inserted by structural repair
    #[serde(default)]
    pub placeholder: bool,
    /// Produced from a template after a provider or parse failure
    #[serde(default)]
    pub fallback: bool,
}

/// Art direction for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualBrief {
    /// Description for an illustrator or image model
    pub prompt: String,
    /// Accessible description of the visual
    pub alt_text: String,
}

/// The four interaction kinds a scene can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Multiple-choice question, including scenario questions
    #[display("quiz")]
    Quiz,
    /// Match items to categories or definitions
    #[display("drag_match")]
    DragMatch,
    /// Progressive reveal of content panels
    #[display("click_to_reveal")]
    ClickToReveal,
    /// Open reflective prompt
    #[display("reflection")]
    Reflection,
}

impl InteractionKind {
    /// Cognitive load when no prescription is recorded.
    pub fn default_load(self) -> u32 {
        match self {
            Self::Quiz | Self::DragMatch => 2,
            Self::ClickToReveal | Self::Reflection => 1,
        }
    }

    /// Lenient parse used at the provider boundary.
    pub fn coerce(value: &str) -> Option<Self> {
        let lower = value.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        if lower.is_empty() || lower == "none" {
            return None;
        }
        if lower.contains("drag") || lower.contains("match") || lower.contains("sort") {
            Some(Self::DragMatch)
        } else if lower.contains("reveal") || lower.contains("click") || lower.contains("hotspot")
        {
            Some(Self::ClickToReveal)
        } else if lower.contains("reflect") || lower.contains("journal") {
            Some(Self::Reflection)
        } else {
            Some(Self::Quiz)
        }
    }
}

/// One left/right pairing in a drag-match interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    /// Draggable item
    pub item: String,
    /// Drop target
    pub target: String,
}

/// An interaction attached to a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Interaction kind
    pub kind: InteractionKind,
    /// Prescription type this interaction was materialized from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescribed_as: Option<InteractionType>,
    /// Question, instruction or reflective prompt
    pub prompt: String,
    /// Answer options or reveal panel labels
    #[serde(default)]
    pub options: Vec<String>,
    /// Index into `options` of the correct answer (quizzes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
    /// Item/target pairs (drag-match only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pairs: Vec<MatchPair>,
    /// Learner-facing feedback
    #[serde(default)]
    pub feedback: String,
}

impl Interaction {
    /// Cognitive load this interaction imposes.
    pub fn load(&self) -> u32 {
        self.prescribed_as
            .map(InteractionType::cognitive_load)
            .unwrap_or_else(|| self.kind.default_load())
    }
}

/// One unit of storyboard content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// 1-based position in the storyboard
    pub number: u32,
    /// Scene title
    pub title: String,
    /// Pedagogical function
    pub scene_type: SceneType,
    /// Voice-over script
    pub narration: String,
    /// Text shown on screen, one bullet per line
    pub on_screen_text: String,
    /// Visual direction
    #[serde(default)]
    pub visual: VisualBrief,
    /// Optional interaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
    /// Estimated running time
    pub duration_seconds: u32,
    /// Derived metadata
    #[serde(default)]
    pub metadata: SceneMetadata,
}

impl Scene {
    /// Whether the scene belongs to the welcome block or summary.
    pub fn is_structural(&self) -> bool {
        self.metadata.role != SceneRole::Content
    }

    /// Whether the scene carries an interaction.
    pub fn is_interactive(&self) -> bool {
        self.interaction.is_some()
    }

    /// All learner-facing text, used for keyword matching.
    pub fn full_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.narration, self.on_screen_text)
    }

    /// On-screen text split into bullet lines.
    pub fn on_screen_lines(&self) -> Vec<String> {
        crate::text::bullet_lines(&self.on_screen_text)
    }
}
