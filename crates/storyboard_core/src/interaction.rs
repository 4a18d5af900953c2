//! Interaction prescription vocabulary.

use crate::InteractionKind;
use serde::{Deserialize, Serialize};

/// Interaction types the rule engine can prescribe.
///
/// Variant order is the deterministic iteration order used by the
/// distribution pass, so it must stay stable.
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
pub enum InteractionType {
    /// Multiple-choice knowledge check
    #[display("knowledge_check")]
    KnowledgeCheck,
    /// Single-decision scenario question
    #[display("scenario")]
    Scenario,
    /// Multi-step branching scenario
    #[display("branching_scenario")]
    BranchingScenario,
    /// Software or procedure simulation
    #[display("simulation")]
    Simulation,
    /// Drag items onto matching targets
    #[display("drag_match")]
    DragMatch,
    /// Progressive reveal
    #[display("click_to_reveal")]
    ClickToReveal,
    /// Reflective prompt
    #[display("reflection")]
    Reflection,
}

impl InteractionType {
    /// Cognitive load imposed by this interaction type.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::InteractionType;
    ///
    /// assert_eq!(InteractionType::Reflection.cognitive_load(), 1);
    /// assert_eq!(InteractionType::Simulation.cognitive_load(), 4);
    /// ```
    pub fn cognitive_load(self) -> u32 {
        match self {
            Self::Reflection | Self::ClickToReveal => 1,
            Self::KnowledgeCheck | Self::DragMatch => 2,
            Self::Scenario | Self::BranchingScenario => 3,
            Self::Simulation => 4,
        }
    }

    /// Typical learner time spent on the interaction.
    pub fn duration_seconds(self) -> u32 {
        match self {
            Self::ClickToReveal | Self::KnowledgeCheck => 45,
            Self::Reflection | Self::DragMatch => 60,
            Self::Scenario => 90,
            Self::BranchingScenario => 120,
            Self::Simulation => 180,
        }
    }

    /// The scene interaction kind this type materializes as.
    pub fn kind(self) -> InteractionKind {
        match self {
            Self::Reflection => InteractionKind::Reflection,
            Self::ClickToReveal => InteractionKind::ClickToReveal,
            Self::DragMatch => InteractionKind::DragMatch,
            Self::KnowledgeCheck | Self::Scenario | Self::BranchingScenario | Self::Simulation => {
                InteractionKind::Quiz
            }
        }
    }

    /// One-step simpler alternative used when the load budget is exceeded.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::InteractionType;
    ///
    /// assert_eq!(
    ///     InteractionType::BranchingScenario.simpler(),
    ///     Some(InteractionType::Scenario)
    /// );
    /// assert_eq!(InteractionType::Reflection.simpler(), None);
    /// ```
    pub fn simpler(self) -> Option<Self> {
        match self {
            Self::BranchingScenario | Self::Simulation => Some(Self::Scenario),
            Self::Scenario | Self::DragMatch => Some(Self::KnowledgeCheck),
            Self::KnowledgeCheck => Some(Self::ClickToReveal),
            Self::ClickToReveal => Some(Self::Reflection),
            Self::Reflection => None,
        }
    }

    /// Nearest type down the [`simpler`](Self::simpler) chain whose load is
    /// strictly lower, or `None` when nothing lighter exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::InteractionType;
    ///
    /// assert_eq!(
    ///     InteractionType::BranchingScenario.lighter(),
    ///     Some(InteractionType::KnowledgeCheck)
    /// );
    /// assert_eq!(InteractionType::ClickToReveal.lighter(), None);
    /// ```
    pub fn lighter(self) -> Option<Self> {
        let mut current = self.simpler();
        while let Some(candidate) = current {
            if candidate.cognitive_load() < self.cognitive_load() {
                return Some(candidate);
            }
            current = candidate.simpler();
        }
        None
    }

    /// Whether this type counts as a scenario for density purposes.
    pub fn is_scenario(self) -> bool {
        matches!(
            self,
            Self::Scenario | Self::BranchingScenario | Self::Simulation
        )
    }
}

/// Why an interaction is placed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum InteractionPurpose {
    /// Verify the outcome was met
    #[display("assessment")]
    Assessment,
    /// Rehearse a skill
    #[display("practice")]
    Practice,
    /// Consolidate memory after a long passive stretch
    #[display("retention")]
    Retention,
    /// Re-engage attention
    #[display("engagement")]
    Engagement,
    /// Let learners explore an example
    #[display("exploration")]
    Exploration,
    /// Break dense content into chunks
    #[display("chunking")]
    Chunking,
    /// Sort concepts into categories
    #[display("categorisation")]
    Categorisation,
    /// Think about one's own learning
    #[display("metacognition")]
    Metacognition,
    /// Added to satisfy a requested distribution
    #[display("distribution")]
    Distribution,
}

/// When, relative to the scene content, the interaction should appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingHint {
    /// Before the narration starts
    BeforeContent,
    /// Interleaved with the content
    DuringContent,
    /// After the narration ends
    AfterContent,
}

/// How strongly an interaction is prescribed.
///
/// Ordered so that `Required > Recommended > Optional`.
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
)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionPriority {
    /// Nice to have
    #[display("optional")]
    Optional,
    /// Should be present
    #[display("recommended")]
    Recommended,
    /// Must be present
    #[display("required")]
    Required,
}

/// The orchestrator's decision to add an interaction to a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionPrescription {
    /// Always true for an emitted prescription
    pub needed: bool,
    /// Interaction type to add
    pub interaction_type: InteractionType,
    /// Pedagogical purpose
    pub purpose: InteractionPurpose,
    /// Human-readable justification
    pub rationale: String,
    /// Placement relative to the content
    pub timing: TimingHint,
    /// Estimated cognitive load
    pub cognitive_load: u32,
    /// Estimated learner time
    pub duration_seconds: u32,
    /// Strength of the prescription
    pub priority: PrescriptionPriority,
}

/// Per-scene outcome of the interactivity orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDecision {
    /// Scene the decision applies to
    pub scene_number: u32,
    /// `None` means no interaction
    pub prescription: Option<InteractionPrescription>,
    /// Confidence in the decision (0.0–1.0)
    pub confidence: f64,
    /// Ids of every rule that matched
    pub applicable_rules: Vec<String>,
    /// Interaction types recommended by lower-priority rules
    pub alternatives: Vec<InteractionType>,
    /// Why the decision was made
    pub reason: String,
}

impl InteractionDecision {
    /// Decision that adds nothing.
    pub fn none(scene_number: u32, reason: impl Into<String>) -> Self {
        Self {
            scene_number,
            prescription: None,
            confidence: 0.0,
            applicable_rules: Vec::new(),
            alternatives: Vec::new(),
            reason: reason.into(),
        }
    }

    /// Prescribed interaction type, if any.
    pub fn interaction_type(&self) -> Option<InteractionType> {
        self.prescription.as_ref().map(|p| p.interaction_type)
    }
}
