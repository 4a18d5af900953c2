//! Core data types for the Storyboard generation pipeline.
//!
//! This crate provides the data model shared by every stage of the pipeline:
//! the incoming [`LearningRequest`], per-outcome analysis, the extracted
//! [`ContentPool`], [`Scene`]s and their interactions, interaction
//! prescriptions, density profiles and the [`QualityReport`].
//!
//! Types here carry data and small pure helpers only. Pipeline behavior lives
//! in the analysis, pedagogy, quality and director crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod completion;
mod content;
mod density;
mod interaction;
mod outcome;
mod params;
mod quality;
mod request;
mod scene;
mod storyboard;
mod taxonomy;
pub mod text;

pub use completion::{CompletionRequest, CompletionRequestBuilder, CompletionResponse};
pub use content::{Character, ContentPool, ContentProvenance, Framework, Term};
pub use density::{DensityProfile, ModuleCategory};
pub use interaction::{
    InteractionDecision, InteractionPrescription, InteractionPurpose, InteractionType,
    PrescriptionPriority, TimingHint,
};
pub use outcome::{OutcomeAnalysis, OutcomeMap, RequirementPriority, SceneRequirement};
pub use params::{GenerationConfig, LoadConfig, ProviderConfig, RuleConfig};
pub use quality::{
    DimensionScore, Effort, QualityDimension, QualityIssue, QualityReport, RevisionGuidance,
    PASS_THRESHOLD, Severity, grade_for,
};
pub use request::{GenerationMode, LearningRequest, LearningRequestBuilder};
pub use scene::{
    Interaction, InteractionKind, MatchPair, Scene, SceneMetadata, SceneRole, SceneType,
    VisualBrief,
};
pub use storyboard::{GenerationSummary, Storyboard};
pub use taxonomy::TaxonomyLevel;
