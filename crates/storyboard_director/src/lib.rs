//! Storyboard generation director.
//!
//! The [`Director`] runs a [`LearningRequest`](storyboard_core::LearningRequest)
//! through a fixed sequence of phases:
//!
//! 1. **Analyze** outcomes and extract grounded content (in parallel)
//! 2. **Plan** five canonical scene jobs per outcome between a templated welcome block and summary
//! 3. **Synthesize** each scene through a [`ContentProvider`](storyboard_interface::ContentProvider),
//!    falling back to templates on any provider or parse failure
//! 4. **Prescribe** interactions under the cognitive load budget
//! 5. **Repair** missing canonical scenes and renumber
//! 6. **Validate** against the quality gate
//! 7. **Revise** up to three times, keeping the best attempt
//!
//! Provider output is routed through [`extract_json`] and mapped onto
//! canonical scenes once, in [`WireScene`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod director;
mod extraction;
mod plan;
mod prompts;
mod repair;
mod revision;
mod synthesis;
mod templates;
mod wire;

pub use config::StoryboardConfig;
pub use director::{
    Director, GenerationOutcome, MAX_REVISION_ATTEMPTS, MIN_INFERRED_OUTCOMES, Phase,
};
pub use extraction::{extract_json, scene_list, single_scene};
pub use plan::{ModulePlan, SceneJob};
pub use prompts::{REVISION_SYSTEM_PROMPT, SCENE_SYSTEM_PROMPT};
pub use repair::repair_structure;
pub use revision::{RevisionStrategy, WholeStoryboardRevision};
pub use synthesis::{
    ApplySynthesizer, CheckSynthesizer, ReflectSynthesizer, SceneContext, SceneSynthesizer,
    ShowSynthesizer, TeachSynthesizer, synthesize_scene, synthesizer_for,
};
pub use templates::SceneTemplates;
pub use wire::{MAX_SCENE_SECONDS, WireScene, estimate_seconds};
