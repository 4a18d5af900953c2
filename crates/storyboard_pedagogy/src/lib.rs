//! Pedagogy stage of the Storyboard pipeline.
//!
//! Decides where interactions go and which kind they are:
//!
//! - [`CognitiveLoadProtector`] scores scenes and guards a sliding-window load budget
//! - [`DensityManager`] infers the module category and checks interaction density
//! - [`RuleEngine`] evaluates prioritized pedagogical rules for one scene
//! - [`InteractivityOrchestrator`] combines the three into one decision per scene
//!   and materializes the decisions onto scenes

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod density;
mod load;
mod materialize;
mod orchestrator;
mod rules;

pub use density::{DensityManager, DensityReport};
pub use load::{AdditionCheck, CognitiveLoadProtector, CumulativeLoad};
pub use materialize::{apply_prescriptions, materialize};
pub use orchestrator::InteractivityOrchestrator;
pub use rules::{DensityProgress, Rule, RuleContext, RuleEngine, RuleEvaluation, RuleRecommendation};
