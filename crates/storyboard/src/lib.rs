//! Storyboard - outcome-driven e-learning storyboard generation.
//!
//! Given a topic, an audience, learning outcomes and optional source
//! material, the pipeline produces a scene-by-scene storyboard: narration,
//! on-screen text, visual briefs and interactions, validated against a
//! weighted quality rubric and revised until it passes or the revision
//! budget runs out.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyboard::{ChatCompletionClient, Director, LearningRequestBuilder, StoryboardConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryboardConfig::load()?;
//!     let client = ChatCompletionClient::new(config.provider.clone())?;
//!     let director = Director::new(client, config);
//!
//!     let request = LearningRequestBuilder::default()
//!         .topic("Communicating with CAPS")
//!         .outcomes(vec!["Identify the four CAPS personality types".to_string()])
//!         .build()?;
//!
//!     let outcome = director.generate(&request).await?;
//!     println!("{} scenes, score {}", outcome.storyboard.scenes.len(), outcome.report.overall_score);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyboard_error` - Error types
//! - `storyboard_core` - Data model and tunable parameters
//! - `storyboard_interface` - `ContentProvider` trait
//! - `storyboard_analysis` - Outcome analysis and content extraction
//! - `storyboard_pedagogy` - Cognitive load, density, rules and interaction planning
//! - `storyboard_quality` - Weighted quality validation
//! - `storyboard_director` - The generation state machine
//! - `storyboard_models` - OpenAI-compatible chat completion provider
//!
//! This crate re-exports everything for convenience and ships the
//! `storyboard` binary.

pub use storyboard_analysis::*;
pub use storyboard_core::*;
pub use storyboard_director::*;
pub use storyboard_error::*;
pub use storyboard_interface::*;
pub use storyboard_models::*;
pub use storyboard_pedagogy::*;
pub use storyboard_quality::*;

pub mod telemetry;
