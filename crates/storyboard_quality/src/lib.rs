//! Quality gate for generated storyboards.
//!
//! The [`QualityValidator`] scores a storyboard on five weighted dimensions,
//! collects issues and strengths, assigns a letter grade and, when the
//! storyboard fails, produces [`RevisionGuidance`](storyboard_core::RevisionGuidance)
//! for the next revision.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dimensions;
mod findings;
mod gate;
mod guidance;
mod validator;

pub use gate::QualityGate;
pub use guidance::revision_guidance;
pub use validator::QualityValidator;
