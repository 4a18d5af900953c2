//! Acceptance gate seam used by the director.

use crate::QualityValidator;
use storyboard_core::{QualityReport, Storyboard};

/// Anything that can score a storyboard and decide whether it is accepted.
///
/// [`QualityValidator`] is the production gate.
pub trait QualityGate: Send + Sync {
    /// Score a storyboard against outcomes and an optional framework name.
    fn assess(&self, storyboard: &Storyboard, outcomes: &[String], framework: Option<&str>) -> QualityReport;
}

impl QualityGate for QualityValidator {
    fn assess(&self, storyboard: &Storyboard, outcomes: &[String], framework: Option<&str>) -> QualityReport {
        self.validate(storyboard, outcomes, framework)
    }
}
