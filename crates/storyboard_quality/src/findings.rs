//! Penalty accumulator for one dimension.

use storyboard_core::{DimensionScore, QualityDimension, QualityIssue, Severity};

#[derive(Debug)]
pub(crate) struct Findings {
    dimension: QualityDimension,
    penalty: u32,
    issues: Vec<QualityIssue>,
    strengths: Vec<String>,
}

impl Findings {
    pub(crate) fn new(dimension: QualityDimension) -> Self {
        Self {
            dimension,
            penalty: 0,
            issues: Vec::new(),
            strengths: Vec::new(),
        }
    }

    /// Record an issue and its penalty.
    pub(crate) fn flag(
        &mut self,
        severity: Severity,
        penalty: u32,
        scene_number: Option<u32>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) {
        self.penalty += penalty;
        self.issues.push(QualityIssue {
            dimension: self.dimension,
            severity,
            message: message.into(),
            scene_number,
            recommendation: recommendation.into(),
        });
    }

    pub(crate) fn strength(&mut self, strength: impl Into<String>) {
        self.strengths.push(strength.into());
    }

    pub(crate) fn has_issues_at(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity == severity)
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn finish(self) -> DimensionScore {
        DimensionScore::from_penalties(self.dimension, self.penalty, self.issues, self.strengths)
    }
}
