//! The weighted quality gate.

use crate::{dimensions, revision_guidance};
use storyboard_core::{PASS_THRESHOLD, QualityReport, Storyboard, grade_for};
use tracing::{debug, info, instrument};

/// Scores storyboards against outcomes and an optional named framework.
///
/// Validation is pure: the same storyboard always yields the same report.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityValidator;

impl QualityValidator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Score a storyboard.
    ///
    /// `outcomes` are the outcomes the storyboard must address; when empty,
    /// the storyboard's own outcome list is used. `framework` names a model
    /// or framework from the source material that scenes should use.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::{ModuleCategory, Severity, Storyboard};
    /// use storyboard_quality::QualityValidator;
    ///
    /// let empty = Storyboard {
    ///     topic: "Fire safety".into(),
    ///     audience: "Staff".into(),
    ///     duration_minutes: 10,
    ///     category: ModuleCategory::Safety,
    ///     outcomes: vec!["Identify fire exits".into()],
    ///     scenes: Vec::new(),
    ///     generation: Default::default(),
    /// };
    /// let report = QualityValidator::new().validate(&empty, &[], None);
    /// assert_eq!(report.dimensions.len(), 5);
    /// // Unaddressed outcome and no interactions.
    /// assert_eq!(report.count_at(Severity::Critical), 2);
    /// ```
    #[instrument(
        skip_all,
        fields(
            topic = %storyboard.topic,
            scenes = storyboard.scenes.len(),
            framework = framework.unwrap_or("")
        )
    )]
    pub fn validate(
        &self,
        storyboard: &Storyboard,
        outcomes: &[String],
        framework: Option<&str>,
    ) -> QualityReport {
        let outcomes = if outcomes.is_empty() {
            storyboard.outcomes.as_slice()
        } else {
            outcomes
        };

        let dimensions = vec![
            dimensions::outcome_alignment(storyboard, outcomes),
            dimensions::pedagogical_structure(storyboard, outcomes),
            dimensions::framework_integration(storyboard, framework),
            dimensions::interactivity_quality(storyboard),
            dimensions::production_readiness(storyboard),
        ];
        for d in &dimensions {
            debug!(dimension = %d.dimension, score = d.score, issues = d.issues.len(), "Dimension scored");
        }

        let total: f64 = dimensions.iter().map(|d| d.weighted).sum();
        let overall_score = (total.round().max(0.0) as u32).min(100);
        let passed = overall_score >= PASS_THRESHOLD;
        let issues: Vec<_> = dimensions.iter().flat_map(|d| d.issues.clone()).collect();
        let strengths: Vec<_> = dimensions
            .iter()
            .flat_map(|d| d.strengths.clone())
            .collect();
        let revision = (!passed).then(|| revision_guidance(&dimensions, &issues));

        info!(
            overall_score,
            grade = grade_for(overall_score),
            passed,
            issues = issues.len(),
            "Storyboard validated"
        );

        QualityReport {
            overall_score,
            grade: grade_for(overall_score).to_string(),
            passed,
            dimensions,
            issues,
            strengths,
            revision,
        }
    }
}
