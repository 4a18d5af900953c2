//! Quality report types.

use serde::{Deserialize, Serialize};

/// Score a storyboard must reach to pass the quality gate.
pub const PASS_THRESHOLD: u32 = 70;

/// The five weighted quality dimensions.
///
/// Variant order is the tie-break order when choosing a revision focus.
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
pub enum QualityDimension {
    /// Every outcome is taught, shown, practised, checked and reflected on
    #[display("outcome alignment")]
    OutcomeAlignment,
    /// Scene order, welcome block, duration and taxonomy progression
    #[display("pedagogical structure")]
    PedagogicalStructure,
    /// Use of the source's named framework
    #[display("framework integration")]
    FrameworkIntegration,
    /// Presence and well-formedness of interactions
    #[display("interactivity quality")]
    InteractivityQuality,
    /// Completeness of production fields
    #[display("production readiness")]
    ProductionReadiness,
}

impl QualityDimension {
    /// Weight of this dimension in the overall score. Weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            Self::OutcomeAlignment => 0.30,
            Self::PedagogicalStructure => 0.25,
            Self::FrameworkIntegration => 0.20,
            Self::InteractivityQuality => 0.15,
            Self::ProductionReadiness => 0.10,
        }
    }
}

/// Issue severity, ordered `Critical > High > Medium > Low`.
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
pub enum Severity {
    /// Cosmetic
    #[display("low")]
    Low,
    /// Noticeable
    #[display("medium")]
    Medium,
    /// Significant
    #[display("high")]
    High,
    /// Blocks acceptance on its own
    #[display("critical")]
    Critical,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIssue {
    /// Dimension that raised the issue
    pub dimension: QualityDimension,
    /// Severity
    pub severity: Severity,
    /// What is wrong
    pub message: String,
    /// Offending scene, when one can be named
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_number: Option<u32>,
    /// How to fix it
    pub recommendation: String,
}

/// Score for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    /// Dimension scored
    pub dimension: QualityDimension,
    /// Score from 0 to 100
    pub score: u32,
    /// Dimension weight
    pub weight: f64,
    /// `score * weight`
    pub weighted: f64,
    /// Issues found
    pub issues: Vec<QualityIssue>,
    /// Things done well
    pub strengths: Vec<String>,
}

impl DimensionScore {
    /// Score a dimension from 100 minus accumulated penalties, floored at zero.
    pub fn from_penalties(
        dimension: QualityDimension,
        penalty: u32,
        issues: Vec<QualityIssue>,
        strengths: Vec<String>,
    ) -> Self {
        let score = 100u32.saturating_sub(penalty);
        let weight = dimension.weight();
        Self {
            dimension,
            score,
            weight,
            weighted: f64::from(score) * weight,
            issues,
            strengths,
        }
    }
}

/// Estimated revision effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    /// A handful of fixes
    #[display("low")]
    Low,
    /// Several scenes need work
    #[display("medium")]
    Medium,
    /// Broad rework
    #[display("high")]
    High,
}

/// What to change when a storyboard fails the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionGuidance {
    /// Urgency, the worst severity that drove the failure
    pub priority: Severity,
    /// Concrete fixes, most severe first
    pub actions: Vec<String>,
    /// Dimensions to concentrate on, lowest score first
    pub focus_areas: Vec<QualityDimension>,
    /// Expected effort
    pub effort: Effort,
}

/// Result of validating one storyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    /// Weighted score from 0 to 100
    pub overall_score: u32,
    /// Letter grade
    pub grade: String,
    /// Whether the score meets [`PASS_THRESHOLD`]
    pub passed: bool,
    /// Per-dimension scores in dimension order
    pub dimensions: Vec<DimensionScore>,
    /// All issues, flattened
    pub issues: Vec<QualityIssue>,
    /// All strengths, flattened
    pub strengths: Vec<String>,
    /// Present only when the report failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<RevisionGuidance>,
}

impl QualityReport {
    /// Score for one dimension.
    pub fn dimension(&self, dimension: QualityDimension) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }

    /// Number of issues at a severity.
    pub fn count_at(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Letter grade for an overall score.
///
/// # Examples
///
/// ```
/// use storyboard_core::grade_for;
///
/// assert_eq!(grade_for(97), "A");
/// assert_eq!(grade_for(69), "D");
/// assert_eq!(grade_for(55), "F");
/// ```
pub fn grade_for(score: u32) -> &'static str {
    const BANDS: [(u32, &str); 10] = [
        (97, "A"),
        (93, "A-"),
        (90, "B+"),
        (87, "B"),
        (83, "B-"),
        (80, "C+"),
        (77, "C"),
        (73, "C-"),
        (70, "D+"),
        (63, "D"),
    ];
    BANDS
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or("F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = QualityDimension::iter().map(QualityDimension::weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grades_are_monotonic() {
        let rank = |g: &str| {
            [
                "F", "D", "D+", "C-", "C", "C+", "B-", "B", "B+", "A-", "A",
            ]
            .iter()
            .position(|x| *x == g)
            .expect("Known grade")
        };
        for score in 0..100 {
            assert!(rank(grade_for(score)) <= rank(grade_for(score + 1)));
        }
        assert_eq!(grade_for(100), "A");
        assert_eq!(grade_for(70), "D+");
        assert_eq!(grade_for(62), "F");
    }

    #[test]
    fn penalties_floor_at_zero() {
        let score = DimensionScore::from_penalties(
            QualityDimension::InteractivityQuality,
            140,
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(score.score, 0);
        assert_eq!(score.weighted, 0.0);
    }
}
