//! Revision guidance for failed storyboards.

use storyboard_core::{DimensionScore, Effort, QualityIssue, RevisionGuidance, Severity};

const MAX_ACTIONS: usize = 10;

/// Turn scored dimensions and their issues into revision guidance.
///
/// Focus areas list every dimension below 100, lowest score first, ties in
/// dimension order. Actions are issue recommendations, most severe first,
/// deduplicated and capped at ten.
pub fn revision_guidance(dimensions: &[DimensionScore], issues: &[QualityIssue]) -> RevisionGuidance {
    let mut ranked: Vec<&DimensionScore> = dimensions.iter().collect();
    ranked.sort_by_key(|d| (d.score, d.dimension));
    let mut focus_areas: Vec<_> = ranked
        .iter()
        .filter(|d| d.score < 100)
        .map(|d| d.dimension)
        .collect();
    if focus_areas.is_empty() {
        focus_areas.extend(ranked.first().map(|d| d.dimension));
    }

    let high = issues.iter().filter(|i| i.severity == Severity::High).count();
    let priority = if issues.iter().any(|i| i.severity == Severity::Critical) {
        Severity::Critical
    } else if high >= 2 {
        Severity::High
    } else if !issues.is_empty() {
        Severity::Medium
    } else {
        Severity::Low
    };

    let effort = match issues.len() {
        0..=5 => Effort::Low,
        6..=15 => Effort::Medium,
        _ => Effort::High,
    };

    let mut by_severity: Vec<&QualityIssue> = issues.iter().collect();
    by_severity.sort_by(|a, b| b.severity.cmp(&a.severity));
    let mut actions: Vec<String> = Vec::new();
    for issue in by_severity {
        if actions.len() == MAX_ACTIONS {
            break;
        }
        if !actions.contains(&issue.recommendation) {
            actions.push(issue.recommendation.clone());
        }
    }

    RevisionGuidance {
        priority,
        actions,
        focus_areas,
        effort,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_core::QualityDimension;
    use strum::IntoEnumIterator;

    fn issue(dimension: QualityDimension, severity: Severity, recommendation: &str) -> QualityIssue {
        QualityIssue {
            dimension,
            severity,
            message: "problem".to_string(),
            scene_number: None,
            recommendation: recommendation.to_string(),
        }
    }

    fn scores(values: [u32; 5]) -> Vec<DimensionScore> {
        QualityDimension::iter()
            .zip(values)
            .map(|(d, v)| DimensionScore::from_penalties(d, 100 - v, Vec::new(), Vec::new()))
            .collect()
    }

    #[test]
    fn test_focus_is_lowest_dimension_with_ties_in_order() {
        let guidance = revision_guidance(&scores([80, 60, 100, 60, 90]), &[]);
        assert_eq!(
            guidance.focus_areas,
            vec![
                QualityDimension::PedagogicalStructure,
                QualityDimension::InteractivityQuality,
                QualityDimension::OutcomeAlignment,
                QualityDimension::ProductionReadiness,
            ]
        );
        assert_eq!(guidance.priority, Severity::Low);
        assert_eq!(guidance.effort, Effort::Low);
    }

    #[test]
    fn test_priority_ladder() {
        let d = QualityDimension::InteractivityQuality;
        let dims = scores([50; 5]);

        let one_high = [issue(d, Severity::High, "a")];
        assert_eq!(revision_guidance(&dims, &one_high).priority, Severity::Medium);

        let two_high = [issue(d, Severity::High, "a"), issue(d, Severity::High, "b")];
        assert_eq!(revision_guidance(&dims, &two_high).priority, Severity::High);

        let critical = [issue(d, Severity::Low, "a"), issue(d, Severity::Critical, "b")];
        assert_eq!(revision_guidance(&dims, &critical).priority, Severity::Critical);
    }

    #[test]
    fn test_actions_are_ordered_deduplicated_and_capped() {
        let d = QualityDimension::ProductionReadiness;
        let mut issues = vec![
            issue(d, Severity::Low, "alt text"),
            issue(d, Severity::Critical, "add interactions"),
            issue(d, Severity::Low, "alt text"),
        ];
        for i in 0..20 {
            issues.push(issue(d, Severity::Medium, &format!("fix {i}")));
        }
        let guidance = revision_guidance(&scores([40; 5]), &issues);
        assert_eq!(guidance.actions.len(), 10);
        assert_eq!(guidance.actions[0], "add interactions");
        assert!(!guidance.actions.contains(&"alt text".to_string()));
        assert_eq!(guidance.effort, Effort::High);
    }
}
