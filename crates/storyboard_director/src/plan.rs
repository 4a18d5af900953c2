//! Expanding outcomes into scene-generation jobs.

use storyboard_core::{GenerationMode, OutcomeMap, SceneType};
use tracing::debug;

/// Minimum Apply and Check scenes per outcome in upgrade mode.
const UPGRADE_MINIMUM: u32 = 2;

/// One scene the synthesis phase must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneJob {
    /// Outcome the scene serves
    pub outcome_index: usize,
    /// Canonical type to synthesize
    pub scene_type: SceneType,
    /// 1-based repetition of this type within the outcome
    pub ordinal: u32,
}

/// Ordered content jobs for a module. The welcome block and summary are
/// templated and bracket these jobs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModulePlan {
    /// Jobs in synthesis order
    pub jobs: Vec<SceneJob>,
}

impl ModulePlan {
    /// Plan every outcome in order, canonical types in canonical order.
    ///
    /// Standard mode yields exactly one job per canonical type. Upgrade mode
    /// repeats Apply and Check up to the larger of the outcome's requirement
    /// and two.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_analysis::{AnalysisContext, OutcomeAnalyzer};
    /// use storyboard_core::{GenerationMode, SceneType};
    /// use storyboard_director::ModulePlan;
    ///
    /// let outcomes = vec!["Identify the CAPS types".to_string()];
    /// let map = OutcomeAnalyzer::new().build_map(&outcomes, &AnalysisContext::new("CAPS", ""));
    ///
    /// let plan = ModulePlan::build(&map, GenerationMode::Standard);
    /// let types: Vec<SceneType> = plan.jobs.iter().map(|j| j.scene_type).collect();
    /// assert_eq!(types, SceneType::CANONICAL);
    /// ```
    pub fn build(outcomes: &OutcomeMap, mode: GenerationMode) -> Self {
        let mut jobs = Vec::new();
        for analysis in &outcomes.analyses {
            for scene_type in SceneType::CANONICAL {
                let count = match (mode, scene_type) {
                    (GenerationMode::Upgrade, SceneType::Apply | SceneType::Check) => {
                        analysis.required_count(scene_type).max(UPGRADE_MINIMUM)
                    }
                    _ => 1,
                };
                jobs.extend((1..=count).map(|ordinal| SceneJob {
                    outcome_index: analysis.index,
                    scene_type,
                    ordinal,
                }));
            }
        }
        debug!(jobs = jobs.len(), ?mode, "Planned scene jobs");
        Self { jobs }
    }

    /// Number of content jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether there is nothing to synthesize.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
