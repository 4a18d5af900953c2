//! The assembled storyboard.

use crate::{ContentProvenance, ModuleCategory, Scene, SceneRole, SceneType};
use serde::{Deserialize, Serialize};

/// How the storyboard was produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    /// Number of validated attempts, the initial one included
    pub attempts: u32,
    /// Number of revision calls made
    pub revisions: u32,
    /// 1-based attempt that was returned
    pub best_attempt: u32,
    /// Whether scenes were grounded in source text
    pub provenance: ContentProvenance,
}

/// An ordered scene sequence plus module-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    /// Module topic
    pub topic: String,
    /// Target audience
    pub audience: String,
    /// Target running time
    pub duration_minutes: u32,
    /// Inferred or requested category
    pub category: ModuleCategory,
    /// Outcomes the scenes address
    pub outcomes: Vec<String>,
    /// Scenes, numbered 1..N
    pub scenes: Vec<Scene>,
    /// Generation bookkeeping
    #[serde(default)]
    pub generation: GenerationSummary,
}

impl Storyboard {
    /// Total running time of all scenes in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.scenes
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.duration_seconds))
    }

    /// Content scenes attached to an outcome.
    pub fn scenes_for(&self, outcome_index: usize) -> impl Iterator<Item = &Scene> {
        self.scenes
            .iter()
            .filter(move |s| s.metadata.outcome_index == Some(outcome_index))
    }

    /// Scenes that are neither welcome nor summary.
    pub fn content_scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes
            .iter()
            .filter(|s| s.metadata.role == SceneRole::Content)
    }

    /// Whether numbers run 1..N without gaps.
    pub fn is_contiguous(&self) -> bool {
        self.scenes
            .iter()
            .enumerate()
            .all(|(i, s)| s.number as usize == i + 1)
    }

    /// Count of scenes of one type.
    pub fn count_of(&self, scene_type: SceneType) -> usize {
        self.scenes
            .iter()
            .filter(|s| s.scene_type == scene_type)
            .count()
    }
}
