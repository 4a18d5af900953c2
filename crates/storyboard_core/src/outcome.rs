//! Outcome analysis results.

use crate::{SceneType, TaxonomyLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How important a scene-type requirement is for an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementPriority {
    /// Scene may be omitted
    Optional,
    /// Scene should be present
    Recommended,
    /// Scene must be present
    Required,
}

/// A scene type an outcome needs, and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRequirement {
    /// Scene type
    pub scene_type: SceneType,
    /// Importance
    pub priority: RequirementPriority,
    /// Number of scenes of this type
    pub count: u32,
}

/// Classification of one learning outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeAnalysis {
    /// Position in the run's outcome list
    pub index: usize,
    /// Outcome text
    pub outcome: String,
    /// Cognitive level
    pub taxonomy_level: TaxonomyLevel,
    /// Complexity from 1 (trivial) to 10 (demanding)
    pub complexity: u8,
    /// Indices of earlier outcomes this one builds on
    pub prerequisites: Vec<usize>,
    /// Scene types needed to cover the outcome
    pub scene_requirements: Vec<SceneRequirement>,
    /// Sum of requirement counts
    pub estimated_scenes: u32,
}

impl OutcomeAnalysis {
    /// Requested count for a scene type (0 when absent).
    pub fn required_count(&self, scene_type: SceneType) -> u32 {
        self.scene_requirements
            .iter()
            .filter(|r| r.scene_type == scene_type)
            .map(|r| r.count)
            .sum()
    }
}

/// All outcome analyses for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeMap {
    /// Analyses in outcome order
    pub analyses: Vec<OutcomeAnalysis>,
    /// Unique levels present, in canonical order
    pub taxonomy_progression: Vec<TaxonomyLevel>,
    /// Outcome index to prerequisite indices
    pub prerequisites: BTreeMap<usize, Vec<usize>>,
    /// Sum of estimated scenes
    pub total_estimated_scenes: u32,
}

impl OutcomeMap {
    /// Assemble the map and its derived fields from ordered analyses.
    pub fn from_analyses(analyses: Vec<OutcomeAnalysis>) -> Self {
        let mut taxonomy_progression: Vec<TaxonomyLevel> =
            analyses.iter().map(|a| a.taxonomy_level).collect();
        taxonomy_progression.sort();
        taxonomy_progression.dedup();

        let prerequisites = analyses
            .iter()
            .map(|a| (a.index, a.prerequisites.clone()))
            .collect();
        let total_estimated_scenes = analyses.iter().map(|a| a.estimated_scenes).sum();

        Self {
            analyses,
            taxonomy_progression,
            prerequisites,
            total_estimated_scenes,
        }
    }

    /// Analysis for an outcome index.
    pub fn get(&self, index: usize) -> Option<&OutcomeAnalysis> {
        self.analyses.iter().find(|a| a.index == index)
    }

    /// Taxonomy level for an outcome index.
    pub fn level_of(&self, index: usize) -> Option<TaxonomyLevel> {
        self.get(index).map(|a| a.taxonomy_level)
    }

    /// Outcome texts in order.
    pub fn outcomes(&self) -> Vec<String> {
        self.analyses.iter().map(|a| a.outcome.clone()).collect()
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    /// Whether there are no outcomes.
    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }
}
