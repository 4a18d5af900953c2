//! Structural repair: every outcome gets the full canonical sequence.

use crate::SceneTemplates;
use std::collections::BTreeMap;
use storyboard_core::{InteractionType, Scene, SceneRole, SceneType};
use storyboard_pedagogy::materialize;
use tracing::{debug, info, instrument};

/// Interaction given to a placeholder so the inserted scene is usable as-is.
fn placeholder_interaction(scene_type: SceneType) -> Option<InteractionType> {
    match scene_type {
        SceneType::Apply => Some(InteractionType::Scenario),
        SceneType::Check => Some(InteractionType::KnowledgeCheck),
        SceneType::Reflect => Some(InteractionType::Reflection),
        _ => None,
    }
}

/// Return a new scene list in which every outcome has all five canonical
/// types, numbered 1..N.
///
/// Output order is the welcome block, each outcome's scenes in their
/// original order with placeholders inserted at the canonical position,
/// scenes not tied to a known outcome, then the summary. Existing scenes are
/// never dropped or reordered within their group.
#[instrument(skip_all, fields(scenes = scenes.len(), outcomes = outcomes.len()))]
pub fn repair_structure(
    scenes: Vec<Scene>,
    outcomes: &[String],
    templates: &SceneTemplates<'_>,
) -> Vec<Scene> {
    let mut welcome = Vec::new();
    let mut summary = Vec::new();
    let mut untagged = Vec::new();
    let mut groups: BTreeMap<usize, Vec<Scene>> = BTreeMap::new();

    for scene in scenes {
        match (scene.metadata.role, scene.metadata.outcome_index) {
            (SceneRole::Welcome, _) => welcome.push(scene),
            (SceneRole::Summary, _) => summary.push(scene),
            (SceneRole::Content, Some(i)) if i < outcomes.len() => {
                groups.entry(i).or_default().push(scene)
            }
            (SceneRole::Content, _) => untagged.push(scene),
        }
    }

    let mut inserted = 0usize;
    let mut repaired = welcome;
    for (index, outcome) in outcomes.iter().enumerate() {
        let mut group = groups.remove(&index).unwrap_or_default();
        for scene_type in SceneType::CANONICAL {
            if group.iter().any(|s| s.scene_type == scene_type) {
                continue;
            }
            let mut placeholder = templates.placeholder(scene_type, index, outcome);
            if let Some(interaction_type) = placeholder_interaction(scene_type) {
                placeholder.interaction = Some(materialize(&placeholder, interaction_type));
            }
            let at = insertion_point(&group, scene_type);
            debug!(outcome = index, %scene_type, position = at, "Inserting placeholder");
            group.insert(at, placeholder);
            inserted += 1;
        }
        repaired.extend(group);
    }
    repaired.extend(untagged);
    repaired.extend(summary);

    for (i, scene) in repaired.iter_mut().enumerate() {
        scene.number = i as u32 + 1;
    }
    if inserted > 0 {
        info!(inserted, "Inserted placeholder scenes");
    }
    repaired
}

/// Before the first scene whose canonical position is later than `scene_type`'s,
/// else at the end.
fn insertion_point(group: &[Scene], scene_type: SceneType) -> usize {
    let target = scene_type.canonical_position();
    group
        .iter()
        .position(|s| match (s.scene_type.canonical_position(), target) {
            (Some(existing), Some(wanted)) => existing > wanted,
            _ => false,
        })
        .unwrap_or(group.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_core::{ContentPool, LearningRequestBuilder, SceneMetadata, VisualBrief};

    fn scene(title: &str, scene_type: SceneType, role: SceneRole, outcome: Option<usize>) -> Scene {
        Scene {
            number: 99,
            title: title.to_string(),
            scene_type,
            narration: format!("{title} narration"),
            on_screen_text: title.to_string(),
            visual: VisualBrief::default(),
            interaction: None,
            duration_seconds: 30,
            metadata: SceneMetadata {
                outcome_index: outcome,
                role,
                ..Default::default()
            },
        }
    }

    #[test]
    fn missing_types_are_inserted_in_canonical_position() {
        let request = LearningRequestBuilder::default()
            .topic("Fire safety")
            .build()
            .expect("Valid request");
        let pool = ContentPool::default();
        let templates = SceneTemplates::new(&request, &pool, 140);
        let outcomes = vec!["Identify fire exits".to_string(), "Use an extinguisher".to_string()];

        let scenes = vec![
            scene("Summary", SceneType::Other, SceneRole::Summary, None),
            scene("Welcome", SceneType::Other, SceneRole::Welcome, None),
            scene("Teach 0", SceneType::Teach, SceneRole::Content, Some(0)),
            scene("Check 0", SceneType::Check, SceneRole::Content, Some(0)),
            scene("Stray", SceneType::Show, SceneRole::Content, Some(7)),
            scene("Reflect 1", SceneType::Reflect, SceneRole::Content, Some(1)),
        ];

        let repaired = repair_structure(scenes, &outcomes, &templates);
        let layout: Vec<(SceneType, Option<usize>, bool)> = repaired
            .iter()
            .map(|s| (s.scene_type, s.metadata.outcome_index, s.metadata.placeholder))
            .collect();

        assert_eq!(repaired.len(), 1 + 5 + 5 + 1 + 1);
        assert_eq!(repaired[0].title, "Welcome");
        assert_eq!(
            &layout[1..6],
            &[
                (SceneType::Teach, Some(0), false),
                (SceneType::Show, Some(0), true),
                (SceneType::Apply, Some(0), true),
                (SceneType::Check, Some(0), false),
                (SceneType::Reflect, Some(0), true),
            ]
        );
        assert_eq!(layout[10], (SceneType::Reflect, Some(1), false));
        assert_eq!(repaired[11].title, "Stray");
        assert_eq!(repaired[12].title, "Summary");

        let numbers: Vec<u32> = repaired.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=13).collect::<Vec<u32>>());

        let placeholder_check = repaired
            .iter()
            .find(|s| s.metadata.placeholder && s.scene_type == SceneType::Check)
            .expect("Outcome 1 gets a Check placeholder");
        assert!(placeholder_check.interaction.is_some());
    }
}
