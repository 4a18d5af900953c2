//! Revising a storyboard that failed the quality gate.

use crate::prompts;
use crate::{WireScene, extract_json, scene_list};
use async_trait::async_trait;
use storyboard_core::{
    CompletionRequestBuilder, GenerationConfig, QualityReport, Scene, SceneRole, Storyboard, text,
};
use storyboard_error::{JsonError, JsonErrorKind, StoryboardResult};
use storyboard_interface::ContentProvider;
use tracing::{debug, instrument};

/// Produces a replacement scene list from a failed storyboard and its report.
///
/// Returned scenes need not be numbered or structurally complete; the
/// director repairs and renumbers them before validating again.
#[async_trait]
pub trait RevisionStrategy: Send + Sync {
    /// Revise the storyboard.
    ///
    /// # Errors
    ///
    /// Returns provider or parse errors; the director then keeps the best
    /// attempt so far.
    async fn revise(
        &self,
        provider: &dyn ContentProvider,
        storyboard: &Storyboard,
        report: &QualityReport,
        settings: &GenerationConfig,
    ) -> StoryboardResult<Vec<Scene>>;
}

/// Sends the whole storyboard plus itemized issues in one provider call and
/// parses the reply as a replacement scene list.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeStoryboardRevision;

#[async_trait]
impl RevisionStrategy for WholeStoryboardRevision {
    #[instrument(skip_all, fields(scenes = storyboard.scenes.len(), score = report.overall_score))]
    async fn revise(
        &self,
        provider: &dyn ContentProvider,
        storyboard: &Storyboard,
        report: &QualityReport,
        settings: &GenerationConfig,
    ) -> StoryboardResult<Vec<Scene>> {
        let request = CompletionRequestBuilder::default()
            .system_prompt(prompts::REVISION_SYSTEM_PROMPT)
            .user_prompt(prompts::revision_prompt(storyboard, report)?)
            .max_tokens(Some(settings.max_tokens.saturating_mul(4)))
            .temperature(Some(settings.temperature))
            .build()?;
        let response = provider.complete(&request).await?;
        let values = scene_list(extract_json(&response.text)?)?;

        let wires: Vec<WireScene> = values
            .into_iter()
            .filter_map(|v| WireScene::from_value(v).ok())
            .filter(WireScene::has_content)
            .collect();
        if wires.is_empty() {
            return Err(JsonError::new(JsonErrorKind::Shape(
                "revision returned no usable scenes".to_string(),
            ))
            .into());
        }

        let scenes = reattach(wires, storyboard, settings.words_per_minute);
        debug!(scenes = scenes.len(), "Parsed revised scenes");
        Ok(scenes)
    }
}

/// Convert revised wire scenes, restoring role and outcome links.
///
/// Role: declared, else the role of the earlier scene with the same title,
/// else content. Outcome: declared when in range, else the same-title
/// scene's, else the best keyword match, else the preceding scene's.
fn reattach(wires: Vec<WireScene>, previous: &Storyboard, words_per_minute: u32) -> Vec<Scene> {
    let outcome_keywords: Vec<_> = previous.outcomes.iter().map(|o| text::keywords(o)).collect();
    let mut scenes: Vec<Scene> = Vec::with_capacity(wires.len());

    for (i, wire) in wires.into_iter().enumerate() {
        let declared_role = wire.declared_role();
        let declared_outcome = wire
            .declared_outcome()
            .filter(|&o| o < previous.outcomes.len());
        let mut scene = wire.into_scene(i as u32 + 1, words_per_minute);
        let same_title = previous
            .scenes
            .iter()
            .find(|s| !scene.title.is_empty() && s.title.eq_ignore_ascii_case(&scene.title));

        scene.metadata.role = declared_role
            .or_else(|| same_title.map(|s| s.metadata.role))
            .unwrap_or(SceneRole::Content);

        scene.metadata.outcome_index = if scene.metadata.role == SceneRole::Content {
            declared_outcome
                .or_else(|| same_title.and_then(|s| s.metadata.outcome_index))
                .or_else(|| best_match(&outcome_keywords, &scene.full_text()))
                .or_else(|| scenes.last().and_then(|s| s.metadata.outcome_index))
        } else {
            None
        };
        scenes.push(scene);
    }
    scenes
}

fn best_match(
    outcome_keywords: &[std::collections::BTreeSet<String>],
    haystack: &str,
) -> Option<usize> {
    outcome_keywords
        .iter()
        .enumerate()
        .map(|(i, kw)| (i, text::keyword_overlap(kw, haystack)))
        .filter(|(_, overlap)| *overlap > 0.0)
        .fold(None, |best: Option<(usize, f64)>, (i, overlap)| match best {
            Some((_, top)) if top >= overlap => best,
            _ => Some((i, overlap)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storyboard_core::{GenerationSummary, ModuleCategory, SceneMetadata, SceneType, VisualBrief};

    fn previous() -> Storyboard {
        let scene = |title: &str, role: SceneRole, outcome: Option<usize>| Scene {
            number: 1,
            title: title.to_string(),
            scene_type: SceneType::Other,
            narration: String::new(),
            on_screen_text: String::new(),
            visual: VisualBrief::default(),
            interaction: None,
            duration_seconds: 30,
            metadata: SceneMetadata {
                outcome_index: outcome,
                role,
                ..Default::default()
            },
        };
        Storyboard {
            topic: "Fire safety".to_string(),
            audience: String::new(),
            duration_minutes: 10,
            category: ModuleCategory::Safety,
            outcomes: vec![
                "Identify fire exits".to_string(),
                "Operate an extinguisher".to_string(),
            ],
            scenes: vec![
                scene("Welcome aboard", SceneRole::Welcome, None),
                scene("Exits everywhere", SceneRole::Content, Some(0)),
            ],
            generation: GenerationSummary::default(),
        }
    }

    fn wire(value: serde_json::Value) -> WireScene {
        WireScene::from_value(value).expect("Scene object")
    }

    #[test]
    fn links_are_restored_in_order_of_preference() {
        let wires = vec![
            wire(json!({"title": "Welcome aboard", "narration": "Hello"})),
            wire(json!({"title": "New", "narration": "x", "metadata": {"outcomeIndex": 1}})),
            wire(json!({"title": "Exits everywhere", "narration": "Look around"})),
            wire(json!({"title": "Pulling the pin", "narration": "Operate the extinguisher safely"})),
            wire(json!({"title": "More", "narration": "Nothing matching"})),
            wire(json!({"title": "Bye", "narration": "Done", "role": "summary"})),
        ];
        let scenes = reattach(wires, &previous(), 140);

        let links: Vec<(SceneRole, Option<usize>)> = scenes
            .iter()
            .map(|s| (s.metadata.role, s.metadata.outcome_index))
            .collect();
        assert_eq!(
            links,
            vec![
                (SceneRole::Welcome, None),
                (SceneRole::Content, Some(1)),
                (SceneRole::Content, Some(0)),
                (SceneRole::Content, Some(1)),
                (SceneRole::Content, Some(1)),
                (SceneRole::Summary, None),
            ]
        );
    }

    #[test]
    fn ties_go_to_the_earlier_outcome() {
        let keywords = vec![text::keywords("Identify exits"), text::keywords("Report exits")];
        assert_eq!(best_match(&keywords, "exits"), Some(0));
        assert_eq!(best_match(&keywords, "unrelated"), None);
    }
}
