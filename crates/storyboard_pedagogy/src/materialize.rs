//! Turning interaction decisions into concrete scene interactions.

use std::collections::BTreeMap;
use storyboard_core::{
    Interaction, InteractionDecision, InteractionKind, InteractionType, MatchPair, Scene, text,
};
use tracing::{debug, instrument};

const MAX_REVEAL_PANELS: usize = 6;
const MAX_MATCH_PAIRS: usize = 5;

/// Return a new scene list whose interactions equal the decisions.
///
/// Scenes without a prescription lose any synthesized interaction. Scenes
/// whose synthesized interaction already has the prescribed kind keep it,
/// stamped with the prescribed type; others receive one built from the scene
/// text. Scenes without a matching decision are copied unchanged.
#[instrument(skip_all, fields(scenes = scenes.len(), decisions = decisions.len()))]
pub fn apply_prescriptions(scenes: &[Scene], decisions: &[InteractionDecision]) -> Vec<Scene> {
    let by_number: BTreeMap<u32, &InteractionDecision> =
        decisions.iter().map(|d| (d.scene_number, d)).collect();

    scenes
        .iter()
        .map(|scene| {
            let mut next = scene.clone();
            let Some(decision) = by_number.get(&scene.number) else {
                return next;
            };
            next.interaction = match decision.interaction_type() {
                None => None,
                Some(t) => match &scene.interaction {
                    Some(existing)
                        if existing.kind == t.kind() && !existing.prompt.trim().is_empty() =>
                    {
                        let mut kept = existing.clone();
                        kept.prescribed_as = Some(t);
                        Some(kept)
                    }
                    _ => {
                        debug!(scene = scene.number, interaction = %t, "Materializing interaction");
                        Some(materialize(scene, t))
                    }
                },
            };
            next
        })
        .collect()
}

/// Build an interaction of the given type from a scene's own text.
///
/// # Examples
///
/// ```
/// use storyboard_core::{InteractionKind, InteractionType, Scene, SceneMetadata, SceneType, VisualBrief};
/// use storyboard_pedagogy::materialize;
///
/// let scene = Scene {
///     number: 5,
///     title: "Checking the CAPS types".into(),
///     scene_type: SceneType::Check,
///     narration: "Controllers want results fast.".into(),
///     on_screen_text: "- Controllers want results\n- Supporters value harmony".into(),
///     visual: VisualBrief::default(),
///     interaction: None,
///     duration_seconds: 60,
///     metadata: SceneMetadata::default(),
/// };
/// let quiz = materialize(&scene, InteractionType::KnowledgeCheck);
/// assert_eq!(quiz.kind, InteractionKind::Quiz);
/// assert_eq!(quiz.options.len(), 3);
/// assert_eq!(quiz.correct_option, Some(2));
/// assert_eq!(quiz.options[2], "Controllers want results");
/// ```
pub fn materialize(scene: &Scene, interaction_type: InteractionType) -> Interaction {
    let lines = scene.on_screen_lines();
    let key_point = lines
        .first()
        .cloned()
        .or_else(|| text::sentences(&scene.narration).into_iter().next())
        .unwrap_or_else(|| scene.title.clone());
    let subject = if scene.title.trim().is_empty() {
        "this topic".to_string()
    } else {
        scene.title.trim().to_string()
    };

    let base = Interaction {
        kind: interaction_type.kind(),
        prescribed_as: Some(interaction_type),
        prompt: String::new(),
        options: Vec::new(),
        correct_option: None,
        pairs: Vec::new(),
        feedback: String::new(),
    };

    match interaction_type.kind() {
        InteractionKind::Quiz => {
            let prompt = if interaction_type.is_scenario() {
                let situation = text::sentences(&scene.narration)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| subject.clone());
                format!("{situation} What is the best next step?")
            } else {
                format!("Which statement about {subject} is accurate?")
            };
            let mut options = vec![
                format!("{subject} only matters in unusual situations"),
                format!("{subject} can be skipped when time is short"),
            ];
            // Answer position rotates with the scene number.
            let correct = scene.number as usize % (options.len() + 1);
            options.insert(correct, key_point.clone());
            Interaction {
                prompt,
                options,
                correct_option: Some(correct),
                feedback: format!("Correct: {key_point}"),
                ..base
            }
        }
        InteractionKind::DragMatch => {
            let mut pairs: Vec<MatchPair> = lines
                .iter()
                .filter_map(|line| split_pair(line))
                .take(MAX_MATCH_PAIRS)
                .collect();
            if pairs.len() < 2 {
                pairs = lines
                    .iter()
                    .take(MAX_MATCH_PAIRS)
                    .map(|line| MatchPair {
                        item: line.clone(),
                        target: subject.clone(),
                    })
                    .collect();
            }
            Interaction {
                prompt: "Match each item to where it belongs.".to_string(),
                pairs,
                feedback: format!("Each item connects back to {subject}."),
                ..base
            }
        }
        InteractionKind::ClickToReveal => {
            let mut options: Vec<String> = lines.iter().take(MAX_REVEAL_PANELS).cloned().collect();
            if options.is_empty() {
                options.push(key_point.clone());
            }
            Interaction {
                prompt: format!("Select each panel to learn more about {subject}."),
                options,
                feedback: "You have explored every panel.".to_string(),
                ..base
            }
        }
        InteractionKind::Reflection => Interaction {
            prompt: format!("How will you use {subject} in your own work this week?"),
            feedback: "There is no single right answer. Note one action you will take.".to_string(),
            ..base
        },
    }
}

fn split_pair(line: &str) -> Option<MatchPair> {
    let (item, target) = line
        .split_once(':')
        .or_else(|| line.split_once(" - "))
        .or_else(|| line.split_once(" – "))?;
    let (item, target) = (item.trim(), target.trim());
    (!item.is_empty() && !target.is_empty()).then(|| MatchPair {
        item: item.to_string(),
        target: target.to_string(),
    })
}
