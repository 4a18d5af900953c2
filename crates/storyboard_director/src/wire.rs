//! Provider scene JSON and its mapping onto [`Scene`].
//!
//! Providers name fields inconsistently. Every alias is resolved here, once,
//! so the rest of the pipeline only ever sees canonical scenes.

use serde::Deserialize;
use serde_json::{Map, Value};
use storyboard_core::{
    Interaction, InteractionKind, InteractionType, MatchPair, Scene, SceneMetadata, SceneRole,
    SceneType, VisualBrief, text,
};
use storyboard_error::{JsonError, JsonErrorKind};

/// Shortest duration assigned to a scene.
const MIN_SCENE_SECONDS: u32 = 20;
/// Longest running time accepted for a single scene.
pub const MAX_SCENE_SECONDS: u32 = 3600;
/// Alt text derived from a bare visual prompt is cut to this many characters.
const DERIVED_ALT_CHARS: usize = 120;

/// A scene as a provider wrote it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WireScene {
    #[serde(alias = "heading", alias = "sceneTitle")]
    title: Option<Value>,
    #[serde(alias = "sceneType", alias = "type")]
    scene_type: Option<Value>,
    #[serde(alias = "voiceover", alias = "voiceOver", alias = "voice_over", alias = "script")]
    narration: Option<Value>,
    #[serde(
        alias = "onScreenText",
        alias = "ost",
        alias = "screenText",
        alias = "on_screen",
        alias = "bullets"
    )]
    on_screen_text: Option<Value>,
    #[serde(alias = "visualBrief", alias = "imagePrompt", alias = "visual_brief", alias = "image")]
    visual: Option<Value>,
    #[serde(alias = "interactivity", alias = "knowledgeCheck", alias = "activity")]
    interaction: Option<Value>,
    #[serde(alias = "outcomeIndex")]
    outcome_index: Option<Value>,
    #[serde(alias = "durationSeconds", alias = "duration")]
    duration_seconds: Option<Value>,
    role: Option<Value>,
    metadata: Option<Map<String, Value>>,
}

impl WireScene {
    /// Deserialize one scene object.
    ///
    /// # Errors
    ///
    /// Returns a shape error when the value is not an object or a field has
    /// an impossible type.
    pub fn from_value(value: Value) -> Result<Self, JsonError> {
        if !value.is_object() {
            return Err(JsonError::new(JsonErrorKind::Shape(
                "scene is not an object".to_string(),
            )));
        }
        serde_json::from_value(value).map_err(|e| JsonError::new(JsonErrorKind::Shape(e.to_string())))
    }

    /// Role the provider declared, directly or under `metadata`.
    pub fn declared_role(&self) -> Option<SceneRole> {
        let value = self
            .role
            .as_ref()
            .or_else(|| self.metadata.as_ref().and_then(|m| m.get("role")))?;
        match text_of(value).trim().to_ascii_lowercase().as_str() {
            "welcome" | "intro" | "introduction" | "objectives" => Some(SceneRole::Welcome),
            "summary" | "recap" | "conclusion" | "closing" => Some(SceneRole::Summary),
            "content" => Some(SceneRole::Content),
            _ => None,
        }
    }

    /// Outcome index the provider declared, directly or under `metadata`.
    pub fn declared_outcome(&self) -> Option<usize> {
        self.outcome_index
            .as_ref()
            .or_else(|| {
                self.metadata
                    .as_ref()
                    .and_then(|m| m.get("outcomeIndex").or_else(|| m.get("outcome_index")))
            })
            .and_then(index_of)
    }

    /// Whether the scene carries any learner-facing text.
    pub fn has_content(&self) -> bool {
        let narration = self.narration.as_ref().map(prose_of).unwrap_or_default();
        let screen = self.on_screen_text.as_ref().map(lines_of).unwrap_or_default();
        !narration.trim().is_empty() || !screen.trim().is_empty()
    }

    /// Convert to a canonical scene.
    ///
    /// Missing durations are estimated from narration length. Placeholder
    /// and fallback flags are taken from `metadata` when present.
    pub fn into_scene(self, number: u32, words_per_minute: u32) -> Scene {
        let role = self.declared_role().unwrap_or_default();
        let outcome_index = self.declared_outcome();
        let flag = |key: &str| {
            self.metadata
                .as_ref()
                .and_then(|m| m.get(key))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };
        let placeholder = flag("placeholder");
        let fallback = flag("fallback");

        let narration = self.narration.as_ref().map(prose_of).unwrap_or_default();
        let duration_seconds = self
            .duration_seconds
            .as_ref()
            .and_then(seconds_of)
            .unwrap_or_else(|| estimate_seconds(&narration, words_per_minute));

        Scene {
            number,
            title: self.title.as_ref().map(text_of).unwrap_or_default().trim().to_string(),
            scene_type: self
                .scene_type
                .as_ref()
                .map(|v| SceneType::coerce(&text_of(v)))
                .unwrap_or(SceneType::Other),
            narration,
            on_screen_text: self.on_screen_text.as_ref().map(lines_of).unwrap_or_default(),
            visual: self.visual.as_ref().map(visual_of).unwrap_or_default(),
            interaction: self.interaction.as_ref().and_then(interaction_of),
            duration_seconds,
            metadata: SceneMetadata {
                outcome_index,
                role,
                placeholder,
                fallback,
            },
        }
    }
}

/// Running time for narration at a speaking pace, never below the scene minimum.
///
/// # Examples
///
/// ```
/// use storyboard_director::estimate_seconds;
///
/// let narration = vec!["word"; 140].join(" ");
/// assert_eq!(estimate_seconds(&narration, 140), 60);
/// assert_eq!(estimate_seconds("Short.", 140), 20);
/// ```
pub fn estimate_seconds(narration: &str, words_per_minute: u32) -> u32 {
    let words = u32::try_from(text::word_count(narration)).unwrap_or(u32::MAX);
    let pace = words_per_minute.max(1);
    words
        .saturating_mul(60)
        .div_ceil(pace)
        .clamp(MIN_SCENE_SECONDS, MAX_SCENE_SECONDS)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(text_of).collect::<Vec<_>>().join(" "),
        Value::Object(map) => ["text", "label", "option", "title", "content", "value", "description"]
            .iter()
            .find_map(|k| map.get(*k))
            .map(text_of)
            .unwrap_or_default(),
        Value::Null => String::new(),
    }
}

fn prose_of(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| text_of(v).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        other => text_of(other).trim().to_string(),
    }
}

fn lines_of(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| text_of(v).trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| format!("- {}", text::strip_bullet(&s)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => text_of(other).trim().to_string(),
    }
}

fn visual_of(value: &Value) -> VisualBrief {
    match value {
        Value::Object(map) => {
            let field = |keys: &[&str]| {
                keys.iter()
                    .find_map(|k| map.get(*k))
                    .map(|v| text_of(v).trim().to_string())
                    .unwrap_or_default()
            };
            let prompt = field(&["prompt", "description", "imagePrompt", "brief", "visual"]);
            let mut alt_text = field(&["altText", "alt_text", "alt"]);
            if alt_text.is_empty() && !prompt.is_empty() {
                alt_text = text::truncate_words(&prompt, DERIVED_ALT_CHARS);
            }
            VisualBrief { prompt, alt_text }
        }
        other => {
            let prompt = text_of(other).trim().to_string();
            let alt_text = text::truncate_words(&prompt, DERIVED_ALT_CHARS);
            VisualBrief { prompt, alt_text }
        }
    }
}

fn index_of(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn seconds_of(value: &Value) -> Option<u32> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('s').trim().parse().ok()?,
        _ => return None,
    };
    (seconds.is_finite() && seconds >= 1.0)
        .then(|| seconds.round().min(f64::from(MAX_SCENE_SECONDS)) as u32)
}

fn interaction_of(value: &Value) -> Option<Interaction> {
    let map = match value {
        Value::Object(map) => map,
        Value::String(s) => {
            let prompt = s.trim();
            if prompt.is_empty() || prompt.eq_ignore_ascii_case("none") {
                return None;
            }
            return Some(Interaction {
                kind: InteractionKind::Reflection,
                prescribed_as: None,
                prompt: prompt.to_string(),
                options: Vec::new(),
                correct_option: None,
                pairs: Vec::new(),
                feedback: String::new(),
            });
        }
        _ => return None,
    };

    let get = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k));
    let declared_kind = get(&["kind", "type", "interactionType", "format"]).map(text_of);
    if declared_kind
        .as_deref()
        .is_some_and(|k| k.trim().eq_ignore_ascii_case("none"))
    {
        return None;
    }

    let prompt = get(&["prompt", "question", "instructions", "stem", "text"])
        .map(|v| text_of(v).trim().to_string())
        .unwrap_or_default();

    let mut marked_correct = None;
    let mut options: Vec<String> = Vec::new();
    for item in get(&["options", "choices", "answers", "panels"])
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let label = text_of(item).trim().to_string();
        if label.is_empty() {
            continue;
        }
        if let Value::Object(o) = item
            && ["correct", "isCorrect", "is_correct"]
                .iter()
                .any(|k| o.get(*k).and_then(Value::as_bool) == Some(true))
        {
            marked_correct = Some(options.len());
        }
        options.push(label);
    }

    let correct_option = get(&[
        "correctOption",
        "correct_option",
        "correctAnswer",
        "correct_answer",
        "correctIndex",
        "answer",
    ])
    .and_then(|v| answer_index(v, &options))
    .or(marked_correct);

    let pairs: Vec<MatchPair> = get(&["pairs", "matches", "items"])
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(pair_of).collect())
        .unwrap_or_default();

    let feedback = get(&["feedback", "explanation", "rationale", "debrief"])
        .map(|v| match v {
            Value::Object(o) => o
                .values()
                .map(|f| text_of(f).trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            other => text_of(other).trim().to_string(),
        })
        .unwrap_or_default();

    let prescribed_as: Option<InteractionType> = get(&["prescribedAs", "prescribed_as"])
        .and_then(|v| serde_json::from_value(v.clone()).ok());

    let kind = declared_kind
        .as_deref()
        .and_then(InteractionKind::coerce)
        .or_else(|| prescribed_as.map(InteractionType::kind))
        .unwrap_or(if !options.is_empty() {
            InteractionKind::Quiz
        } else if !pairs.is_empty() {
            InteractionKind::DragMatch
        } else {
            InteractionKind::Reflection
        });

    if prompt.is_empty() && options.is_empty() && pairs.is_empty() {
        return None;
    }

    Some(Interaction {
        kind,
        prescribed_as,
        prompt,
        correct_option: if kind == InteractionKind::Quiz {
            correct_option
        } else {
            None
        },
        options,
        pairs,
        feedback,
    })
}

/// Index of the correct answer from a number, a numeric string, a letter or the option text.
fn answer_index(value: &Value, options: &[String]) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<usize>() {
                return Some(i);
            }
            let mut chars = s.chars();
            if let (Some(letter), None) = (chars.next(), chars.next())
                && letter.is_ascii_alphabetic()
            {
                let i = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
                if i < options.len() {
                    return Some(i);
                }
            }
            options.iter().position(|o| o.eq_ignore_ascii_case(s))
        }
        _ => None,
    }
}

fn pair_of(value: &Value) -> Option<MatchPair> {
    let (item, target) = match value {
        Value::Object(map) => {
            let pick = |keys: &[&str]| {
                keys.iter()
                    .find_map(|k| map.get(*k))
                    .map(|v| text_of(v).trim().to_string())
                    .unwrap_or_default()
            };
            (
                pick(&["item", "term", "left", "draggable", "source"]),
                pick(&["target", "definition", "right", "match", "category"]),
            )
        }
        Value::Array(parts) if parts.len() == 2 => (
            text_of(&parts[0]).trim().to_string(),
            text_of(&parts[1]).trim().to_string(),
        ),
        Value::String(s) => {
            let (item, target) = s.split_once(':').or_else(|| s.split_once(" - "))?;
            (item.trim().to_string(), target.trim().to_string())
        }
        _ => return None,
    };
    (!item.is_empty() && !target.is_empty()).then_some(MatchPair { item, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aliases_map_onto_canonical_fields() {
        let wire = WireScene::from_value(json!({
            "sceneTitle": "Meet the CAPS types",
            "type": "Teach",
            "voiceOver": ["Every team has four styles.", "Let's meet them."],
            "ost": ["Controller", "- Analyser", "Promoter", "Supporter"],
            "imagePrompt": "Four figures around a table",
            "knowledgeCheck": {
                "question": "Which type wants results?",
                "choices": ["Controller", "Supporter"],
                "correctAnswer": "A",
                "explanation": "Controllers drive for results."
            },
            "outcomeIndex": "1"
        }))
        .expect("Scene object");
        let scene = wire.into_scene(4, 140);

        assert_eq!(scene.title, "Meet the CAPS types");
        assert_eq!(scene.scene_type, SceneType::Teach);
        assert_eq!(scene.narration, "Every team has four styles. Let's meet them.");
        assert_eq!(scene.on_screen_lines(), vec!["Controller", "Analyser", "Promoter", "Supporter"]);
        assert_eq!(scene.visual.prompt, "Four figures around a table");
        assert_eq!(scene.visual.alt_text, "Four figures around a table");
        assert_eq!(scene.metadata.outcome_index, Some(1));
        assert_eq!(scene.duration_seconds, 20);

        let quiz = scene.interaction.expect("Quiz");
        assert_eq!(quiz.kind, InteractionKind::Quiz);
        assert_eq!(quiz.correct_option, Some(0));
        assert_eq!(quiz.feedback, "Controllers drive for results.");
    }

    #[test]
    fn serialized_scenes_read_back_unchanged() {
        let scene = Scene {
            number: 3,
            title: "Practice".to_string(),
            scene_type: SceneType::Apply,
            narration: "Maria must brief a Controller.".to_string(),
            on_screen_text: "- Be brief\n- Lead with results".to_string(),
            visual: VisualBrief {
                prompt: "Office".to_string(),
                alt_text: "An office".to_string(),
            },
            interaction: Some(Interaction {
                kind: InteractionKind::DragMatch,
                prescribed_as: Some(InteractionType::DragMatch),
                prompt: "Match each type".to_string(),
                options: Vec::new(),
                correct_option: None,
                pairs: vec![MatchPair {
                    item: "Controller".to_string(),
                    target: "Results".to_string(),
                }],
                feedback: "Well done.".to_string(),
            }),
            duration_seconds: 75,
            metadata: SceneMetadata {
                outcome_index: Some(0),
                role: SceneRole::Content,
                placeholder: false,
                fallback: true,
            },
        };
        let value = serde_json::to_value(&scene).expect("Serializable scene");
        let back = WireScene::from_value(value).expect("Scene object").into_scene(3, 140);
        assert_eq!(back, scene);
    }

    #[test]
    fn interaction_variants() {
        assert!(interaction_of(&json!("none")).is_none());
        assert!(interaction_of(&json!({"type": "none", "prompt": "x"})).is_none());

        let marked = interaction_of(&json!({
            "prompt": "Pick one",
            "options": [{"text": "Wrong"}, {"text": "Right", "correct": true}]
        }))
        .expect("Quiz");
        assert_eq!(marked.correct_option, Some(1));

        let matching = interaction_of(&json!({
            "type": "drag-and-drop",
            "prompt": "Sort",
            "pairs": ["Controller: results", {"term": "Supporter", "definition": "harmony"}]
        }))
        .expect("Drag match");
        assert_eq!(matching.kind, InteractionKind::DragMatch);
        assert_eq!(matching.pairs.len(), 2);
        assert_eq!(matching.correct_option, None);
    }

    #[test]
    fn blank_options_do_not_shift_the_marked_answer() {
        let quiz = interaction_of(&json!({
            "prompt": "Which type wants harmony?",
            "options": ["", {"text": "Controller"}, "  ", {"text": "Supporter", "isCorrect": true}]
        }))
        .expect("Quiz");
        assert_eq!(quiz.options, vec!["Controller", "Supporter"]);
        assert_eq!(quiz.correct_option, Some(1));
    }

    #[test]
    fn durations_are_clamped_to_one_hour() {
        for huge in [json!(1e12), json!("99999999999s"), json!(u64::MAX)] {
            let wire = WireScene::from_value(json!({"title": "T", "narration": "Some narration", "durationSeconds": huge}))
                .expect("Scene object");
            assert_eq!(wire.into_scene(1, 140).duration_seconds, MAX_SCENE_SECONDS);
        }
        let endless = "word ".repeat(100_000);
        assert_eq!(estimate_seconds(&endless, 1), MAX_SCENE_SECONDS);
        assert_eq!(seconds_of(&json!(f64::NAN.to_string())), None);
    }

    #[test]
    fn empty_scene_has_no_content() {
        let wire = WireScene::from_value(json!({"title": "Only a title"})).expect("Scene object");
        assert!(!wire.has_content());
        assert!(WireScene::from_value(json!("text")).is_err());
    }
}
