//! Prompt text for scene synthesis and revision.

use std::fmt::Write as _;
use storyboard_core::{QualityReport, Storyboard};
use storyboard_error::{JsonError, JsonErrorKind};

/// System prompt for every scene call.
pub const SCENE_SYSTEM_PROMPT: &str = "You are an instructional designer writing one scene of an \
e-learning storyboard. Ground every statement in the supplied content. Reply with a single JSON \
object and no other text.";

/// System prompt for revision calls.
pub const REVISION_SYSTEM_PROMPT: &str = "You are an instructional designer revising an \
e-learning storyboard against reviewer feedback. Keep what works, fix every listed issue, and \
reply with a JSON object of the form {\"scenes\": [...]} and no other text.";

const SCENE_SHAPE: &str = r#"{
  "title": "...",
  "sceneType": "...",
  "narration": "voice-over script, 60-180 words",
  "onScreenText": ["short bullet", "short bullet"],
  "visual": {"prompt": "...", "altText": "..."},
  "interaction": null or {"kind": "quiz|drag_match|click_to_reveal|reflection", "prompt": "...", "options": ["..."], "correctOption": 0, "pairs": [{"item": "...", "target": "..."}], "feedback": "..."},
  "durationSeconds": 60
}"#;

/// Everything a scene prompt mentions.
#[derive(Debug, Clone, Copy)]
pub struct ScenePromptInput<'a> {
    /// Module topic
    pub topic: &'a str,
    /// Audience description
    pub audience: &'a str,
    /// Outcome the scene serves
    pub outcome: &'a str,
    /// Outcome's taxonomy level, as text
    pub level: &'a str,
    /// Canonical scene type, as text
    pub scene_type: &'a str,
    /// Type-specific writing guidance
    pub guidance: &'a str,
    /// 1-based repetition of the type within the outcome
    pub ordinal: u32,
    /// Grounded facts relevant to the outcome
    pub grounded: &'a [String],
    /// Titles of the most recent scenes
    pub previous_titles: &'a [String],
}

/// User prompt for one scene.
pub fn scene_prompt(input: &ScenePromptInput<'_>) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Module topic: {}", input.topic);
    if !input.audience.trim().is_empty() {
        let _ = writeln!(prompt, "Audience: {}", input.audience);
    }
    let _ = writeln!(
        prompt,
        "Learning outcome: {} (cognitive level: {})",
        input.outcome, input.level
    );
    if input.ordinal > 1 {
        let _ = writeln!(
            prompt,
            "Write {} scene number {} for this outcome; make it differ from the earlier one.",
            input.scene_type, input.ordinal
        );
    } else {
        let _ = writeln!(prompt, "Write the {} scene for this outcome.", input.scene_type);
    }
    let _ = writeln!(prompt, "{}", input.guidance);

    if input.grounded.is_empty() {
        let _ = writeln!(prompt, "\nNo source material was supplied; stay general and accurate.");
    } else {
        let _ = writeln!(prompt, "\nUse this source content:");
        for item in input.grounded {
            let _ = writeln!(prompt, "- {item}");
        }
    }

    if !input.previous_titles.is_empty() {
        let _ = writeln!(prompt, "\nRecent scenes (do not repeat them):");
        for title in input.previous_titles {
            let _ = writeln!(prompt, "- {title}");
        }
    }

    let _ = write!(prompt, "\nReturn JSON shaped like:\n{SCENE_SHAPE}");
    prompt
}

/// User prompt for a whole-storyboard revision.
///
/// # Errors
///
/// Returns a serialization error if the scene list cannot be encoded.
pub fn revision_prompt(storyboard: &Storyboard, report: &QualityReport) -> Result<String, JsonError> {
    let scenes = serde_json::to_string_pretty(&storyboard.scenes)
        .map_err(|e| JsonError::new(JsonErrorKind::Serialization(e.to_string())))?;

    let mut prompt = String::new();
    let _ = writeln!(prompt, "Module topic: {}", storyboard.topic);
    let _ = writeln!(prompt, "Learning outcomes:");
    for (i, outcome) in storyboard.outcomes.iter().enumerate() {
        let _ = writeln!(prompt, "{i}. {outcome}");
    }
    let _ = writeln!(
        prompt,
        "\nThe storyboard scored {}/100 (grade {}). Issues to fix:",
        report.overall_score, report.grade
    );
    for issue in &report.issues {
        match issue.scene_number {
            Some(n) => {
                let _ = writeln!(
                    prompt,
                    "- [{}] scene {n}: {} ({})",
                    issue.severity, issue.message, issue.recommendation
                );
            }
            None => {
                let _ = writeln!(
                    prompt,
                    "- [{}] {} ({})",
                    issue.severity, issue.message, issue.recommendation
                );
            }
        }
    }
    if let Some(guidance) = &report.revision {
        let _ = writeln!(prompt, "\nPriority actions:");
        for action in &guidance.actions {
            let _ = writeln!(prompt, "- {action}");
        }
    }
    let _ = writeln!(
        prompt,
        "\nKeep each scene's metadata.outcomeIndex and metadata.role. Current scenes:\n{scenes}"
    );
    Ok(prompt)
}
