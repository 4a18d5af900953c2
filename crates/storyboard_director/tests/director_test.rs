//! End-to-end tests for the director with scripted providers.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use storyboard_core::{
    CompletionRequest, CompletionResponse, GenerationMode, LearningRequest, LearningRequestBuilder,
    PASS_THRESHOLD, QualityDimension, QualityReport, SceneRole, SceneType, Storyboard,
};
use storyboard_director::{
    Director, MAX_REVISION_ATTEMPTS, MAX_SCENE_SECONDS, REVISION_SYSTEM_PROMPT, StoryboardConfig,
};
use storyboard_error::StoryboardResult;
use storyboard_interface::ContentProvider;
use storyboard_quality::{QualityGate, QualityValidator};

const CAPS_SOURCE: &str = "The CAPS model describes four communication styles: Controller, \
Analyser, Promoter and Supporter. Maria is a new team lead who wants to run better meetings. \
A common mistake is to label colleagues permanently.";

/// Answers scene prompts with well-formed scenes, optionally garbling one type.
struct ScriptedProvider {
    garble: Option<SceneType>,
    revision_reply: String,
    echo_revision: bool,
    scene_calls: AtomicUsize,
    revision_calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            garble: None,
            revision_reply: "I could not revise this storyboard.".to_string(),
            echo_revision: false,
            scene_calls: AtomicUsize::new(0),
            revision_calls: AtomicUsize::new(0),
        }
    }

    fn garbling(scene_type: SceneType) -> Self {
        Self {
            garble: Some(scene_type),
            ..Self::new()
        }
    }

    fn revising_with(reply: String) -> Self {
        Self {
            revision_reply: reply,
            ..Self::new()
        }
    }

    /// Revises by sending back the scenes listed in the revision prompt.
    fn echoing() -> Self {
        Self {
            echo_revision: true,
            ..Self::new()
        }
    }
}

fn requested_type(prompt: &str) -> SceneType {
    SceneType::CANONICAL
        .into_iter()
        .find(|t| {
            prompt.contains(&format!("Write the {t} scene")) || prompt.contains(&format!("Write {t} scene"))
        })
        .unwrap_or(SceneType::Other)
}

fn requested_outcome(prompt: &str) -> String {
    prompt
        .lines()
        .find_map(|l| l.strip_prefix("Learning outcome: "))
        .and_then(|l| l.split(" (cognitive level").next())
        .unwrap_or("the topic")
        .to_string()
}

fn scene_json(scene_type: SceneType, outcome: &str) -> String {
    let interaction = match scene_type {
        SceneType::Check => json!({
            "kind": "quiz",
            "question": "Maria's manager wants results fast. Which CAPS type is that?",
            "options": ["Controller", "Supporter", "Promoter"],
            "correctOption": 0,
            "feedback": "Controllers drive for results."
        }),
        SceneType::Reflect => json!({
            "kind": "reflection",
            "prompt": "Which CAPS type describes you best?",
            "feedback": "Note one habit to adjust."
        }),
        _ => serde_json::Value::Null,
    };
    json!({
        "title": format!("CAPS {scene_type}: {outcome}"),
        "sceneType": scene_type.to_string(),
        "voiceOver": format!(
            "Maria, a new team lead, uses the CAPS model as she works to {}. The Controller wants results and the Supporter wants harmony.",
            outcome.to_lowercase()
        ),
        "ost": ["Controller: results", "Supporter: harmony", "Use the CAPS model"],
        "visual": {"prompt": "A team meeting around a whiteboard", "altText": "Four colleagues talking"},
        "interactivity": interaction,
        "durationSeconds": 50
    })
    .to_string()
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    async fn complete(&self, req: &CompletionRequest) -> StoryboardResult<CompletionResponse> {
        if req.system_prompt == REVISION_SYSTEM_PROMPT {
            self.revision_calls.fetch_add(1, Ordering::SeqCst);
            if self.echo_revision
                && let Some((_, scenes)) = req.user_prompt.split_once("Current scenes:\n")
            {
                return Ok(CompletionResponse::new(format!(
                    "Revised storyboard:\n```json\n{{\"scenes\": {scenes}}}\n```"
                )));
            }
            return Ok(CompletionResponse::new(self.revision_reply.clone()));
        }
        self.scene_calls.fetch_add(1, Ordering::SeqCst);
        let scene_type = requested_type(&req.user_prompt);
        if Some(scene_type) == self.garble {
            return Ok(CompletionResponse::new("I'm sorry, I cannot write that scene."));
        }
        let body = scene_json(scene_type, &requested_outcome(&req.user_prompt));
        Ok(CompletionResponse::new(format!("Here is the scene:\n```json\n{body}\n```")))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-1"
    }
}

/// Real validator scores, overridden by a fixed sequence and never passing.
struct FailingGate {
    scores: Mutex<Vec<u32>>,
}

impl FailingGate {
    fn new(scores: &[u32]) -> Self {
        Self {
            scores: Mutex::new(scores.to_vec()),
        }
    }
}

impl QualityGate for FailingGate {
    fn assess(&self, storyboard: &Storyboard, outcomes: &[String], framework: Option<&str>) -> QualityReport {
        let mut report = QualityValidator::new().validate(storyboard, outcomes, framework);
        let mut scores = self.scores.lock().expect("Lock not poisoned");
        if !scores.is_empty() {
            report.overall_score = scores.remove(0);
        }
        report.passed = false;
        report
    }
}

/// Rejects the first attempt, then reports the real validator verbatim.
struct RejectFirstGate {
    calls: AtomicUsize,
}

impl QualityGate for RejectFirstGate {
    fn assess(&self, storyboard: &Storyboard, outcomes: &[String], framework: Option<&str>) -> QualityReport {
        let mut report = QualityValidator::new().validate(storyboard, outcomes, framework);
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            report.overall_score = 40;
            report.passed = false;
        }
        report
    }
}

/// Every call returns the same scene with an absurd duration.
struct HugeDurationProvider;

#[async_trait]
impl ContentProvider for HugeDurationProvider {
    async fn complete(&self, _req: &CompletionRequest) -> StoryboardResult<CompletionResponse> {
        Ok(CompletionResponse::new(
            r#"{"title":"T","narration":"Some narration","ost":"Text","durationSeconds":1e12}"#,
        ))
    }

    fn provider_name(&self) -> &'static str {
        "huge"
    }

    fn model_name(&self) -> &str {
        "huge-1"
    }
}

fn caps_request() -> LearningRequest {
    LearningRequestBuilder::default()
        .topic("Communicating with CAPS")
        .audience("New team leads")
        .duration_minutes(10u32)
        .outcomes(vec![
            "Identify the four CAPS personality types".to_string(),
            "Apply the CAPS model to adapt your communication".to_string(),
        ])
        .source_text(CAPS_SOURCE)
        .build()
        .expect("Valid request")
}

fn director(provider: ScriptedProvider) -> Director<ScriptedProvider> {
    Director::new(provider, StoryboardConfig::default())
}

fn assert_canonical_per_outcome(storyboard: &Storyboard) {
    for (i, _) in storyboard.outcomes.iter().enumerate() {
        for scene_type in SceneType::CANONICAL {
            assert!(
                storyboard.scenes_for(i).any(|s| s.scene_type == scene_type),
                "outcome {i} is missing a {scene_type} scene"
            );
        }
    }
}

#[tokio::test]
async fn test_caps_scenario_covers_every_outcome() {
    let director = director(ScriptedProvider::new());
    let outcome = director
        .generate(&caps_request())
        .await
        .expect("Generation succeeds");
    let storyboard = &outcome.storyboard;

    assert!(storyboard.is_contiguous());
    assert_canonical_per_outcome(storyboard);
    for i in 0..storyboard.outcomes.len() {
        assert!(storyboard.scenes_for(i).count() >= 5);
    }
    assert_eq!(storyboard.scenes[0].metadata.role, SceneRole::Welcome);
    assert_eq!(
        storyboard.scenes.last().map(|s| s.metadata.role),
        Some(SceneRole::Summary)
    );
    assert!(storyboard.scenes.iter().all(|s| !s.metadata.fallback));

    let alignment = outcome
        .report
        .dimension(QualityDimension::OutcomeAlignment)
        .expect("Alignment scored");
    assert!(alignment.score >= 85, "alignment {}", alignment.score);
    assert_eq!(director.provider().scene_calls.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_passing_storyboard_is_not_revised() {
    let director = director(ScriptedProvider::new());
    let outcome = director
        .generate(&caps_request())
        .await
        .expect("Generation succeeds");

    assert!(outcome.report.passed, "score {}", outcome.report.overall_score);
    assert_eq!(outcome.storyboard.generation.revisions, 0);
    assert_eq!(outcome.storyboard.generation.attempts, 1);
    assert_eq!(director.provider().revision_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_outcomes_and_no_source_is_fatal() {
    let director = director(ScriptedProvider::new());
    let request = LearningRequestBuilder::default()
        .topic("Fire safety")
        .outcomes(vec!["   ".to_string()])
        .build()
        .expect("Valid request");

    let err = director
        .generate(&request)
        .await
        .expect_err("Nothing to teach");
    assert!(err.is_fatal_configuration());
    assert_eq!(director.provider().scene_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_scene_json_uses_fallback() {
    let director = director(ScriptedProvider::garbling(SceneType::Show));
    let outcome = director
        .generate(&caps_request())
        .await
        .expect("Malformed provider output is not an error");
    let storyboard = &outcome.storyboard;

    let shows: Vec<_> = storyboard
        .scenes
        .iter()
        .filter(|s| s.scene_type == SceneType::Show)
        .collect();
    assert_eq!(shows.len(), 2);
    for show in shows {
        assert!(show.metadata.fallback);
        assert!(!show.narration.trim().is_empty());
        assert!(!show.on_screen_text.trim().is_empty());
    }
    assert!(storyboard.is_contiguous());
    assert_canonical_per_outcome(storyboard);
}

#[tokio::test]
async fn test_revision_loop_is_bounded_and_keeps_best() {
    let reply = json!({"scenes": [
        {"title": "Welcome", "narration": "Welcome back.", "metadata": {"role": "welcome"}},
        {"title": "CAPS types", "type": "teach", "narration": "Meet the CAPS types.", "outcomeIndex": 0},
        {"title": "Wrap up", "narration": "That's all.", "role": "summary"}
    ]})
    .to_string();
    let director = director(ScriptedProvider::revising_with(reply))
        .with_gate(FailingGate::new(&[50, 62, 55, 40]));

    let outcome = director
        .generate(&caps_request())
        .await
        .expect("Exhausted revisions still return a storyboard");
    let summary = &outcome.storyboard.generation;

    assert_eq!(
        director.provider().revision_calls.load(Ordering::SeqCst),
        MAX_REVISION_ATTEMPTS as usize
    );
    assert_eq!(summary.revisions, MAX_REVISION_ATTEMPTS);
    assert_eq!(summary.attempts, MAX_REVISION_ATTEMPTS + 1);
    assert_eq!(summary.best_attempt, 2);
    assert_eq!(outcome.report.overall_score, 62);
    assert!(!outcome.report.passed);

    // Revised scenes were repaired back to the full structure.
    assert!(outcome.storyboard.is_contiguous());
    assert_canonical_per_outcome(&outcome.storyboard);
    assert!(outcome.storyboard.scenes.iter().any(|s| s.metadata.placeholder));
}

#[tokio::test]
async fn test_unparseable_revision_stops_the_loop() {
    let director = director(ScriptedProvider::new()).with_gate(FailingGate::new(&[45]));

    let outcome = director
        .generate(&caps_request())
        .await
        .expect("Best attempt is returned");

    assert_eq!(director.provider().revision_calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.storyboard.generation.revisions, 1);
    assert_eq!(outcome.storyboard.generation.attempts, 1);
    assert_eq!(outcome.storyboard.generation.best_attempt, 1);
    assert_eq!(outcome.report.overall_score, 45);
}

#[tokio::test]
async fn test_upgrade_mode_adds_practice_and_checks() {
    let director = director(ScriptedProvider::new());
    let request = caps_request().with_mode(GenerationMode::Upgrade);
    let outcome = director.generate(&request).await.expect("Generation succeeds");

    for i in 0..2 {
        let count = |t: SceneType| {
            outcome
                .storyboard
                .scenes_for(i)
                .filter(|s| s.scene_type == t)
                .count()
        };
        assert!(count(SceneType::Apply) >= 2);
        assert!(count(SceneType::Check) >= 2);
    }
    assert!(outcome.storyboard.is_contiguous());
}

#[tokio::test]
async fn test_passing_revision_becomes_the_best_attempt() {
    let director = director(ScriptedProvider::echoing()).with_gate(RejectFirstGate {
        calls: AtomicUsize::new(0),
    });

    let outcome = director
        .generate(&caps_request())
        .await
        .expect("Generation succeeds");
    let summary = &outcome.storyboard.generation;

    assert_eq!(director.provider().revision_calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.revisions, 1);
    assert_eq!(summary.attempts, 2);
    assert_eq!(summary.best_attempt, 2);
    assert!(outcome.report.passed, "score {}", outcome.report.overall_score);
    assert_eq!(outcome.report.passed, outcome.report.overall_score >= PASS_THRESHOLD);

    assert!(outcome.storyboard.is_contiguous());
    assert_canonical_per_outcome(&outcome.storyboard);
    assert!(outcome.storyboard.scenes.iter().all(|s| !s.metadata.placeholder));
}

#[tokio::test]
async fn test_enormous_provider_durations_are_clamped() {
    let director = Director::new(HugeDurationProvider, StoryboardConfig::default());

    let outcome = director
        .generate(&caps_request())
        .await
        .expect("Huge durations are not an error");
    let storyboard = &outcome.storyboard;

    assert!(!storyboard.scenes.is_empty());
    assert!(
        storyboard
            .scenes
            .iter()
            .all(|s| s.duration_seconds <= MAX_SCENE_SECONDS)
    );
    assert!(storyboard.total_seconds() > 0);
    assert!(outcome.report.overall_score <= 100);
}

