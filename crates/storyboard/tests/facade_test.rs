//! End-to-end use of the re-exported API.

use async_trait::async_trait;
use storyboard::{
    CompletionRequest, CompletionResponse, ContentProvider, Director, GenerationOutcome,
    LearningRequestBuilder, QualityValidator, SceneRole, SceneType, Storyboard, StoryboardConfig,
    StoryboardResult,
};

/// Replies to every prompt with the same loosely-shaped scene.
struct CannedProvider;

#[async_trait]
impl ContentProvider for CannedProvider {
    async fn complete(&self, _req: &CompletionRequest) -> StoryboardResult<CompletionResponse> {
        Ok(CompletionResponse::new(
            r#"Sure! {"title": "Fire exits", "script": "Every floor has two marked fire exits. Find the nearest one before you need it.", "bullets": ["Two exits per floor", "Follow the green signs"], "imagePrompt": "An office corridor with a green exit sign",}"#,
        ))
    }

    fn provider_name(&self) -> &'static str {
        "canned"
    }

    fn model_name(&self) -> &str {
        "canned-1"
    }
}

/// Never produces anything usable.
struct SilentProvider;

#[async_trait]
impl ContentProvider for SilentProvider {
    async fn complete(&self, _req: &CompletionRequest) -> StoryboardResult<CompletionResponse> {
        Ok(CompletionResponse::new("No."))
    }

    fn provider_name(&self) -> &'static str {
        "silent"
    }

    fn model_name(&self) -> &str {
        "silent-1"
    }
}

fn fire_safety() -> storyboard::LearningRequest {
    LearningRequestBuilder::default()
        .topic("Fire safety at work")
        .audience("Office staff")
        .duration_minutes(8u32)
        .outcomes(vec![
            "Identify the nearest fire exit".to_string(),
            "Describe how to raise the alarm".to_string(),
        ])
        .build()
        .expect("Valid request")
}

#[tokio::test]
async fn test_generated_storyboard_round_trips_and_revalidates() {
    let director = Director::new(CannedProvider, StoryboardConfig::default());
    let outcome = director
        .generate(&fire_safety())
        .await
        .expect("Generation succeeds");

    let json = serde_json::to_string(&outcome).expect("Serializable");
    let parsed: GenerationOutcome = serde_json::from_str(&json).expect("Deserializable");
    assert_eq!(parsed.storyboard, outcome.storyboard);
    assert_eq!(parsed.report.overall_score, outcome.report.overall_score);

    let validator = QualityValidator::new();
    let again = validator.validate(&parsed.storyboard, &[], None);
    let original = validator.validate(&outcome.storyboard, &outcome.storyboard.outcomes, None);
    assert_eq!(again.overall_score, original.overall_score);
    assert_eq!(again.issues, original.issues);
    assert!(again.overall_score <= 100);
}

#[tokio::test]
async fn test_silent_provider_still_yields_complete_structure() {
    let director = Director::new(SilentProvider, StoryboardConfig::default());
    let outcome = director
        .generate(&fire_safety())
        .await
        .expect("Provider failures are recovered");
    let storyboard: &Storyboard = &outcome.storyboard;

    assert!(storyboard.is_contiguous());
    assert_eq!(storyboard.scenes[0].metadata.role, SceneRole::Welcome);
    for i in 0..storyboard.outcomes.len() {
        for scene_type in SceneType::CANONICAL {
            assert!(storyboard.scenes_for(i).any(|s| s.scene_type == scene_type));
        }
    }
    assert!(
        storyboard
            .content_scenes()
            .all(|s| s.metadata.fallback || s.metadata.placeholder)
    );
}

#[test]
fn test_tracing_installs_once() {
    assert!(storyboard::telemetry::init_tracing(false, true).is_ok());
    assert!(storyboard::telemetry::init_tracing(true, false).is_err());
}
