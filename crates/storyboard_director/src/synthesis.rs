//! Scene synthesizers, one per canonical scene type.
//!
//! Each synthesizer makes one provider call, routes the reply through
//! [`extract_json`] and the wire mapping, and stamps the result with its
//! outcome and type. Any failure yields the synthesizer's templated
//! fallback; synthesis never errors.

use crate::prompts::{self, ScenePromptInput};
use crate::{SceneTemplates, WireScene, extract_json, single_scene};
use async_trait::async_trait;
use storyboard_core::{
    CompletionRequestBuilder, GenerationConfig, Scene, SceneRole, SceneType, TaxonomyLevel,
};
use storyboard_error::{JsonError, JsonErrorKind, StoryboardResult};
use storyboard_interface::ContentProvider;
use tracing::{debug, instrument, warn};

/// Inputs for synthesizing one scene.
#[derive(Debug, Clone)]
pub struct SceneContext<'a> {
    /// Number the scene will carry
    pub number: u32,
    /// Module topic
    pub topic: &'a str,
    /// Audience description
    pub audience: &'a str,
    /// Index of the outcome served
    pub outcome_index: usize,
    /// Outcome text
    pub outcome: &'a str,
    /// Outcome's cognitive level
    pub level: TaxonomyLevel,
    /// 1-based repetition of the type within the outcome
    pub ordinal: u32,
    /// Grounded facts relevant to the outcome
    pub grounded: Vec<String>,
    /// Titles of the most recent scenes
    pub previous_titles: Vec<String>,
    /// Provider call settings
    pub settings: &'a GenerationConfig,
    /// Fallback source
    pub templates: &'a SceneTemplates<'a>,
}

/// Writes one canonical scene type.
#[async_trait]
pub trait SceneSynthesizer: Send + Sync {
    /// Type this synthesizer produces.
    fn scene_type(&self) -> SceneType;

    /// Writing guidance inserted into the prompt.
    fn guidance(&self) -> &'static str;

    /// Deterministic scene used when the provider fails.
    fn fallback(&self, ctx: &SceneContext<'_>) -> Scene {
        ctx.templates
            .fallback(ctx.number, self.scene_type(), ctx.outcome_index, ctx.outcome)
    }

    /// Produce a scene, falling back to the template on any failure.
    async fn synthesize(&self, provider: &dyn ContentProvider, ctx: &SceneContext<'_>) -> Scene {
        match self.attempt(provider, ctx).await {
            Ok(scene) => scene,
            Err(e) => {
                warn!(
                    scene = ctx.number,
                    scene_type = %self.scene_type(),
                    outcome = ctx.outcome_index,
                    error = %e,
                    "Scene synthesis failed, using fallback"
                );
                self.fallback(ctx)
            }
        }
    }

    /// One provider round trip without fallback.
    async fn attempt(&self, provider: &dyn ContentProvider, ctx: &SceneContext<'_>) -> StoryboardResult<Scene> {
        let scene_type = self.scene_type().to_string();
        let level = ctx.level.to_string();
        let user_prompt = prompts::scene_prompt(&ScenePromptInput {
            topic: ctx.topic,
            audience: ctx.audience,
            outcome: ctx.outcome,
            level: &level,
            scene_type: &scene_type,
            guidance: self.guidance(),
            ordinal: ctx.ordinal,
            grounded: &ctx.grounded,
            previous_titles: &ctx.previous_titles,
        });
        let request = CompletionRequestBuilder::default()
            .system_prompt(prompts::SCENE_SYSTEM_PROMPT)
            .user_prompt(user_prompt)
            .max_tokens(Some(ctx.settings.max_tokens))
            .temperature(Some(ctx.settings.temperature))
            .build()?;

        let response = provider.complete(&request).await?;
        let wire = WireScene::from_value(single_scene(extract_json(&response.text)?)?)?;
        if !wire.has_content() {
            return Err(JsonError::new(JsonErrorKind::Shape(
                "scene has neither narration nor on-screen text".to_string(),
            ))
            .into());
        }

        let mut scene = wire.into_scene(ctx.number, ctx.settings.words_per_minute);
        scene.scene_type = self.scene_type();
        scene.metadata.outcome_index = Some(ctx.outcome_index);
        scene.metadata.role = SceneRole::Content;
        scene.metadata.placeholder = false;
        scene.metadata.fallback = false;
        if scene.title.is_empty() {
            scene.title = self.fallback(ctx).title;
        }
        debug!(scene = scene.number, title = %scene.title, "Synthesized scene");
        Ok(scene)
    }
}

/// Introduces and explains the concept.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeachSynthesizer;

/// Demonstrates the concept with a worked example.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowSynthesizer;

/// Puts the learner in a realistic practice situation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplySynthesizer;

/// Assesses the outcome with a question.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckSynthesizer;

/// Prompts reflection and transfer to the learner's work.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectSynthesizer;

impl SceneSynthesizer for TeachSynthesizer {
    fn scene_type(&self) -> SceneType {
        SceneType::Teach
    }

    fn guidance(&self) -> &'static str {
        "Explain the concept clearly, define new terms, and name any framework from the source content. No interaction."
    }
}

impl SceneSynthesizer for ShowSynthesizer {
    fn scene_type(&self) -> SceneType {
        SceneType::Show
    }

    fn guidance(&self) -> &'static str {
        "Demonstrate the concept through a concrete example or a named character from the source content."
    }
}

impl SceneSynthesizer for ApplySynthesizer {
    fn scene_type(&self) -> SceneType {
        SceneType::Apply
    }

    fn guidance(&self) -> &'static str {
        "Set up a realistic workplace scenario where the learner must decide what to do, with a scenario question and feedback for the answer."
    }
}

impl SceneSynthesizer for CheckSynthesizer {
    fn scene_type(&self) -> SceneType {
        SceneType::Check
    }

    fn guidance(&self) -> &'static str {
        "Assess the outcome with a multiple-choice question of three or four options, one correct answer, and explanatory feedback."
    }
}

impl SceneSynthesizer for ReflectSynthesizer {
    fn scene_type(&self) -> SceneType {
        SceneType::Reflect
    }

    fn guidance(&self) -> &'static str {
        "Ask the learner to reflect on how they will use this in their own work, with an open reflective prompt."
    }
}

/// Synthesizer for a canonical type; `Other` is written like a Teach scene.
pub fn synthesizer_for(scene_type: SceneType) -> &'static dyn SceneSynthesizer {
    match scene_type {
        SceneType::Teach | SceneType::Other => &TeachSynthesizer,
        SceneType::Show => &ShowSynthesizer,
        SceneType::Apply => &ApplySynthesizer,
        SceneType::Check => &CheckSynthesizer,
        SceneType::Reflect => &ReflectSynthesizer,
    }
}

/// Convenience wrapper used by the director.
#[instrument(skip_all, fields(scene = ctx.number, scene_type = %scene_type, outcome = ctx.outcome_index))]
pub async fn synthesize_scene(
    provider: &dyn ContentProvider,
    scene_type: SceneType,
    ctx: &SceneContext<'_>,
) -> Scene {
    synthesizer_for(scene_type).synthesize(provider, ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use storyboard_core::{CompletionRequest, CompletionResponse, ContentPool, InteractionKind, LearningRequestBuilder};
    use storyboard_error::{ProviderError, ProviderErrorKind};

    struct Scripted(Mutex<Vec<StoryboardResult<CompletionResponse>>>);

    #[async_trait]
    impl ContentProvider for Scripted {
        async fn complete(&self, _req: &CompletionRequest) -> StoryboardResult<CompletionResponse> {
            let mut replies = self.0.lock().expect("Lock not poisoned");
            if replies.is_empty() {
                Err(ProviderError::new(ProviderErrorKind::EmptyCompletion).into())
            } else {
                replies.remove(0)
            }
        }

        fn provider_name(&self) -> &'static str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "scripted-1"
        }
    }

    async fn run(reply: StoryboardResult<CompletionResponse>, scene_type: SceneType) -> Scene {
        let request = LearningRequestBuilder::default()
            .topic("Communicating with CAPS")
            .build()
            .expect("Valid request");
        let pool = ContentPool::default();
        let settings = GenerationConfig::default();
        let templates = SceneTemplates::new(&request, &pool, settings.words_per_minute);
        let ctx = SceneContext {
            number: 4,
            topic: request.topic(),
            audience: request.audience(),
            outcome_index: 1,
            outcome: "Identify the CAPS types",
            level: TaxonomyLevel::Remember,
            ordinal: 1,
            grounded: Vec::new(),
            previous_titles: Vec::new(),
            settings: &settings,
            templates: &templates,
        };
        let provider = Scripted(Mutex::new(vec![reply]));
        synthesize_scene(&provider, scene_type, &ctx).await
    }

    #[tokio::test]
    async fn provider_scene_is_stamped() {
        let reply = CompletionResponse::new(
            "```json\n{\"title\": \"Spot the type\", \"type\": \"quiz\", \"voiceover\": \"Which type is Maria?\", \
             \"knowledgeCheck\": {\"question\": \"Maria wants results. Which type?\", \"options\": [\"Controller\", \"Supporter\"], \"answer\": 0}}\n```",
        );
        let scene = run(Ok(reply), SceneType::Check).await;

        assert!(!scene.metadata.fallback);
        assert_eq!(scene.number, 4);
        assert_eq!(scene.scene_type, SceneType::Check);
        assert_eq!(scene.metadata.outcome_index, Some(1));
        let quiz = scene.interaction.expect("Quiz attached");
        assert_eq!(quiz.kind, InteractionKind::Quiz);
        assert_eq!(quiz.correct_option, Some(0));
    }

    #[tokio::test]
    async fn malformed_reply_falls_back() {
        let scene = run(Ok(CompletionResponse::new("Sorry, I can't do that.")), SceneType::Teach).await;
        assert!(scene.metadata.fallback);
        assert_eq!(scene.scene_type, SceneType::Teach);
        assert!(!scene.narration.is_empty());
        assert!(!scene.on_screen_text.is_empty());
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let err = ProviderError::new(ProviderErrorKind::Timeout(60)).into();
        let scene = run(Err(err), SceneType::Reflect).await;
        assert!(scene.metadata.fallback);
        assert_eq!(scene.metadata.outcome_index, Some(1));
    }

    #[tokio::test]
    async fn empty_scene_object_falls_back() {
        let scene = run(Ok(CompletionResponse::new("{\"title\": \"Only a title\"}")), SceneType::Show).await;
        assert!(scene.metadata.fallback);
    }
}
