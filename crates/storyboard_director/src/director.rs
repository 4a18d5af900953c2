//! The phase-sequenced generation state machine.

use crate::plan::ModulePlan;
use crate::synthesis::{SceneContext, synthesize_scene};
use crate::{RevisionStrategy, SceneTemplates, StoryboardConfig, WholeStoryboardRevision, repair_structure};
use serde::{Deserialize, Serialize};
use storyboard_analysis::{AnalysisContext, ContentExtractor, OutcomeAnalyzer};
use storyboard_core::{
    ContentPool, GenerationSummary, LearningRequest, OutcomeMap, QualityReport, Scene, Storyboard,
};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::ContentProvider;
use storyboard_pedagogy::{DensityManager, InteractivityOrchestrator, apply_prescriptions};
use storyboard_quality::{QualityGate, QualityValidator};
use tracing::{info, instrument, warn};

/// Revision calls allowed after the first validation.
pub const MAX_REVISION_ATTEMPTS: u32 = 3;
/// Outcomes that must be recovered from source text when none are supplied.
pub const MIN_INFERRED_OUTCOMES: usize = 3;
/// Pool items quoted in each scene prompt.
const GROUNDED_CONTEXT_ITEMS: usize = 8;

/// Pipeline phases, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Phase {
    /// Outcome analysis and content extraction
    #[display("analyze")]
    Analyze,
    /// Job planning
    #[display("plan")]
    Plan,
    /// Scene synthesis
    #[display("synthesize")]
    Synthesize,
    /// Interaction prescription
    #[display("prescribe")]
    Prescribe,
    /// Structural repair
    #[display("repair")]
    Repair,
    /// Quality gate
    #[display("validate")]
    Validate,
    /// Revision after a failed gate
    #[display("revise")]
    Revise,
    /// Terminal state
    #[display("complete")]
    Complete,
}

/// The accepted (or best) storyboard and its final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    /// The storyboard
    pub storyboard: Storyboard,
    /// Quality report for that storyboard
    pub report: QualityReport,
}

/// Runs a learning request through every phase and the bounded revision loop.
///
/// Each call to [`Director::generate`] is independent: analysis results,
/// pools and scene lists live only for that call.
///
/// # Example
///
/// ```rust,ignore
/// use storyboard_director::{Director, StoryboardConfig};
///
/// let director = Director::new(provider, StoryboardConfig::load()?);
/// let outcome = director.generate(&request).await?;
/// println!("{} ({})", outcome.report.overall_score, outcome.report.grade);
/// ```
pub struct Director<P: ContentProvider> {
    provider: P,
    config: StoryboardConfig,
    revision: Box<dyn RevisionStrategy>,
    gate: Box<dyn QualityGate>,
}

impl<P: ContentProvider> Director<P> {
    /// Director with the whole-storyboard revision strategy and the weighted validator.
    pub fn new(provider: P, config: StoryboardConfig) -> Self {
        Self {
            provider,
            config,
            revision: Box::new(WholeStoryboardRevision),
            gate: Box::new(QualityValidator::new()),
        }
    }

    /// Swap the revision strategy.
    pub fn with_revision_strategy(mut self, strategy: impl RevisionStrategy + 'static) -> Self {
        self.revision = Box::new(strategy);
        self
    }

    /// Swap the quality gate.
    pub fn with_gate(mut self, gate: impl QualityGate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &StoryboardConfig {
        &self.config
    }

    /// The content provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generate a storyboard.
    ///
    /// # Errors
    ///
    /// Fails only when no usable outcomes exist: none were supplied and fewer
    /// than [`MIN_INFERRED_OUTCOMES`] could be recovered from the source
    /// text. Provider and parse failures degrade to template scenes, and a
    /// storyboard that never passes the gate is still returned with its
    /// failing report.
    #[instrument(
        skip_all,
        fields(
            topic = %request.topic(),
            mode = ?request.mode(),
            provider = self.provider.provider_name(),
            model = self.provider.model_name()
        )
    )]
    pub async fn generate(&self, request: &LearningRequest) -> StoryboardResult<GenerationOutcome> {
        enter(Phase::Analyze);
        let outcomes = self.resolve_outcomes(request)?;
        let (outcome_map, pool) = analyze(request, &outcomes).await?;

        enter(Phase::Plan);
        let plan = ModulePlan::build(&outcome_map, *request.mode());
        let templates = SceneTemplates::new(request, &pool, self.config.generation.words_per_minute);

        enter(Phase::Synthesize);
        let scenes = self
            .synthesize(request, &plan, &outcome_map, &pool, &templates)
            .await;

        enter(Phase::Prescribe);
        let orchestrator = InteractivityOrchestrator::new(self.config.load, self.config.rules);
        let decisions = orchestrator.prescribe(&scenes, &outcome_map, request);
        let scenes = apply_prescriptions(&scenes, &decisions);
        let density = DensityManager::new();
        let category = density.infer_category(request);
        let density_report = density.validate_density(&scenes, &density.profile_for(category));
        info!(
            valid = density_report.valid,
            interaction_rate = density_report.interaction_rate,
            issues = density_report.issues.len(),
            "Density checked"
        );

        enter(Phase::Repair);
        let scenes = repair_structure(scenes, &outcomes, &templates);

        enter(Phase::Validate);
        let framework = pool.primary_framework().map(|f| f.name.clone());
        let first = Storyboard {
            topic: request.topic().clone(),
            audience: request.audience().clone(),
            duration_minutes: *request.duration_minutes(),
            category,
            outcomes: outcomes.clone(),
            scenes,
            generation: GenerationSummary::default(),
        };
        let report = self.gate.assess(&first, &outcomes, framework.as_deref());
        info!(score = report.overall_score, passed = report.passed, "Initial attempt validated");

        let mut attempts = 1u32;
        let mut revisions = 0u32;
        let mut best_attempt = 1u32;
        let mut best = (first.clone(), report.clone());
        let mut current = (first, report);

        while !current.1.passed && revisions < MAX_REVISION_ATTEMPTS {
            enter(Phase::Revise);
            revisions += 1;
            let revised = match self
                .revision
                .revise(&self.provider, &current.0, &current.1, &self.config.generation)
                .await
            {
                Ok(scenes) => scenes,
                Err(e) => {
                    warn!(revision = revisions, error = %e, "Revision failed, keeping best attempt");
                    break;
                }
            };

            enter(Phase::Repair);
            let candidate = Storyboard {
                scenes: repair_structure(revised, &outcomes, &templates),
                ..current.0.clone()
            };

            enter(Phase::Validate);
            let report = self.gate.assess(&candidate, &outcomes, framework.as_deref());
            attempts += 1;
            info!(
                attempt = attempts,
                score = report.overall_score,
                passed = report.passed,
                "Revised attempt validated"
            );
            if report.overall_score > best.1.overall_score {
                best = (candidate.clone(), report.clone());
                best_attempt = attempts;
            }
            current = (candidate, report);
        }

        let (mut storyboard, report) = best;
        storyboard.generation = GenerationSummary {
            attempts,
            revisions,
            best_attempt,
            provenance: pool.provenance,
        };
        enter(Phase::Complete);
        info!(
            score = report.overall_score,
            grade = %report.grade,
            passed = report.passed,
            scenes = storyboard.scenes.len(),
            attempts,
            best_attempt,
            "Generation complete"
        );
        Ok(GenerationOutcome { storyboard, report })
    }

    /// Supplied outcomes, or outcomes recovered from the source text.
    fn resolve_outcomes(&self, request: &LearningRequest) -> StoryboardResult<Vec<String>> {
        let supplied = request.usable_outcomes();
        if !supplied.is_empty() {
            return Ok(supplied);
        }
        let inferred = OutcomeAnalyzer::new().extract_from_source(request.source_text(), request.topic());
        if inferred.len() < MIN_INFERRED_OUTCOMES {
            warn!(inferred = inferred.len(), "No usable learning outcomes");
            return Err(GenerationError::new(GenerationErrorKind::NoOutcomes {
                supplied: 0,
                inferred: inferred.len(),
                required: MIN_INFERRED_OUTCOMES,
            })
            .into());
        }
        info!(inferred = inferred.len(), "Inferred outcomes from source text");
        Ok(inferred)
    }

    /// Welcome block, one scene per job in order, then the summary.
    async fn synthesize(
        &self,
        request: &LearningRequest,
        plan: &ModulePlan,
        outcome_map: &OutcomeMap,
        pool: &ContentPool,
        templates: &SceneTemplates<'_>,
    ) -> Vec<Scene> {
        let outcomes = outcome_map.outcomes();
        let settings = &self.config.generation;
        let mut scenes = vec![templates.welcome(1), templates.objectives(2, &outcomes)];

        for job in &plan.jobs {
            let outcome = outcomes
                .get(job.outcome_index)
                .map(String::as_str)
                .unwrap_or_default();
            let skip = scenes.len().saturating_sub(settings.context_scenes);
            let ctx = SceneContext {
                number: scenes.len() as u32 + 1,
                topic: request.topic(),
                audience: request.audience(),
                outcome_index: job.outcome_index,
                outcome,
                level: outcome_map.level_of(job.outcome_index).unwrap_or_default(),
                ordinal: job.ordinal,
                grounded: pool.relevant_to(outcome, GROUNDED_CONTEXT_ITEMS),
                previous_titles: scenes.iter().skip(skip).map(|s| s.title.clone()).collect(),
                settings,
                templates,
            };
            scenes.push(synthesize_scene(&self.provider, job.scene_type, &ctx).await);
        }

        let fallbacks = scenes.iter().filter(|s| s.metadata.fallback).count();
        if fallbacks > 0 {
            warn!(fallbacks, jobs = plan.len(), "Some scenes use fallback templates");
        }
        scenes.push(templates.summary(scenes.len() as u32 + 1, &outcomes));
        scenes
    }
}

/// Outcome analysis and content extraction, in parallel on blocking threads.
async fn analyze(
    request: &LearningRequest,
    outcomes: &[String],
) -> StoryboardResult<(OutcomeMap, ContentPool)> {
    let ctx = AnalysisContext::new(request.topic().clone(), request.audience());
    let for_map = outcomes.to_vec();
    let for_pool = outcomes.to_vec();
    let source = request.source_text().clone();
    let topic = request.topic().clone();

    let (map, pool) = tokio::try_join!(
        tokio::task::spawn_blocking(move || OutcomeAnalyzer::new().build_map(&for_map, &ctx)),
        tokio::task::spawn_blocking(move || ContentExtractor::new().extract(&source, &for_pool, &topic)),
    )
    .map_err(|e| GenerationError::new(GenerationErrorKind::TaskFailed(e.to_string())))?;

    info!(
        outcomes = map.len(),
        levels = ?map.taxonomy_progression,
        provenance = ?pool.provenance,
        frameworks = pool.frameworks.len(),
        "Analysis complete"
    );
    Ok((map, pool))
}

fn enter(phase: Phase) {
    info!(%phase, "Entering phase");
}
