//! Per-scene interaction decisions under a load budget, plus global passes.

use crate::density::RATE_TOLERANCE_ABOVE;
use crate::{
    CognitiveLoadProtector, DensityManager, DensityProgress, RuleContext, RuleEngine,
    RuleEvaluation,
};
use std::collections::BTreeMap;
use storyboard_core::{
    DensityProfile, InteractionDecision, InteractionPrescription, InteractionPurpose,
    InteractionType, LearningRequest, LoadConfig, OutcomeMap, PrescriptionPriority, RuleConfig,
    Scene, SceneType, TaxonomyLevel, TimingHint,
};
use tracing::{debug, info, instrument};

/// Confidence assigned to interactions added only to meet a requested distribution.
const BACKFILL_CONFIDENCE: f64 = 0.4;
/// Confidence penalty after falling back to a simpler interaction.
const SIMPLIFICATION_PENALTY: f64 = 0.15;

/// Decides, for every scene, whether to add an interaction and which one.
///
/// Each content scene goes through the [`RuleEngine`]; the winning
/// recommendation is checked against the [`CognitiveLoadProtector`]. When it
/// does not fit, the next lighter type is tried once before giving up.
/// A running [`DensityProgress`] steers the rules toward the profile's
/// minimum checks and scenarios, and Optional winners are skipped while the
/// interaction rate sits well above target. Two deterministic global passes then enforce a requested type
/// distribution and a total cap.
#[derive(Debug, Clone, Default)]
pub struct InteractivityOrchestrator {
    protector: CognitiveLoadProtector,
    rules: RuleEngine,
    density: DensityManager,
}

impl InteractivityOrchestrator {
    /// Create an orchestrator from a load budget and gap thresholds.
    pub fn new(load: LoadConfig, rules: RuleConfig) -> Self {
        Self {
            protector: CognitiveLoadProtector::new(load),
            rules: RuleEngine::new(rules),
            density: DensityManager::new(),
        }
    }

    /// The load protector in use.
    pub fn protector(&self) -> &CognitiveLoadProtector {
        &self.protector
    }

    /// One decision per scene, in scene order.
    #[instrument(skip_all, fields(scenes = scenes.len(), outcomes = outcomes.len()))]
    pub fn prescribe(
        &self,
        scenes: &[Scene],
        outcomes: &OutcomeMap,
        request: &LearningRequest,
    ) -> Vec<InteractionDecision> {
        let category = self.density.infer_category(request);
        let profile = self.density.profile_for(category);

        let mut decisions = Vec::with_capacity(scenes.len());
        let mut loads: Vec<u32> = Vec::with_capacity(scenes.len());
        let mut scenes_since = 0usize;
        let mut seconds_since = 0u32;
        let outlook = outlook(scenes, outcomes);
        let mut progress = DensityProgress::default();

        for (scene, ahead) in scenes.iter().zip(outlook) {
            let content_load = self.protector.content_load(scene);

            if scene.is_structural() {
                decisions.push(InteractionDecision::none(scene.number, "Structural scene"));
                loads.push(content_load);
                scenes_since += 1;
                seconds_since = seconds_since.saturating_add(scene.duration_seconds);
                continue;
            }

            let level = scene
                .metadata
                .outcome_index
                .and_then(|i| outcomes.level_of(i));
            let ctx = RuleContext {
                scene,
                level,
                scenes_since_interaction: scenes_since,
                minutes_since_interaction: f64::from(seconds_since) / 60.0,
                profile: &profile,
                progress: DensityProgress {
                    checks_ahead: ahead.checks,
                    scenarios_ahead: ahead.scenarios,
                    check_openings: ahead.check_openings,
                    scenario_openings: ahead.scenario_openings,
                    ..progress
                },
            };
            let evaluation = self.rules.evaluate(&ctx);
            let decision = if above_target(&evaluation, &progress, &profile) {
                debug!(scene = scene.number, rate = progress.interaction_rate(), "Skipping optional interaction");
                InteractionDecision {
                    applicable_rules: evaluation
                        .applicable
                        .iter()
                        .map(|r| r.rule_id.to_string())
                        .collect(),
                    ..InteractionDecision::none(scene.number, "Interaction rate well above target")
                }
            } else {
                self.decide(scene, &evaluation, &loads)
            };
            progress.record(decision.interaction_type());

            match decision.interaction_type() {
                Some(t) => {
                    loads.push(content_load + t.cognitive_load());
                    scenes_since = 0;
                    seconds_since = 0;
                }
                None => {
                    loads.push(content_load);
                    scenes_since += 1;
                    seconds_since = seconds_since.saturating_add(scene.duration_seconds);
                }
            }
            decisions.push(decision);
        }

        if let Some(distribution) = request.interaction_distribution() {
            enforce_distribution(&mut decisions, scenes, distribution);
        }
        if let Some(cap) = request.max_interactions() {
            enforce_cap(&mut decisions, *cap);
        }

        let prescribed = decisions.iter().filter(|d| d.prescription.is_some()).count();
        info!(%category, prescribed, scenes = scenes.len(), "Interactions prescribed");
        decisions
    }

    fn decide(&self, scene: &Scene, evaluation: &RuleEvaluation, loads: &[u32]) -> InteractionDecision {
        let applicable_rules: Vec<String> = evaluation
            .applicable
            .iter()
            .map(|r| r.rule_id.to_string())
            .collect();
        let Some(winner) = &evaluation.recommendation else {
            return InteractionDecision::none(scene.number, "No rule applies");
        };

        let mut candidate = winner.interaction_type;
        let mut simplified = false;
        let mut check = self
            .protector
            .validate_addition(scene, candidate.cognitive_load(), loads);
        if !check.safe
            && let Some(lighter) = candidate.lighter()
        {
            debug!(scene = scene.number, from = %candidate, to = %lighter, projected = check.projected_load, "Simplifying interaction");
            candidate = lighter;
            simplified = true;
            check = self
                .protector
                .validate_addition(scene, candidate.cognitive_load(), loads);
        }

        if !check.safe {
            debug!(scene = scene.number, projected = check.projected_load, "Load ceiling reached, no interaction fits");
            return InteractionDecision {
                applicable_rules,
                ..InteractionDecision::none(scene.number, "Load ceiling reached")
            };
        }

        let mut alternatives: Vec<InteractionType> = Vec::new();
        for rec in &evaluation.applicable {
            if rec.interaction_type != candidate && !alternatives.contains(&rec.interaction_type) {
                alternatives.push(rec.interaction_type);
            }
        }

        let ceiling = *self.protector.config().ceiling();
        let headroom = if ceiling == 0 {
            0.0
        } else {
            f64::from(ceiling.saturating_sub(check.projected_load)) / f64::from(ceiling)
        };
        let mut confidence = 0.5 + 0.1 * applicable_rules.len().min(3) as f64 + 0.2 * headroom;
        if simplified {
            confidence -= SIMPLIFICATION_PENALTY;
        }
        let confidence = confidence.clamp(0.0, 1.0);

        let reason = if simplified {
            format!(
                "{} ({} simplified to {} to stay within the load budget)",
                winner.rule_id, winner.interaction_type, candidate
            )
        } else {
            winner.rule_id.to_string()
        };

        InteractionDecision {
            scene_number: scene.number,
            prescription: Some(InteractionPrescription {
                needed: true,
                interaction_type: candidate,
                purpose: winner.purpose,
                rationale: winner.rationale.clone(),
                timing: winner.timing,
                cognitive_load: candidate.cognitive_load(),
                duration_seconds: candidate.duration_seconds(),
                priority: winner.priority,
            }),
            confidence,
            applicable_rules,
            alternatives,
            reason,
        }
    }
}

/// Forward-looking counts for one scene.
#[derive(Debug, Clone, Copy, Default)]
struct Outlook {
    checks: usize,
    scenarios: usize,
    check_openings: usize,
    scenario_openings: usize,
}

/// Per scene, what later Check scenes will cover and which openings remain.
fn outlook(scenes: &[Scene], outcomes: &OutcomeMap) -> Vec<Outlook> {
    let mut running = Outlook::default();
    let mut out = vec![Outlook::default(); scenes.len()];
    for (i, scene) in scenes.iter().enumerate().rev() {
        if scene.is_structural() {
            out[i] = running;
            continue;
        }
        match scene.scene_type {
            SceneType::Teach | SceneType::Show => running.check_openings += 1,
            SceneType::Apply => running.scenario_openings += 1,
            _ => {}
        }
        out[i] = running;
        if scene.scene_type == SceneType::Check {
            let level = scene
                .metadata
                .outcome_index
                .and_then(|index| outcomes.level_of(index));
            if level.is_some_and(|l| l >= TaxonomyLevel::Analyze) {
                running.scenarios += 1;
            } else {
                running.checks += 1;
            }
        }
    }
    out
}

/// An Optional winner while the rate so far is already well above target.
fn above_target(evaluation: &RuleEvaluation, progress: &DensityProgress, profile: &DensityProfile) -> bool {
    evaluation
        .recommendation
        .as_ref()
        .is_some_and(|r| r.priority == PrescriptionPriority::Optional)
        && progress.interaction_rate() > profile.target_interaction_rate() + RATE_TOLERANCE_ABOVE
}

/// Bring per-type counts to the requested distribution.
///
/// Types missing from the distribution are dropped. Surplus prescriptions
/// are dropped lowest (priority, confidence) first, later scenes first on
/// ties. Shortfalls are backfilled into uninteractive content scenes,
/// preferring scene types that suit the interaction.
fn enforce_distribution(
    decisions: &mut [InteractionDecision],
    scenes: &[Scene],
    distribution: &BTreeMap<InteractionType, usize>,
) {
    for decision in decisions.iter_mut() {
        if let Some(t) = decision.interaction_type()
            && distribution.get(&t).copied().unwrap_or(0) == 0
        {
            drop_prescription(decision, "Type not in requested distribution");
        }
    }

    for (&interaction_type, &wanted) in distribution {
        let mut holders: Vec<usize> = decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.interaction_type() == Some(interaction_type))
            .map(|(i, _)| i)
            .collect();

        if holders.len() > wanted {
            holders.sort_by(|&a, &b| {
                rank(&decisions[a])
                    .partial_cmp(&rank(&decisions[b]))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.cmp(&a))
            });
            let surplus = holders.len() - wanted;
            for &i in holders.iter().take(surplus) {
                drop_prescription(&mut decisions[i], "Exceeds requested distribution");
            }
            continue;
        }

        let mut missing = wanted - holders.len();
        if missing == 0 {
            continue;
        }
        let free: Vec<usize> = (0..decisions.len())
            .filter(|&i| decisions[i].prescription.is_none() && !scenes[i].is_structural())
            .collect();
        let (suited, other): (Vec<usize>, Vec<usize>) = free
            .into_iter()
            .partition(|&i| suits(interaction_type, scenes[i].scene_type));
        for i in suited.into_iter().chain(other) {
            if missing == 0 {
                break;
            }
            backfill(&mut decisions[i], interaction_type);
            missing -= 1;
        }
        if missing > 0 {
            debug!(%interaction_type, missing, "Not enough free scenes to meet distribution");
        }
    }
}

/// Keep the `cap` strongest prescriptions by (priority, confidence, scene order).
fn enforce_cap(decisions: &mut [InteractionDecision], cap: usize) {
    let mut holders: Vec<usize> = decisions
        .iter()
        .enumerate()
        .filter(|(_, d)| d.prescription.is_some())
        .map(|(i, _)| i)
        .collect();
    if holders.len() <= cap {
        return;
    }
    holders.sort_by(|&a, &b| {
        rank(&decisions[b])
            .partial_cmp(&rank(&decisions[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    for &i in holders.iter().skip(cap) {
        drop_prescription(&mut decisions[i], "Exceeds interaction cap");
    }
}

fn rank(decision: &InteractionDecision) -> (PrescriptionPriority, f64) {
    let priority = decision
        .prescription
        .as_ref()
        .map_or(PrescriptionPriority::Optional, |p| p.priority);
    (priority, decision.confidence)
}

fn drop_prescription(decision: &mut InteractionDecision, reason: &str) {
    if let Some(t) = decision.interaction_type() {
        decision.alternatives.insert(0, t);
    }
    decision.prescription = None;
    decision.confidence = 0.0;
    decision.reason = reason.to_string();
}

fn backfill(decision: &mut InteractionDecision, interaction_type: InteractionType) {
    decision.prescription = Some(InteractionPrescription {
        needed: true,
        interaction_type,
        purpose: InteractionPurpose::Distribution,
        rationale: "Added to meet the requested interaction distribution".to_string(),
        timing: TimingHint::AfterContent,
        cognitive_load: interaction_type.cognitive_load(),
        duration_seconds: interaction_type.duration_seconds(),
        priority: PrescriptionPriority::Optional,
    });
    decision.confidence = BACKFILL_CONFIDENCE;
    decision.reason = "Backfilled to meet requested distribution".to_string();
}

fn suits(interaction_type: InteractionType, scene_type: SceneType) -> bool {
    match interaction_type {
        InteractionType::KnowledgeCheck => scene_type == SceneType::Check,
        InteractionType::Scenario
        | InteractionType::BranchingScenario
        | InteractionType::Simulation => {
            matches!(scene_type, SceneType::Apply | SceneType::Check)
        }
        InteractionType::DragMatch => matches!(scene_type, SceneType::Teach | SceneType::Apply),
        InteractionType::ClickToReveal => matches!(scene_type, SceneType::Show | SceneType::Teach),
        InteractionType::Reflection => scene_type == SceneType::Reflect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_core::{
        LearningRequestBuilder, ModuleCategory, OutcomeAnalysis, SceneMetadata, SceneRole,
        TaxonomyLevel, VisualBrief,
    };

    fn scene(number: u32, scene_type: SceneType, role: SceneRole) -> Scene {
        Scene {
            number,
            title: format!("Scene {number}"),
            scene_type,
            narration: "Short narration.".to_string(),
            on_screen_text: "- One point".to_string(),
            visual: VisualBrief::default(),
            interaction: None,
            duration_seconds: 60,
            metadata: SceneMetadata {
                outcome_index: (role == SceneRole::Content).then_some(0),
                role,
                ..Default::default()
            },
        }
    }

    fn module() -> Vec<Scene> {
        let mut scenes = vec![
            scene(1, SceneType::Other, SceneRole::Welcome),
            scene(2, SceneType::Other, SceneRole::Welcome),
        ];
        for (i, t) in SceneType::CANONICAL.iter().enumerate() {
            scenes.push(scene(3 + i as u32, *t, SceneRole::Content));
        }
        scenes.push(scene(8, SceneType::Other, SceneRole::Summary));
        scenes
    }

    fn outcomes(level: TaxonomyLevel) -> OutcomeMap {
        OutcomeMap::from_analyses(vec![OutcomeAnalysis {
            index: 0,
            outcome: "Outcome".to_string(),
            taxonomy_level: level,
            complexity: 5,
            prerequisites: Vec::new(),
            scene_requirements: Vec::new(),
            estimated_scenes: 5,
        }])
    }

    fn request() -> LearningRequestBuilder {
        let mut builder = LearningRequestBuilder::default();
        builder.topic("Medieval poetry");
        builder
    }

    #[test]
    fn one_decision_per_scene_and_structural_scenes_stay_bare() {
        let scenes = module();
        let decisions = InteractivityOrchestrator::default().prescribe(
            &scenes,
            &outcomes(TaxonomyLevel::Apply),
            &request().build().expect("Valid request"),
        );
        assert_eq!(decisions.len(), scenes.len());
        assert!(decisions[0].prescription.is_none());
        assert!(decisions[7].prescription.is_none());

        let check = decisions[5].prescription.as_ref().expect("Check prescribed");
        assert_eq!(check.interaction_type, InteractionType::KnowledgeCheck);
        assert_eq!(check.priority, PrescriptionPriority::Required);
        for d in &decisions {
            assert!((0.0..=1.0).contains(&d.confidence));
        }
    }

    #[test]
    fn heavy_interactions_are_simplified_under_a_tight_budget() {
        let scenes = module();
        let orchestrator = InteractivityOrchestrator::new(LoadConfig::new(3, 7), RuleConfig::default());
        let request = request()
            .category_hint(Some(ModuleCategory::Onboarding))
            .build()
            .expect("Valid request");
        let decisions = orchestrator.prescribe(&scenes, &outcomes(TaxonomyLevel::Create), &request);
        // Onboarding's single knowledge check lands on Show, the last opening
        // before a Check scene that asks a scenario question. Apply at Create
        // level wants a branching scenario (load 3). Prior loads of 1 and 3
        // plus the scene's own unit leave room for 2.
        let apply = &decisions[4];
        let chosen = apply.interaction_type().expect("Something fits");
        assert!(chosen.cognitive_load() < InteractionType::BranchingScenario.cognitive_load());
        assert!(apply.reason.contains("simplified"));
    }

    #[test]
    fn loads_never_exceed_ceiling() {
        let scenes = module();
        let config = LoadConfig::new(3, 5);
        let orchestrator = InteractivityOrchestrator::new(config, RuleConfig::default());
        let decisions = orchestrator.prescribe(
            &scenes,
            &outcomes(TaxonomyLevel::Evaluate),
            &request().build().expect("Valid request"),
        );
        let loads: Vec<u32> = scenes
            .iter()
            .zip(&decisions)
            .map(|(s, d)| {
                orchestrator.protector().content_load(s)
                    + d.interaction_type().map_or(0, InteractionType::cognitive_load)
            })
            .collect();
        for w in loads.windows(3) {
            assert!(w.iter().sum::<u32>() <= 5, "window {w:?} over budget");
        }
    }

    #[test]
    fn distribution_drops_unlisted_and_backfills() {
        let scenes = module();
        let mut distribution = BTreeMap::new();
        distribution.insert(InteractionType::KnowledgeCheck, 1);
        distribution.insert(InteractionType::ClickToReveal, 2);
        let request = request()
            .interaction_distribution(Some(distribution))
            .build()
            .expect("Valid request");
        let decisions = InteractivityOrchestrator::default().prescribe(
            &scenes,
            &outcomes(TaxonomyLevel::Apply),
            &request,
        );
        let count = |t| decisions.iter().filter(|d| d.interaction_type() == Some(t)).count();
        assert_eq!(count(InteractionType::KnowledgeCheck), 1);
        assert_eq!(count(InteractionType::ClickToReveal), 2);
        assert_eq!(count(InteractionType::Reflection), 0);
        assert_eq!(count(InteractionType::Scenario), 0);
        assert!(decisions.iter().all(|d| {
            d.prescription.is_none() || d.interaction_type().is_some_and(|t| {
                t == InteractionType::KnowledgeCheck || t == InteractionType::ClickToReveal
            })
        }));
    }

    #[test]
    fn cap_keeps_required_first() {
        let scenes = module();
        let request = request()
            .max_interactions(Some(1))
            .build()
            .expect("Valid request");
        let decisions = InteractivityOrchestrator::default().prescribe(
            &scenes,
            &outcomes(TaxonomyLevel::Apply),
            &request,
        );
        let kept: Vec<&InteractionDecision> =
            decisions.iter().filter(|d| d.prescription.is_some()).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].scene_number, 6);
    }

    #[test]
    fn outlook_counts_later_checks_by_level() {
        let mut scenes = module();
        scenes.insert(7, scene(8, SceneType::Check, SceneRole::Content));
        let ahead = outlook(&scenes, &outcomes(TaxonomyLevel::Analyze));
        // Teach sees two Check scenes ahead, both asking scenario questions.
        assert_eq!(ahead[2].scenarios, 2);
        assert_eq!(ahead[2].checks, 0);
        assert_eq!(ahead[2].check_openings, 2);
        assert_eq!(ahead[2].scenario_openings, 1);
        assert_eq!(ahead[5].scenarios, 1);
        assert_eq!(ahead[5].scenario_openings, 0);
        assert_eq!(ahead[8].scenarios, 0);
    }
}
