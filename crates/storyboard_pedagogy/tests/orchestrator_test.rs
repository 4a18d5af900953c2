//! Interaction planning across a whole module.

use storyboard_core::{
    InteractionType, LearningRequest, LearningRequestBuilder, LoadConfig, ModuleCategory,
    OutcomeMap, RuleConfig, Scene, SceneMetadata, SceneRole, SceneType, VisualBrief,
};
use storyboard_pedagogy::{
    CognitiveLoadProtector, DensityManager, InteractivityOrchestrator, apply_prescriptions,
};

fn scene(number: u32, scene_type: SceneType, role: SceneRole, outcome: Option<usize>) -> Scene {
    Scene {
        number,
        title: format!("{scene_type} {number}"),
        scene_type,
        narration: "Controllers want results. Supporters want harmony in the team.".to_string(),
        on_screen_text: "- Controllers want results\n- Supporters want harmony".to_string(),
        visual: VisualBrief::default(),
        interaction: None,
        duration_seconds: 75,
        metadata: SceneMetadata {
            outcome_index: outcome,
            role,
            ..Default::default()
        },
    }
}

/// Welcome, five canonical scenes for each of two outcomes, summary.
fn module() -> Vec<Scene> {
    let mut scenes = vec![scene(1, SceneType::Other, SceneRole::Welcome, None)];
    for outcome in 0..2 {
        for scene_type in SceneType::CANONICAL {
            let number = scenes.len() as u32 + 1;
            scenes.push(scene(number, scene_type, SceneRole::Content, Some(outcome)));
        }
    }
    let number = scenes.len() as u32 + 1;
    scenes.push(scene(number, SceneType::Other, SceneRole::Summary, None));
    scenes
}

fn request() -> LearningRequest {
    LearningRequestBuilder::default()
        .topic("Communicating with CAPS")
        .audience("New team leads")
        .build()
        .expect("Valid request")
}

#[test]
fn test_every_prescription_fits_its_window() {
    let load = LoadConfig::new(3, 6);
    let orchestrator = InteractivityOrchestrator::new(load, RuleConfig::default());
    let scenes = module();
    let decisions = orchestrator.prescribe(&scenes, &OutcomeMap::default(), &request());
    assert_eq!(decisions.len(), scenes.len());

    let applied = apply_prescriptions(&scenes, &decisions);
    let protector = CognitiveLoadProtector::new(load);
    let loads: Vec<u32> = applied.iter().map(|s| protector.assess_scene(s)).collect();
    for (i, scene) in applied.iter().enumerate() {
        if scene.interaction.is_none() {
            continue;
        }
        let window: u32 = loads[..=i].iter().rev().take(3).sum();
        assert!(window <= 6, "scene {} window load {window}", scene.number);
    }
}

#[test]
fn test_structural_scenes_never_get_interactions() {
    let orchestrator = InteractivityOrchestrator::default();
    let scenes = module();
    let decisions = orchestrator.prescribe(&scenes, &OutcomeMap::default(), &request());

    assert!(decisions[0].prescription.is_none());
    assert!(decisions[decisions.len() - 1].prescription.is_none());
    assert!(decisions.iter().any(|d| d.prescription.is_some()));
    for d in &decisions {
        assert!((0.0..=1.0).contains(&d.confidence));
    }
}

#[test]
fn test_interaction_cap_is_enforced() {
    let request = LearningRequestBuilder::default()
        .topic("Communicating with CAPS")
        .max_interactions(Some(2usize))
        .build()
        .expect("Valid request");
    let decisions = InteractivityOrchestrator::default().prescribe(
        &module(),
        &OutcomeMap::default(),
        &request,
    );
    let prescribed = decisions.iter().filter(|d| d.prescription.is_some()).count();
    assert!(prescribed <= 2);
}

#[test]
fn test_density_validation_is_idempotent() {
    let orchestrator = InteractivityOrchestrator::default();
    let scenes = module();
    let decisions = orchestrator.prescribe(&scenes, &OutcomeMap::default(), &request());
    let applied = apply_prescriptions(&scenes, &decisions);

    let manager = DensityManager::new();
    let profile = manager.profile_for(manager.infer_category(&request()));
    let first = manager.validate_density(&applied, &profile);
    let second = manager.validate_density(&applied, &profile);
    assert_eq!(first, second);
    assert!((0.0..=1.0).contains(&first.interaction_rate));
}

#[test]
fn test_compliance_profile_gets_more_knowledge_checks_than_general() {
    let scenes = module();
    let orchestrator = InteractivityOrchestrator::default();
    let manager = DensityManager::new();
    let checks = |category: ModuleCategory| {
        let request = LearningRequestBuilder::default()
            .topic("Communicating with CAPS")
            .category_hint(Some(category))
            .build()
            .expect("Valid request");
        let decisions = orchestrator.prescribe(&scenes, &OutcomeMap::default(), &request);
        let applied = apply_prescriptions(&scenes, &decisions);
        let report = manager.validate_density(&applied, &manager.profile_for(category));
        (decisions, report)
    };

    let (compliance, report) = checks(ModuleCategory::Compliance);
    assert!(report.knowledge_checks >= 3, "{report:?}");
    assert!(report.scenarios >= 1, "{report:?}");
    let show = &compliance[7];
    assert_eq!(show.interaction_type(), Some(InteractionType::KnowledgeCheck));
    assert!(show.applicable_rules.iter().any(|r| r == "density-minimums"));

    let (general, general_report) = checks(ModuleCategory::General);
    assert!(general_report.knowledge_checks < report.knowledge_checks);
    let knowledge_checks = general
        .iter()
        .filter(|d| d.interaction_type() == Some(InteractionType::KnowledgeCheck))
        .count();
    assert_eq!(knowledge_checks, 2);
}

#[test]
fn test_optional_interactions_are_skipped_well_above_target() {
    let scenes = module();
    let decisions = InteractivityOrchestrator::default().prescribe(
        &scenes,
        &OutcomeMap::default(),
        &request(),
    );
    // First Show scene keeps its optional reveal; by the second the rate is
    // four in six against a 40% target.
    assert_eq!(decisions[2].interaction_type(), Some(InteractionType::ClickToReveal));
    assert!(decisions[7].prescription.is_none());
    assert_eq!(decisions[7].reason, "Interaction rate well above target");
    assert_eq!(decisions[7].applicable_rules, vec!["show-scene-exploration".to_string()]);
}

