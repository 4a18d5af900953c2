//! Scoring for the five quality dimensions.

use crate::findings::Findings;
use storyboard_analysis::{classify_verb, subject_keywords};
use storyboard_core::{
    DimensionScore, InteractionKind, QualityDimension, Scene, SceneRole, SceneType, Severity,
    Storyboard, TaxonomyLevel, text,
};

/// Keyword overlap at which an untagged scene counts as addressing an outcome.
const KEYWORD_MATCH: f64 = 0.5;
/// Regressions flagged per storyboard.
const MAX_REGRESSIONS: usize = 3;
const MAX_TEACH_NARRATION_WORDS: usize = 250;
const MAX_ON_SCREEN_WORDS: usize = 70;
/// Longest acceptable run of content scenes without an interaction.
const MAX_PASSIVE_RUN: usize = 3;

/// Words that mark an Apply scene as a concrete situation rather than a restatement.
const SCENARIO_CUES: &[&str] = &[
    "scenario",
    "imagine",
    "suppose",
    "situation",
    "case study",
    "you are",
    "your team",
    "customer",
    "colleague",
    "client",
    "manager",
    "patient",
];

/// Content scenes that address an outcome.
///
/// Scenes tagged with an outcome index match on the index; untagged scenes
/// match when they share at least half of the outcome's keywords.
pub(crate) fn addressing<'a>(storyboard: &'a Storyboard, index: usize, outcome: &str) -> Vec<&'a Scene> {
    let subject = text::keywords(outcome);
    storyboard
        .content_scenes()
        .filter(|s| match s.metadata.outcome_index {
            Some(i) => i == index,
            None => text::keyword_overlap(&subject, &s.full_text()) >= KEYWORD_MATCH,
        })
        .collect()
}

pub(crate) fn outcome_alignment(storyboard: &Storyboard, outcomes: &[String]) -> DimensionScore {
    let mut findings = Findings::new(QualityDimension::OutcomeAlignment);

    for (index, outcome) in outcomes.iter().enumerate() {
        let scenes = addressing(storyboard, index, outcome);
        if scenes.is_empty() {
            findings.flag(
                Severity::Critical,
                15,
                None,
                format!("Outcome {} is not addressed by any scene: {outcome}", index + 1),
                format!("Add a Teach-Show-Apply-Check-Reflect sequence for \"{outcome}\""),
            );
            continue;
        }

        for scene_type in SceneType::CANONICAL {
            if !scenes.iter().any(|s| s.scene_type == scene_type) {
                findings.flag(
                    Severity::Medium,
                    3,
                    scenes.first().map(|s| s.number),
                    format!("Outcome {} has no {scene_type} scene", index + 1),
                    format!("Add a {scene_type} scene for \"{outcome}\""),
                );
            }
        }

        if scenes.iter().all(|s| s.metadata.placeholder) {
            findings.flag(
                Severity::High,
                5,
                scenes.first().map(|s| s.number),
                format!("Outcome {} is covered only by placeholder scenes", index + 1),
                format!("Write real content for \"{outcome}\""),
            );
        }

        let checks: Vec<&&Scene> = scenes
            .iter()
            .filter(|s| s.scene_type == SceneType::Check)
            .collect();
        if !checks.is_empty() && checks.iter().all(|s| !s.is_interactive()) {
            findings.flag(
                Severity::High,
                5,
                checks.first().map(|s| s.number),
                format!("Outcome {} is never assessed", index + 1),
                format!("Give the Check scene for \"{outcome}\" a knowledge check"),
            );
        }
    }

    if !outcomes.is_empty() && !findings.has_issues_at(Severity::Critical) {
        findings.strength(format!("All {} outcomes are addressed", outcomes.len()));
    }
    if !outcomes.is_empty() && findings.is_clean() {
        findings.strength("Every outcome runs the full Teach-Show-Apply-Check-Reflect cycle");
    }
    findings.finish()
}

pub(crate) fn pedagogical_structure(storyboard: &Storyboard, outcomes: &[String]) -> DimensionScore {
    let mut findings = Findings::new(QualityDimension::PedagogicalStructure);

    let has_welcome = storyboard
        .scenes
        .iter()
        .any(|s| s.metadata.role == SceneRole::Welcome || text::contains_ci(&s.title, "welcome"));
    if has_welcome {
        findings.strength("Module opens with a welcome");
    } else {
        findings.flag(
            Severity::Low,
            5,
            None,
            "No welcome scene",
            "Open the module with a welcome that states what learners will achieve",
        );
    }

    for (index, outcome) in outcomes.iter().enumerate() {
        let scenes = addressing(storyboard, index, outcome);
        let positions: Vec<(u32, usize)> = scenes
            .iter()
            .filter_map(|s| s.scene_type.canonical_position().map(|p| (s.number, p)))
            .collect();
        if let Some(pair) = positions.windows(2).find(|w| w[1].1 < w[0].1) {
            findings.flag(
                Severity::Medium,
                5,
                Some(pair[1].0),
                format!("Scenes for outcome {} are out of order", index + 1),
                "Order each outcome's scenes Teach, Show, Apply, Check, Reflect",
            );
        }
    }

    check_progression(storyboard, outcomes, &mut findings);

    let target = u64::from(storyboard.duration_minutes) * 60;
    if target > 0 {
        let actual = u64::from(storyboard.total_seconds());
        if actual * 2 < target {
            findings.flag(
                Severity::High,
                10,
                None,
                format!(
                    "Running time {}s is under half the {}-minute target",
                    actual, storyboard.duration_minutes
                ),
                "Add scenes or extend narration to reach the target duration",
            );
        } else if actual * 2 > target * 3 {
            findings.flag(
                Severity::Medium,
                5,
                None,
                format!(
                    "Running time {}s exceeds the {}-minute target by more than half",
                    actual, storyboard.duration_minutes
                ),
                "Tighten narration or merge scenes",
            );
        } else {
            findings.strength("Running time is close to the target");
        }
    }

    for scene in storyboard
        .scenes
        .iter()
        .filter(|s| s.scene_type == SceneType::Teach)
    {
        let words = text::word_count(&scene.narration);
        if words > MAX_TEACH_NARRATION_WORDS {
            findings.flag(
                Severity::Low,
                3,
                Some(scene.number),
                format!("Teach narration runs {words} words"),
                "Split long explanations across scenes",
            );
        }
    }

    findings.finish()
}

/// Flag outcomes whose level drops below that of an earlier related outcome.
///
/// Outcomes are related when they share a subject keyword. Unrelated outcomes
/// may appear at any level in any order.
fn check_progression(storyboard: &Storyboard, outcomes: &[String], findings: &mut Findings) {
    let levels: Vec<TaxonomyLevel> = outcomes
        .iter()
        .map(|o| classify_verb(o).unwrap_or_default())
        .collect();
    let subjects: Vec<_> = outcomes.iter().map(|o| subject_keywords(o)).collect();

    let mut flagged = 0;
    for i in 1..outcomes.len() {
        if flagged == MAX_REGRESSIONS {
            break;
        }
        let peak = (0..i)
            .filter(|&j| !subjects[i].is_disjoint(&subjects[j]))
            .map(|j| levels[j])
            .max();
        if let Some(peak) = peak
            && levels[i] < peak
        {
            findings.flag(
                Severity::Low,
                3,
                addressing(storyboard, i, &outcomes[i]).first().map(|s| s.number),
                format!(
                    "Outcome {} drops to {} after a related {} outcome",
                    i + 1,
                    levels[i],
                    peak
                ),
                "Order related outcomes from lower to higher cognitive level",
            );
            flagged += 1;
        }
    }
}

pub(crate) fn framework_integration(storyboard: &Storyboard, framework: Option<&str>) -> DimensionScore {
    let mut findings = Findings::new(QualityDimension::FrameworkIntegration);
    let content: Vec<&Scene> = storyboard.content_scenes().collect();
    let applies: Vec<&&Scene> = content
        .iter()
        .filter(|s| s.scene_type == SceneType::Apply)
        .collect();

    match framework.map(str::trim).filter(|f| !f.is_empty()) {
        Some(name) => {
            let mentions = |s: &Scene| text::contains_ci(&s.full_text(), name);
            let anywhere = storyboard.scenes.iter().any(|s| mentions(s));
            let in_content = content.iter().filter(|s| mentions(s)).count();

            if !anywhere {
                findings.flag(
                    Severity::Critical,
                    30,
                    None,
                    format!("{name} is never mentioned"),
                    format!("Teach {name} explicitly and use it in examples and practice"),
                );
            } else {
                if in_content * 3 < content.len() {
                    findings.flag(
                        Severity::Medium,
                        10,
                        None,
                        format!(
                            "{name} appears in only {in_content} of {} content scenes",
                            content.len()
                        ),
                        format!("Refer to {name} throughout the module, not only where it is introduced"),
                    );
                } else {
                    findings.strength(format!(
                        "{name} appears in {in_content} of {} content scenes",
                        content.len()
                    ));
                }
                if !applies.is_empty() && !applies.iter().any(|s| mentions(s)) {
                    findings.flag(
                        Severity::Medium,
                        5,
                        applies.first().map(|s| s.number),
                        format!("{name} is never used in practice"),
                        format!("Have learners apply {name} in the Apply scenes"),
                    );
                }
            }
        }
        None => {
            for scene in &applies {
                if !has_scenario_cue(scene) {
                    findings.flag(
                        Severity::Low,
                        5,
                        Some(scene.number),
                        "Apply scene has no concrete situation",
                        "Set practice in a realistic workplace situation",
                    );
                }
            }
            if !applies.is_empty() && findings.is_clean() {
                findings.strength("Practice is set in concrete situations");
            }
        }
    }

    findings.finish()
}

fn has_scenario_cue(scene: &Scene) -> bool {
    if scene
        .interaction
        .as_ref()
        .and_then(|i| i.prescribed_as)
        .is_some_and(|t| t.is_scenario())
    {
        return true;
    }
    let prompt = scene.interaction.as_ref().map_or("", |i| i.prompt.as_str());
    let haystack = format!("{}\n{prompt}", scene.full_text());
    SCENARIO_CUES.iter().any(|cue| text::contains_ci(&haystack, cue))
}

pub(crate) fn interactivity_quality(storyboard: &Storyboard) -> DimensionScore {
    let mut findings = Findings::new(QualityDimension::InteractivityQuality);
    let interactive: Vec<&Scene> = storyboard
        .scenes
        .iter()
        .filter(|s| s.is_interactive())
        .collect();

    if interactive.is_empty() {
        findings.flag(
            Severity::Critical,
            40,
            None,
            "Storyboard has no interactions",
            "Add knowledge checks to Check scenes and practice to Apply scenes",
        );
    }
    let has_quiz = interactive
        .iter()
        .filter_map(|s| s.interaction.as_ref())
        .any(|i| i.kind == InteractionKind::Quiz);
    if !has_quiz {
        findings.flag(
            Severity::High,
            15,
            None,
            "No knowledge check anywhere in the module",
            "Add at least one multiple-choice knowledge check",
        );
    }

    for scene in storyboard
        .scenes
        .iter()
        .filter(|s| s.scene_type == SceneType::Check && !s.is_interactive())
    {
        findings.flag(
            Severity::High,
            10,
            Some(scene.number),
            "Check scene has no interaction",
            "Give every Check scene a knowledge check",
        );
    }

    for scene in &interactive {
        let Some(interaction) = &scene.interaction else {
            continue;
        };
        if interaction.kind == InteractionKind::Quiz {
            if interaction.options.len() < 2 {
                findings.flag(
                    Severity::Medium,
                    5,
                    Some(scene.number),
                    format!("Quiz has {} options", interaction.options.len()),
                    "Give every quiz at least two options",
                );
            }
            if interaction
                .correct_option
                .is_none_or(|c| c >= interaction.options.len())
            {
                findings.flag(
                    Severity::High,
                    5,
                    Some(scene.number),
                    "Quiz answer is missing or out of range",
                    "Mark exactly one listed option as correct",
                );
            }
        }
        if interaction.prompt.trim().is_empty() {
            findings.flag(
                Severity::Medium,
                5,
                Some(scene.number),
                format!("{} has an empty prompt", interaction.kind),
                "Write a prompt that tells learners what to do",
            );
        }
        if interaction.feedback.trim().is_empty() {
            findings.flag(
                Severity::Low,
                3,
                Some(scene.number),
                format!("{} has no feedback", interaction.kind),
                "Add feedback that explains the answer",
            );
        }
    }

    let mut run: Vec<u32> = Vec::new();
    let mut runs: Vec<Vec<u32>> = Vec::new();
    for scene in storyboard.content_scenes() {
        if scene.is_interactive() {
            runs.push(std::mem::take(&mut run));
        } else {
            run.push(scene.number);
        }
    }
    runs.push(run);
    for passive in runs.into_iter().filter(|r| r.len() > MAX_PASSIVE_RUN) {
        findings.flag(
            Severity::Medium,
            5,
            passive.first().copied(),
            format!("{} content scenes in a row without an interaction", passive.len()),
            "Break up long passive stretches with an interaction",
        );
    }

    if !interactive.is_empty() {
        findings.strength(format!(
            "{} interactive scenes across {} scenes",
            interactive.len(),
            storyboard.scenes.len()
        ));
    }
    findings.finish()
}

pub(crate) fn production_readiness(storyboard: &Storyboard) -> DimensionScore {
    let mut findings = Findings::new(QualityDimension::ProductionReadiness);

    for scene in &storyboard.scenes {
        let n = Some(scene.number);
        if scene.on_screen_text.trim().is_empty() {
            findings.flag(Severity::High, 5, n, "Missing on-screen text", "Add on-screen text");
        }
        if scene.narration.trim().is_empty() {
            findings.flag(Severity::High, 5, n, "Missing narration", "Write narration for the scene");
        }
        if scene.visual.prompt.trim().is_empty() {
            findings.flag(Severity::Medium, 3, n, "Missing visual direction", "Describe the visual");
        }
        if scene.visual.alt_text.trim().is_empty() {
            findings.flag(Severity::Low, 2, n, "Missing alt text", "Add alt text for the visual");
        }
        let words = text::word_count(&scene.on_screen_text);
        if words > MAX_ON_SCREEN_WORDS {
            findings.flag(
                Severity::Low,
                2,
                n,
                format!("On-screen text runs {words} words"),
                "Move detail from the screen into narration",
            );
        }
        if scene.title.trim().is_empty() {
            findings.flag(Severity::Low, 2, n, "Missing title", "Give the scene a title");
        }
        if scene.metadata.placeholder {
            findings.flag(
                Severity::Medium,
                3,
                n,
                "Placeholder scene",
                "Replace the placeholder with real content",
            );
        }
        if scene.metadata.fallback {
            findings.flag(
                Severity::Low,
                2,
                n,
                "Scene was generated from a fallback template",
                "Regenerate the scene from the source material",
            );
        }
    }

    if !storyboard.scenes.is_empty() && findings.is_clean() {
        findings.strength("Every scene is ready for production");
    }
    findings.finish()
}
