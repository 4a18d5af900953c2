//! Prioritized pedagogical rules.

use storyboard_core::{
    DensityProfile, InteractionPurpose, InteractionType, PrescriptionPriority, RuleConfig, Scene,
    SceneType, TaxonomyLevel, TimingHint,
};
use tracing::debug;

/// Minimum on-screen lines before a Teach scene is chunked with a reveal.
const PROGRESSIVE_MIN_LINES: usize = 4;
/// Minimum on-screen items before a Teach scene is turned into a sort.
const CATEGORISATION_MIN_ITEMS: usize = 3;

/// Everything a rule may look at for one scene.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Scene under consideration
    pub scene: &'a Scene,
    /// Taxonomy level of the scene's outcome, if it has one
    pub level: Option<TaxonomyLevel>,
    /// Consecutive earlier scenes without an interaction
    pub scenes_since_interaction: usize,
    /// Running time of those scenes in minutes
    pub minutes_since_interaction: f64,
    /// Density profile of the module
    pub profile: &'a DensityProfile,
    /// Interactions decided so far and openings still ahead
    pub progress: DensityProgress,
}

/// Running tally used to steer a module toward its density profile.
///
/// Counts cover content scenes decided before the current one. The
/// `*_ahead` and `*_openings` fields look forward from the current scene.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DensityProgress {
    /// Content scenes already decided
    pub content_scenes: usize,
    /// Of those, how many received an interaction
    pub interactive: usize,
    /// Knowledge checks prescribed so far
    pub knowledge_checks: usize,
    /// Scenario-type interactions prescribed so far
    pub scenarios: usize,
    /// Later Check scenes that will carry a knowledge check
    pub checks_ahead: usize,
    /// Later Check scenes that will carry a scenario question
    pub scenarios_ahead: usize,
    /// Teach and Show scenes from the current one on
    pub check_openings: usize,
    /// Apply scenes from the current one on
    pub scenario_openings: usize,
}

impl DensityProgress {
    /// Interactive share of the content scenes decided so far.
    pub fn interaction_rate(&self) -> f64 {
        if self.content_scenes == 0 {
            0.0
        } else {
            self.interactive as f64 / self.content_scenes as f64
        }
    }

    /// Knowledge checks still missing once expected Check scenes are counted.
    pub fn missing_checks(&self, profile: &DensityProfile) -> usize {
        profile
            .min_knowledge_checks()
            .saturating_sub(self.knowledge_checks + self.checks_ahead)
    }

    /// Scenarios still missing once expected Check scenes are counted.
    pub fn missing_scenarios(&self, profile: &DensityProfile) -> usize {
        profile
            .min_scenarios()
            .saturating_sub(self.scenarios + self.scenarios_ahead)
    }

    /// Account for one decided content scene.
    pub fn record(&mut self, decided: Option<InteractionType>) {
        self.content_scenes += 1;
        let Some(interaction_type) = decided else {
            return;
        };
        self.interactive += 1;
        if interaction_type.is_scenario() {
            self.scenarios += 1;
        } else if interaction_type == InteractionType::KnowledgeCheck {
            self.knowledge_checks += 1;
        }
    }
}

/// What a matching rule proposes.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRecommendation {
    /// Id of the rule that produced this
    pub rule_id: &'static str,
    /// Rule priority, higher wins
    pub rule_priority: u32,
    /// Proposed interaction type
    pub interaction_type: InteractionType,
    /// Why
    pub purpose: InteractionPurpose,
    /// Strength of the resulting prescription
    pub priority: PrescriptionPriority,
    /// Placement
    pub timing: TimingHint,
    /// Human-readable justification
    pub rationale: String,
}

/// Winner plus every matching recommendation, in rule order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleEvaluation {
    /// Highest-priority recommendation; ties go to the earlier rule
    pub recommendation: Option<RuleRecommendation>,
    /// All recommendations that matched
    pub applicable: Vec<RuleRecommendation>,
}

type Condition = fn(&RuleContext<'_>, &RuleConfig) -> Option<Proposal>;

/// Rule output before id and priority are attached.
struct Proposal {
    interaction_type: InteractionType,
    purpose: InteractionPurpose,
    priority: PrescriptionPriority,
    timing: TimingHint,
    rationale: String,
}

/// One pedagogical rule.
#[derive(Clone)]
pub struct Rule {
    id: &'static str,
    priority: u32,
    condition: Condition,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish()
    }
}

impl Rule {
    /// Rule id.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Rule priority.
    pub fn priority(&self) -> u32 {
        self.priority
    }
}

/// Evaluates the built-in rule set against one scene at a time.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    config: RuleConfig,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl RuleEngine {
    /// Engine with the built-in rules and the given gap thresholds.
    pub fn new(config: RuleConfig) -> Self {
        let rules = vec![
            Rule {
                id: "check-scene-assessment",
                priority: 100,
                condition: check_scene_assessment,
            },
            Rule {
                id: "density-minimums",
                priority: 95,
                condition: density_minimums,
            },
            Rule {
                id: "reflect-scene-metacognition",
                priority: 90,
                condition: reflect_scene_metacognition,
            },
            Rule {
                id: "apply-scene-practice",
                priority: 85,
                condition: apply_scene_practice,
            },
            Rule {
                id: "interaction-gap",
                priority: 80,
                condition: interaction_gap,
            },
            Rule {
                id: "time-gap",
                priority: 75,
                condition: time_gap,
            },
            Rule {
                id: "show-scene-exploration",
                priority: 60,
                condition: show_scene_exploration,
            },
            Rule {
                id: "teach-progressive-disclosure",
                priority: 50,
                condition: teach_progressive_disclosure,
            },
            Rule {
                id: "teach-categorisation",
                priority: 40,
                condition: teach_categorisation,
            },
        ];
        Self { rules, config }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate every rule and pick the winner.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleEvaluation {
        let applicable: Vec<RuleRecommendation> = self
            .rules
            .iter()
            .filter_map(|rule| {
                (rule.condition)(ctx, &self.config).map(|p| RuleRecommendation {
                    rule_id: rule.id,
                    rule_priority: rule.priority,
                    interaction_type: p.interaction_type,
                    purpose: p.purpose,
                    priority: p.priority,
                    timing: p.timing,
                    rationale: p.rationale,
                })
            })
            .collect();

        let mut recommendation: Option<&RuleRecommendation> = None;
        for candidate in &applicable {
            if recommendation.is_none_or(|best| candidate.rule_priority > best.rule_priority) {
                recommendation = Some(candidate);
            }
        }
        let recommendation = recommendation.cloned();
        debug!(
            scene = ctx.scene.number,
            applicable = applicable.len(),
            winner = recommendation.as_ref().map(|r| r.rule_id),
            "Rules evaluated"
        );
        RuleEvaluation {
            recommendation,
            applicable,
        }
    }
}

fn proposal(
    interaction_type: InteractionType,
    purpose: InteractionPurpose,
    priority: PrescriptionPriority,
    timing: TimingHint,
    rationale: impl Into<String>,
) -> Option<Proposal> {
    Some(Proposal {
        interaction_type,
        purpose,
        priority,
        timing,
        rationale: rationale.into(),
    })
}

fn check_scene_assessment(ctx: &RuleContext<'_>, _: &RuleConfig) -> Option<Proposal> {
    if ctx.scene.scene_type != SceneType::Check {
        return None;
    }
    let (interaction_type, rationale) = match ctx.level {
        Some(level) if level >= TaxonomyLevel::Analyze => (
            InteractionType::Scenario,
            "Higher-order outcomes are assessed with a scenario question",
        ),
        _ => (
            InteractionType::KnowledgeCheck,
            "Check scenes verify the outcome with a knowledge check",
        ),
    };
    proposal(
        interaction_type,
        InteractionPurpose::Assessment,
        PrescriptionPriority::Required,
        TimingHint::AfterContent,
        rationale,
    )
}

/// Fills a profile's minimum checks and scenarios as late as possible.
///
/// Fires only once the missing count reaches the openings left, so gap
/// rules and later Check scenes get the first chance to cover it.
fn density_minimums(ctx: &RuleContext<'_>, _: &RuleConfig) -> Option<Proposal> {
    let progress = &ctx.progress;
    match ctx.scene.scene_type {
        SceneType::Apply => {
            let missing = progress.missing_scenarios(ctx.profile);
            if missing == 0 || missing < progress.scenario_openings {
                return None;
            }
            proposal(
                InteractionType::Scenario,
                InteractionPurpose::Practice,
                PrescriptionPriority::Recommended,
                TimingHint::DuringContent,
                format!(
                    "{} modules need {} scenario interaction(s), {} still missing",
                    ctx.profile.category(),
                    ctx.profile.min_scenarios(),
                    missing
                ),
            )
        }
        SceneType::Teach | SceneType::Show => {
            let missing = progress.missing_checks(ctx.profile);
            if missing == 0 || missing < progress.check_openings {
                return None;
            }
            proposal(
                InteractionType::KnowledgeCheck,
                InteractionPurpose::Assessment,
                PrescriptionPriority::Recommended,
                TimingHint::AfterContent,
                format!(
                    "{} modules need {} knowledge check(s), {} still missing",
                    ctx.profile.category(),
                    ctx.profile.min_knowledge_checks(),
                    missing
                ),
            )
        }
        _ => None,
    }
}

fn reflect_scene_metacognition(ctx: &RuleContext<'_>, _: &RuleConfig) -> Option<Proposal> {
    if ctx.scene.scene_type != SceneType::Reflect {
        return None;
    }
    proposal(
        InteractionType::Reflection,
        InteractionPurpose::Metacognition,
        PrescriptionPriority::Recommended,
        TimingHint::AfterContent,
        "Reflect scenes prompt learners to connect the outcome to their own work",
    )
}

fn apply_scene_practice(ctx: &RuleContext<'_>, _: &RuleConfig) -> Option<Proposal> {
    if ctx.scene.scene_type != SceneType::Apply {
        return None;
    }
    let (interaction_type, rationale) = match ctx.level {
        Some(level) if level >= TaxonomyLevel::Evaluate => (
            InteractionType::BranchingScenario,
            "Evaluative outcomes are practised through consequences of choices",
        ),
        Some(level) if level >= TaxonomyLevel::Apply => (
            InteractionType::Scenario,
            "Application outcomes are practised in a realistic situation",
        ),
        _ => (
            InteractionType::DragMatch,
            "Lower-order outcomes are practised by matching concepts",
        ),
    };
    proposal(
        interaction_type,
        InteractionPurpose::Practice,
        PrescriptionPriority::Recommended,
        TimingHint::DuringContent,
        rationale,
    )
}

fn interaction_gap(ctx: &RuleContext<'_>, config: &RuleConfig) -> Option<Proposal> {
    if ctx.scenes_since_interaction < *config.max_scenes_without_interaction() {
        return None;
    }
    proposal(
        InteractionType::KnowledgeCheck,
        InteractionPurpose::Retention,
        PrescriptionPriority::Recommended,
        TimingHint::AfterContent,
        format!(
            "{} scenes in a row without an interaction",
            ctx.scenes_since_interaction
        ),
    )
}

fn time_gap(ctx: &RuleContext<'_>, config: &RuleConfig) -> Option<Proposal> {
    if ctx.minutes_since_interaction < *config.max_minutes_without_interaction() {
        return None;
    }
    proposal(
        InteractionType::ClickToReveal,
        InteractionPurpose::Engagement,
        PrescriptionPriority::Recommended,
        TimingHint::DuringContent,
        format!(
            "{:.1} minutes since the last interaction",
            ctx.minutes_since_interaction
        ),
    )
}

fn show_scene_exploration(ctx: &RuleContext<'_>, _: &RuleConfig) -> Option<Proposal> {
    if ctx.scene.scene_type != SceneType::Show {
        return None;
    }
    proposal(
        InteractionType::ClickToReveal,
        InteractionPurpose::Exploration,
        PrescriptionPriority::Optional,
        TimingHint::DuringContent,
        "Learners explore the example step by step",
    )
}

fn teach_progressive_disclosure(ctx: &RuleContext<'_>, _: &RuleConfig) -> Option<Proposal> {
    if ctx.scene.scene_type != SceneType::Teach
        || !*ctx.profile.progressive_disclosure()
        || ctx.scene.on_screen_lines().len() < PROGRESSIVE_MIN_LINES
    {
        return None;
    }
    proposal(
        InteractionType::ClickToReveal,
        InteractionPurpose::Chunking,
        PrescriptionPriority::Optional,
        TimingHint::DuringContent,
        "Dense on-screen content is revealed in chunks",
    )
}

fn teach_categorisation(ctx: &RuleContext<'_>, _: &RuleConfig) -> Option<Proposal> {
    let low_level = matches!(
        ctx.level,
        Some(TaxonomyLevel::Remember | TaxonomyLevel::Understand)
    );
    if ctx.scene.scene_type != SceneType::Teach
        || !low_level
        || ctx.scene.on_screen_lines().len() < CATEGORISATION_MIN_ITEMS
    {
        return None;
    }
    proposal(
        InteractionType::DragMatch,
        InteractionPurpose::Categorisation,
        PrescriptionPriority::Optional,
        TimingHint::AfterContent,
        "Listed concepts are consolidated by sorting them",
    )
}
