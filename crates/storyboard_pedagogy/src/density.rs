//! Module category inference and interaction density validation.

use serde::{Deserialize, Serialize};
use storyboard_core::{
    DensityProfile, InteractionKind, LearningRequest, ModuleCategory, Scene, text,
};
use tracing::{debug, instrument};

/// Leading source characters considered when inferring a category.
const SOURCE_SCAN_CHARS: usize = 2000;
/// How far below target the interaction rate may fall before it is flagged.
const RATE_TOLERANCE_BELOW: f64 = 0.15;
/// How far above target the interaction rate may rise before it is flagged.
pub(crate) const RATE_TOLERANCE_ABOVE: f64 = 0.25;

const KEYWORDS: [(ModuleCategory, &[&str]); 7] = [
    (
        ModuleCategory::Compliance,
        &[
            "compliance", "regulation", "regulations", "regulatory", "policy", "policies", "gdpr",
            "legal", "audit", "ethics", "harassment", "bribery", "privacy", "whistleblowing",
            "anti-money",
        ],
    ),
    (
        ModuleCategory::Safety,
        &[
            "safety", "hazard", "hazards", "ppe", "fire", "incident", "injury", "emergency",
            "evacuation", "handling", "accident", "first-aid",
        ],
    ),
    (
        ModuleCategory::Leadership,
        &[
            "leader", "leaders", "leadership", "manager", "managers", "management", "coaching",
            "delegation", "delegate", "mentoring", "performance",
        ],
    ),
    (
        ModuleCategory::SoftSkills,
        &[
            "communication", "communicate", "conflict", "empathy", "listening", "collaboration",
            "teamwork", "presentation", "emotional", "feedback", "styles",
        ],
    ),
    (
        ModuleCategory::Sales,
        &[
            "sales", "selling", "sell", "customer", "customers", "prospect", "prospects",
            "pipeline", "objection", "objections", "negotiation", "upsell", "closing",
        ],
    ),
    (
        ModuleCategory::Technical,
        &[
            "software", "system", "systems", "configure", "configuration", "database", "code",
            "api", "network", "technical", "install", "deployment", "server",
        ],
    ),
    (
        ModuleCategory::Onboarding,
        &[
            "onboarding", "induction", "welcome", "orientation", "starter", "starters", "culture",
            "benefits", "handbook",
        ],
    ),
];

/// Outcome of a density check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityReport {
    /// No issues found
    pub valid: bool,
    /// Human-readable findings
    pub issues: Vec<String>,
    /// Interactive content scenes over content scenes
    pub interaction_rate: f64,
    /// Quizzes that are not scenario questions
    pub knowledge_checks: usize,
    /// Scenario, branching scenario and simulation interactions
    pub scenarios: usize,
}

/// Category inference and density validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DensityManager;

impl DensityManager {
    /// Create a density manager.
    pub fn new() -> Self {
        Self
    }

    /// Category for a request: the explicit hint, else keyword scoring.
    ///
    /// Topic matches weigh three, outcome matches two and source matches one.
    /// Ties go to the earlier category; no matches yield `General`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::{LearningRequestBuilder, ModuleCategory};
    /// use storyboard_pedagogy::DensityManager;
    ///
    /// let request = LearningRequestBuilder::default()
    ///     .topic("Fire safety for warehouse staff")
    ///     .build()
    ///     .expect("Valid request");
    /// assert_eq!(DensityManager::new().infer_category(&request), ModuleCategory::Safety);
    /// ```
    #[instrument(skip_all, fields(topic = %request.topic()))]
    pub fn infer_category(&self, request: &LearningRequest) -> ModuleCategory {
        if let Some(hint) = request.category_hint() {
            debug!(category = %hint, "Using category hint");
            return *hint;
        }

        let topic = text::tokens(request.topic());
        let outcomes: Vec<String> = request
            .outcomes()
            .iter()
            .flat_map(|o| text::tokens(o))
            .collect();
        let source_head: String = request.source_text().chars().take(SOURCE_SCAN_CHARS).collect();
        let source = text::tokens(&source_head);

        let mut best = (ModuleCategory::General, 0usize);
        for (category, words) in KEYWORDS {
            let hits = |tokens: &[String]| tokens.iter().filter(|t| words.contains(&t.as_str())).count();
            let score = 3 * hits(&topic) + 2 * hits(&outcomes) + hits(&source);
            if score > best.1 {
                best = (category, score);
            }
        }
        debug!(category = %best.0, score = best.1, "Inferred category");
        best.0
    }

    /// Density profile for a category.
    pub fn profile_for(&self, category: ModuleCategory) -> DensityProfile {
        category.profile()
    }

    /// Check a scene list against a profile. Never mutates; repeated calls agree.
    #[instrument(skip_all, fields(category = %profile.category(), scenes = scenes.len()))]
    pub fn validate_density(&self, scenes: &[Scene], profile: &DensityProfile) -> DensityReport {
        let content: Vec<&Scene> = scenes.iter().filter(|s| !s.is_structural()).collect();
        let interactive = content.iter().filter(|s| s.is_interactive()).count();
        let interaction_rate = if content.is_empty() {
            0.0
        } else {
            interactive as f64 / content.len() as f64
        };

        let interactions = scenes.iter().filter_map(|s| s.interaction.as_ref());
        let (mut knowledge_checks, mut scenarios) = (0, 0);
        for interaction in interactions {
            match interaction.prescribed_as {
                Some(t) if t.is_scenario() => scenarios += 1,
                _ if interaction.kind == InteractionKind::Quiz => knowledge_checks += 1,
                _ => {}
            }
        }

        let mut issues = Vec::new();
        let target = *profile.target_interaction_rate();
        if !content.is_empty() && interaction_rate < target - RATE_TOLERANCE_BELOW {
            issues.push(format!(
                "Interaction rate {:.0}% is below the {:.0}% target for {} modules",
                interaction_rate * 100.0,
                target * 100.0,
                profile.category()
            ));
        }
        if interaction_rate > target + RATE_TOLERANCE_ABOVE {
            issues.push(format!(
                "Interaction rate {:.0}% is well above the {:.0}% target",
                interaction_rate * 100.0,
                target * 100.0
            ));
        }
        if knowledge_checks < *profile.min_knowledge_checks() {
            issues.push(format!(
                "{} knowledge checks, {} required",
                knowledge_checks,
                profile.min_knowledge_checks()
            ));
        }
        if scenarios < *profile.min_scenarios() {
            issues.push(format!(
                "{} scenario interactions, {} required",
                scenarios,
                profile.min_scenarios()
            ));
        }
        let max_words = *profile.max_words_per_bullet();
        for scene in &content {
            let long = scene
                .on_screen_lines()
                .iter()
                .filter(|l| text::word_count(l) > max_words)
                .count();
            if long > 0 {
                issues.push(format!(
                    "Scene {} has {} bullet(s) over {} words",
                    scene.number, long, max_words
                ));
            }
        }

        debug!(interaction_rate, knowledge_checks, scenarios, issues = issues.len(), "Density validated");
        DensityReport {
            valid: issues.is_empty(),
            issues,
            interaction_rate,
            knowledge_checks,
            scenarios,
        }
    }
}
