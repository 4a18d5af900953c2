//! Sliding-window cognitive load budget.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyboard_core::{LoadConfig, Scene, text};

/// Narration longer than this adds one unit of content load.
const DENSE_NARRATION_WORDS: usize = 180;
/// On-screen text longer than this adds one unit of content load.
const DENSE_SCREEN_WORDS: usize = 50;

/// Load across a scene sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeLoad {
    /// Summed load of the last window
    pub recent_load: u32,
    /// Highest summed load of any window
    pub peak_window_load: u32,
    /// Whether any window exceeds the ceiling
    pub overload_risk: bool,
}

/// Result of checking a proposed interaction against the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionCheck {
    /// Whether the projected window load stays within the ceiling
    pub safe: bool,
    /// Window load if the interaction were added
    pub projected_load: u32,
}

/// Scores scenes and guards the load budget. Pure and stateless apart from its config.
#[derive(Debug, Clone, Copy, Default, Getters)]
pub struct CognitiveLoadProtector {
    config: LoadConfig,
}

impl CognitiveLoadProtector {
    /// Create a protector for a budget.
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// Load of the scene's content alone.
    ///
    /// Welcome and summary scenes carry none. Content scenes carry one unit,
    /// plus one when narration or on-screen text is dense.
    pub fn content_load(&self, scene: &Scene) -> u32 {
        if scene.is_structural() {
            return 0;
        }
        let dense = text::word_count(&scene.narration) > DENSE_NARRATION_WORDS
            || text::word_count(&scene.on_screen_text) > DENSE_SCREEN_WORDS;
        1 + u32::from(dense)
    }

    /// Content load plus the load of the scene's interaction, if any.
    pub fn assess_scene(&self, scene: &Scene) -> u32 {
        self.content_load(scene) + scene.interaction.as_ref().map_or(0, |i| i.load())
    }

    /// Window sums over a whole sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::LoadConfig;
    /// use storyboard_pedagogy::CognitiveLoadProtector;
    ///
    /// let protector = CognitiveLoadProtector::new(LoadConfig::default());
    /// let load = protector.assess_cumulative(&[]);
    /// assert_eq!(load.peak_window_load, 0);
    /// assert!(!load.overload_risk);
    /// ```
    pub fn assess_cumulative(&self, scenes: &[Scene]) -> CumulativeLoad {
        let loads: Vec<u32> = scenes.iter().map(|s| self.assess_scene(s)).collect();
        self.cumulative_from_loads(&loads)
    }

    /// Window sums over precomputed per-scene loads.
    pub fn cumulative_from_loads(&self, loads: &[u32]) -> CumulativeLoad {
        let window = *self.config.window();
        let ceiling = *self.config.ceiling();
        let peak_window_load = if loads.len() <= window {
            loads.iter().sum()
        } else {
            loads
                .windows(window)
                .map(|w| w.iter().sum::<u32>())
                .max()
                .unwrap_or(0)
        };
        let recent_load = loads.iter().rev().take(window).sum();
        CumulativeLoad {
            recent_load,
            peak_window_load,
            overload_risk: peak_window_load > ceiling,
        }
    }

    /// Whether adding an interaction of `proposed` load to `scene` keeps the
    /// window ending at `scene` within the ceiling.
    ///
    /// `prior_loads` are the loads of the scenes before `scene`, oldest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::{LoadConfig, Scene, SceneMetadata, SceneType, VisualBrief};
    /// use storyboard_pedagogy::CognitiveLoadProtector;
    ///
    /// let scene = Scene {
    ///     number: 3,
    ///     title: "Practice".into(),
    ///     scene_type: SceneType::Apply,
    ///     narration: "Try it.".into(),
    ///     on_screen_text: "Try it".into(),
    ///     visual: VisualBrief::default(),
    ///     interaction: None,
    ///     duration_seconds: 60,
    ///     metadata: SceneMetadata::default(),
    /// };
    /// let protector = CognitiveLoadProtector::new(LoadConfig::default());
    /// let check = protector.validate_addition(&scene, 3, &[3, 4]);
    /// assert_eq!(check.projected_load, 11);
    /// assert!(!check.safe);
    /// ```
    pub fn validate_addition(&self, scene: &Scene, proposed: u32, prior_loads: &[u32]) -> AdditionCheck {
        let lookback = self.config.window().saturating_sub(1);
        let prior = prior_loads
            .iter()
            .rev()
            .take(lookback)
            .fold(0u32, |sum, load| sum.saturating_add(*load));
        let projected_load = prior
            .saturating_add(self.content_load(scene))
            .saturating_add(proposed);
        AdditionCheck {
            safe: projected_load <= *self.config.ceiling(),
            projected_load,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_core::{
        Interaction, InteractionKind, InteractionType, SceneMetadata, SceneRole, SceneType,
        VisualBrief,
    };

    fn scene(role: SceneRole, narration_words: usize) -> Scene {
        Scene {
            number: 1,
            title: "Scene".to_string(),
            scene_type: SceneType::Teach,
            narration: vec!["word"; narration_words].join(" "),
            on_screen_text: "Point".to_string(),
            visual: VisualBrief::default(),
            interaction: None,
            duration_seconds: 60,
            metadata: SceneMetadata {
                role,
                ..Default::default()
            },
        }
    }

    #[test]
    fn content_load_reflects_role_and_density() {
        let protector = CognitiveLoadProtector::default();
        assert_eq!(protector.content_load(&scene(SceneRole::Welcome, 300)), 0);
        assert_eq!(protector.content_load(&scene(SceneRole::Content, 100)), 1);
        assert_eq!(protector.content_load(&scene(SceneRole::Content, 181)), 2);
    }

    #[test]
    fn interaction_adds_prescribed_load() {
        let mut s = scene(SceneRole::Content, 10);
        s.interaction = Some(Interaction {
            kind: InteractionKind::Quiz,
            prescribed_as: Some(InteractionType::BranchingScenario),
            prompt: "What next?".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            correct_option: Some(0),
            pairs: Vec::new(),
            feedback: "Because.".to_string(),
        });
        assert_eq!(CognitiveLoadProtector::default().assess_scene(&s), 4);
    }

    #[test]
    fn never_safe_above_ceiling() {
        let protector = CognitiveLoadProtector::new(LoadConfig::new(3, 8));
        let s = scene(SceneRole::Content, 10);
        for a in 0..6u32 {
            for b in 0..6u32 {
                for proposed in 0..5u32 {
                    let check = protector.validate_addition(&s, proposed, &[a, b]);
                    assert_eq!(check.projected_load, a + b + 1 + proposed);
                    assert_eq!(check.safe, check.projected_load <= 8);
                }
            }
        }
    }

    #[test]
    fn only_the_last_window_counts() {
        let protector = CognitiveLoadProtector::new(LoadConfig::new(3, 8));
        let s = scene(SceneRole::Content, 10);
        let check = protector.validate_addition(&s, 1, &[9, 9, 1, 1]);
        assert_eq!(check.projected_load, 4);
        assert!(check.safe);
    }

    #[test]
    fn cumulative_peak_and_risk() {
        let protector = CognitiveLoadProtector::new(LoadConfig::new(3, 8));
        let load = protector.cumulative_from_loads(&[1, 4, 4, 1, 1]);
        assert_eq!(load.peak_window_load, 9);
        assert_eq!(load.recent_load, 6);
        assert!(load.overload_risk);
    }
}
