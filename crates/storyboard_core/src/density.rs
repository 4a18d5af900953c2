//! Module categories and their interaction density profiles.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Broad subject category of a module.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModuleCategory {
    /// Regulatory and policy training
    #[display("compliance")]
    Compliance,
    /// Health and safety
    #[display("safety")]
    Safety,
    /// Leadership and management
    #[display("leadership")]
    Leadership,
    /// Communication and interpersonal skills
    #[display("soft_skills")]
    SoftSkills,
    /// Selling and customer engagement
    #[display("sales")]
    Sales,
    /// Software, systems and procedures
    #[display("technical")]
    Technical,
    /// Induction for new starters
    #[display("onboarding")]
    Onboarding,
    /// Anything else
    #[default]
    #[display("general")]
    General,
}

impl ModuleCategory {
    /// Density profile for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::ModuleCategory;
    ///
    /// let profile = ModuleCategory::Technical.profile();
    /// assert_eq!(*profile.min_knowledge_checks(), 3);
    /// assert!(*profile.progressive_disclosure());
    /// ```
    pub fn profile(self) -> DensityProfile {
        let (rate, checks, scenarios, progressive, words) = match self {
            Self::Compliance => (0.50, 3, 1, true, 12),
            Self::Safety => (0.50, 3, 1, true, 10),
            Self::Leadership => (0.40, 2, 2, true, 15),
            Self::SoftSkills => (0.45, 2, 2, true, 15),
            Self::Sales => (0.45, 2, 2, false, 12),
            Self::Technical => (0.55, 3, 0, true, 10),
            Self::Onboarding => (0.35, 1, 0, false, 15),
            Self::General => (0.40, 2, 0, false, 15),
        };
        DensityProfile {
            category: self,
            target_interaction_rate: rate,
            min_knowledge_checks: checks,
            min_scenarios: scenarios,
            progressive_disclosure: progressive,
            max_words_per_bullet: words,
        }
    }
}

/// Per-category interaction expectations.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityProfile {
    /// Category this profile belongs to
    category: ModuleCategory,
    /// Target fraction of content scenes carrying an interaction
    target_interaction_rate: f64,
    /// Minimum number of knowledge checks (quizzes)
    min_knowledge_checks: usize,
    /// Minimum number of scenario interactions
    min_scenarios: usize,
    /// Whether dense Teach scenes should be chunked with reveals
    progressive_disclosure: bool,
    /// Longest acceptable on-screen bullet
    max_words_per_bullet: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn every_category_has_a_profile() {
        for category in ModuleCategory::iter() {
            let profile = category.profile();
            assert_eq!(*profile.category(), category);
            assert!(*profile.target_interaction_rate() > 0.0);
            assert!(*profile.target_interaction_rate() < 1.0);
        }
    }

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!(
            ModuleCategory::from_str("Soft_Skills").expect("Valid category"),
            ModuleCategory::SoftSkills
        );
        assert!(ModuleCategory::from_str("astrology").is_err());
    }
}
