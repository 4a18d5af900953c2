//! Density profile command handler.

use crate::cli::OutputFormat;
use anyhow::Context;
use std::str::FromStr;
use storyboard::{DensityManager, DensityProfile, ModuleCategory};
use strum::IntoEnumIterator;

/// Print the density profile for one category, or for every category.
pub fn show_profiles(category: Option<&str>, format: OutputFormat) -> anyhow::Result<()> {
    let manager = DensityManager::new();
    let profiles: Vec<DensityProfile> = match category {
        Some(name) => {
            let category = ModuleCategory::from_str(name)
                .with_context(|| format!("Unknown module category '{name}'"))?;
            vec![manager.profile_for(category)]
        }
        None => ModuleCategory::iter().map(|c| manager.profile_for(c)).collect(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profiles)?),
        OutputFormat::Human => {
            println!(
                "{:<12} {:>6} {:>7} {:>10} {:>12} {:>10}",
                "category", "rate", "checks", "scenarios", "progressive", "max words"
            );
            for p in &profiles {
                println!(
                    "{:<12} {:>5.0}% {:>7} {:>10} {:>12} {:>10}",
                    p.category().to_string(),
                    p.target_interaction_rate() * 100.0,
                    p.min_knowledge_checks(),
                    p.min_scenarios(),
                    if *p.progressive_disclosure() { "yes" } else { "no" },
                    p.max_words_per_bullet()
                );
            }
        }
    }
    Ok(())
}
