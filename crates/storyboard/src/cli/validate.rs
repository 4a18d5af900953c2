//! Storyboard validation command handler.

use crate::cli::OutputFormat;
use anyhow::Context;
use std::path::Path;
use storyboard::{QualityReport, QualityValidator, Storyboard};

/// Score a storyboard file against the quality rubric and print the report.
pub fn run_validate(
    storyboard_path: &Path,
    framework: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(storyboard_path)
        .with_context(|| format!("Failed to read {}", storyboard_path.display()))?;
    let storyboard: Storyboard =
        serde_json::from_str(&raw).context("Storyboard is not valid JSON")?;

    let report = QualityValidator::new().validate(&storyboard, &storyboard.outcomes, framework);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => print_report(&storyboard, &report),
    }
    Ok(())
}

fn print_report(storyboard: &Storyboard, report: &QualityReport) {
    println!(
        "{}: {} scenes, {}s",
        storyboard.topic,
        storyboard.scenes.len(),
        storyboard.total_seconds()
    );
    println!(
        "Score {} ({}) - {}",
        report.overall_score,
        report.grade,
        if report.passed { "passed" } else { "failed" }
    );
    println!();
    for d in &report.dimensions {
        println!("  {:<26} {:>3}  x{:.2}", d.dimension.to_string(), d.score, d.weight);
    }

    if !report.issues.is_empty() {
        println!("\nIssues:");
        for issue in &report.issues {
            let scene = issue
                .scene_number
                .map(|n| format!(" scene {n}"))
                .unwrap_or_default();
            println!("  [{}]{}: {}", issue.severity, scene, issue.message);
        }
    }
    if !report.strengths.is_empty() {
        println!("\nStrengths:");
        for strength in &report.strengths {
            println!("  {strength}");
        }
    }
    if let Some(revision) = &report.revision {
        println!("\nNext steps ({} priority):", revision.priority);
        for action in &revision.actions {
            println!("  - {action}");
        }
    }
}
