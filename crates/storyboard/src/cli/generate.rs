//! Storyboard generation command handler.

use anyhow::Context;
use std::path::Path;
use storyboard::{
    ChatCompletionClient, ContentProvider, Director, GenerationMode, LearningRequest,
    StoryboardConfig,
};
use tracing::{info, instrument, warn};

/// Generate a storyboard and write it, with its report, as JSON.
///
/// A storyboard that never passes the quality gate is still written; the
/// report's `passed` flag and revision guidance tell the caller why.
#[instrument(skip(config), fields(request = %request_path.display()))]
pub async fn run_generate(
    config: StoryboardConfig,
    request_path: &Path,
    upgrade: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read {}", request_path.display()))?;
    let mut request: LearningRequest =
        serde_json::from_str(&raw).context("Learning request is not valid JSON")?;
    if upgrade {
        request = request.with_mode(GenerationMode::Upgrade);
    }

    let client = ChatCompletionClient::new(config.provider.clone())?;
    info!(
        provider = client.provider_name(),
        model = client.model_name(),
        "Starting generation"
    );
    let director = Director::new(client, config);
    let outcome = director.generate(&request).await?;

    if !outcome.report.passed {
        warn!(
            score = outcome.report.overall_score,
            grade = %outcome.report.grade,
            "Storyboard did not pass the quality gate"
        );
    }

    let json = serde_json::to_string_pretty(&outcome)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Storyboard written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
