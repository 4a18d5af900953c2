//! Storyboard CLI binary.
//!
//! - Generate a storyboard from a learning request
//! - Score an existing storyboard
//! - Inspect interaction density profiles
//! - Print the effective configuration

use clap::Parser;
use std::path::Path;
use storyboard::{StoryboardConfig, StoryboardResult};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{Cli, Commands, run_generate, run_validate, show_profiles};

    // Provider keys may live in .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    storyboard::telemetry::init_tracing(cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Generate {
            request,
            upgrade,
            output,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_generate(config, &request, upgrade, output.as_deref()).await?;
        }

        Commands::Validate {
            storyboard,
            framework,
            format,
        } => {
            run_validate(&storyboard, framework.as_deref(), format)?;
        }

        Commands::Config => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", toml::to_string_pretty(&config)?);
        }

        Commands::Profile { category, format } => {
            show_profiles(category.as_deref(), format)?;
        }
    }

    Ok(())
}

/// Bundled defaults overlaid with `--config`, or the full precedence chain.
fn load_config(path: Option<&Path>) -> StoryboardResult<StoryboardConfig> {
    match path {
        Some(path) => StoryboardConfig::from_file(path),
        None => StoryboardConfig::load(),
    }
}
