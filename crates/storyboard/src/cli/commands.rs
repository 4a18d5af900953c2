//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Storyboard - generate and validate e-learning storyboards
#[derive(Parser, Debug)]
#[command(name = "storyboard")]
#[command(about = "Generate and validate outcome-driven e-learning storyboards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file overlaid on the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a storyboard from a learning request JSON file
    Generate {
        /// Path to the learning request JSON
        #[arg(long)]
        request: PathBuf,

        /// Add extra practice and checks per outcome
        #[arg(long)]
        upgrade: bool,

        /// Write the storyboard and report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score an existing storyboard JSON file
    Validate {
        /// Path to the storyboard JSON
        #[arg(long)]
        storyboard: PathBuf,

        /// Framework the storyboard is expected to teach
        #[arg(long)]
        framework: Option<String>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Show interaction density profiles
    Profile {
        /// Category to show (all when omitted)
        #[arg(long)]
        category: Option<String>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
