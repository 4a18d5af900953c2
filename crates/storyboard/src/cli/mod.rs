//! Command-line interface for the storyboard binary.

mod commands;
mod generate;
mod profile;
mod validate;

pub use commands::{Cli, Commands, OutputFormat};
pub use generate::run_generate;
pub use profile::show_profiles;
pub use validate::run_validate;
