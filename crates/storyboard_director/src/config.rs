//! Layered configuration for a generation run.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from storyboard.toml)
//! - `~/.config/storyboard/storyboard.toml`
//! - `./storyboard.toml`
//! - `STORYBOARD__SECTION__KEY` environment variables

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use storyboard_core::{GenerationConfig, LoadConfig, ProviderConfig, RuleConfig};
use storyboard_error::{ConfigError, StoryboardError, StoryboardResult};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../storyboard.toml");

/// Complete configuration for the pipeline and its provider.
///
/// # Example
///
/// ```toml
/// [generation]
/// temperature = 0.4
///
/// [load]
/// ceiling = 8
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoryboardConfig {
    /// Provider call settings
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Cognitive load budget
    #[serde(default)]
    pub load: LoadConfig,
    /// Interaction gap thresholds
    #[serde(default)]
    pub rules: RuleConfig,
    /// Chat completion endpoint
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl StoryboardConfig {
    /// Load with full precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a present file is malformed or a
    /// value has the wrong type. Missing files are skipped.
    #[instrument]
    pub fn load() -> StoryboardResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyboard/storyboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("storyboard").required(false))
            .add_source(
                Environment::with_prefix("STORYBOARD")
                    .prefix_separator("__")
                    .separator("__"),
            );

        Self::finish(builder)
    }

    /// Load the bundled defaults overlaid with one explicit file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the file is missing or malformed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryboardResult<Self> {
        debug!("Loading configuration from file");
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Parse configuration from a TOML string overlaid on the bundled defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_director::StoryboardConfig;
    ///
    /// let config = StoryboardConfig::from_toml("[load]\nceiling = 6\n").expect("Valid TOML");
    /// assert_eq!(*config.load.ceiling(), 6);
    /// assert_eq!(*config.load.window(), 3);
    /// ```
    pub fn from_toml(toml: &str) -> StoryboardResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> StoryboardResult<Self> {
        builder
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_code_defaults() {
        let config = StoryboardConfig::from_toml("").expect("Bundled defaults parse");
        assert_eq!(config, StoryboardConfig::default());
    }

    #[test]
    fn overrides_merge_over_defaults() {
        let config = StoryboardConfig::from_toml(
            "[generation]\ntemperature = 0.2\n[provider]\nmodel = \"local-model\"\n",
        )
        .expect("Valid overrides");
        assert!((config.generation.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.generation.max_tokens, 2048);
        assert_eq!(config.provider.model, "local-model");
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn malformed_values_are_configuration_errors() {
        let err = StoryboardConfig::from_toml("[load]\nwindow = \"wide\"\n")
            .expect_err("Window must be a number");
        assert!(matches!(
            err.kind(),
            storyboard_error::StoryboardErrorKind::Config(_)
        ));
    }
}
