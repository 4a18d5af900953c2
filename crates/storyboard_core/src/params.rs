//! Tunable parameters for the pipeline and its provider.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Sliding-window cognitive load budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Number of consecutive scenes in one window
    #[serde(default = "default_window")]
    window: usize,
    /// Maximum summed load inside a window
    #[serde(default = "default_ceiling")]
    ceiling: u32,
}

fn default_window() -> usize {
    3
}

fn default_ceiling() -> u32 {
    10
}

impl LoadConfig {
    /// Create a budget; a zero window is treated as one scene.
    pub fn new(window: usize, ceiling: u32) -> Self {
        Self {
            window: window.max(1),
            ceiling,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self::new(default_window(), default_ceiling())
    }
}

/// Thresholds for the gap rules.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Consecutive uninteractive scenes that trigger an interaction
    #[serde(default = "default_max_scenes")]
    max_scenes_without_interaction: usize,
    /// Minutes without interaction that trigger an interaction
    #[serde(default = "default_max_minutes")]
    max_minutes_without_interaction: f64,
}

fn default_max_scenes() -> usize {
    3
}

fn default_max_minutes() -> f64 {
    5.0
}

impl RuleConfig {
    /// Create gap thresholds.
    pub fn new(max_scenes_without_interaction: usize, max_minutes_without_interaction: f64) -> Self {
        Self {
            max_scenes_without_interaction,
            max_minutes_without_interaction,
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::new(default_max_scenes(), default_max_minutes())
    }
}

/// Provider call settings for scene synthesis and revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Token budget per provider call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Earlier scene titles included in each scene prompt
    #[serde(default = "default_context_scenes")]
    pub context_scenes: usize,
    /// Narration pace used to estimate scene duration
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_context_scenes() -> usize {
    6
}

fn default_words_per_minute() -> u32 {
    140
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            context_scenes: default_context_scenes(),
            words_per_minute: default_words_per_minute(),
        }
    }
}

/// Connection settings for an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Endpoint root, without the `/v1/...` path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the bearer key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries after a transient failure
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> usize {
    3
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}
