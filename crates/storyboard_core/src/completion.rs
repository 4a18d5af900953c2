//! Request and response types for the content provider boundary.

use serde::{Deserialize, Serialize};

/// A single text completion request.
///
/// # Examples
///
/// ```
/// use storyboard_core::CompletionRequestBuilder;
///
/// let request = CompletionRequestBuilder::default()
///     .system_prompt("You write e-learning scenes as JSON.")
///     .user_prompt("Write a Teach scene.")
///     .build()
///     .expect("Valid completion request");
///
/// assert_eq!(request.max_tokens, None);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), build_fn(error = "storyboard_error::BuilderError"))]
pub struct CompletionRequest {
    /// Instructions framing the task
    pub system_prompt: String,
    /// The task itself
    pub user_prompt: String,
    /// Maximum number of tokens to generate
    #[builder(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    pub temperature: Option<f32>,
    /// Model override
    #[builder(default)]
    pub model: Option<String>,
}

/// Raw provider output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text, expected to contain JSON
    pub text: String,
}

impl CompletionResponse {
    /// Wrap provider text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
