//! Trait definitions for generative content backends.

use async_trait::async_trait;
use storyboard_core::{CompletionRequest, CompletionResponse};
use storyboard_error::StoryboardResult;
use std::sync::Arc;

/// Core trait that every text generation backend must implement.
///
/// Implementations return the raw completion text. Turning that text into
/// scenes, and recovering from malformed output, is the caller's job.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Generate a completion for the request.
    async fn complete(&self, req: &CompletionRequest) -> StoryboardResult<CompletionResponse>;

    /// Provider name (e.g., "openai", "mock").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T> ContentProvider for Arc<T>
where
    T: ContentProvider + ?Sized,
{
    async fn complete(&self, req: &CompletionRequest) -> StoryboardResult<CompletionResponse> {
        (**self).complete(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T> ContentProvider for Box<T>
where
    T: ContentProvider + ?Sized,
{
    async fn complete(&self, req: &CompletionRequest) -> StoryboardResult<CompletionResponse> {
        (**self).complete(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
