//! OpenAI-compatible chat completion client.

use crate::dto::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse, ChatRole};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use storyboard_core::{CompletionRequest, CompletionResponse, ProviderConfig};
use storyboard_error::{BuilderError, ProviderError, ProviderErrorKind, StoryboardResult};
use storyboard_interface::ContentProvider;
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, info, instrument, warn};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const MAX_BACKOFF_SECS: u64 = 30;

/// A failed request plus the server's `Retry-After` hint, if any.
struct Failure {
    error: ProviderError,
    retry_after: Option<Duration>,
}

impl From<ProviderError> for Failure {
    fn from(error: ProviderError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

/// Client for any endpoint speaking the OpenAI chat completion protocol.
///
/// Connect errors, timeouts, 429 and 5xx responses are retried with
/// exponential backoff and jitter, up to `max_retries` times. Other failures
/// return immediately.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: Client,
    api_key: String,
    endpoint: String,
    config: ProviderConfig,
}

impl ChatCompletionClient {
    /// Creates a client, reading the bearer key from `config.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when the variable is unset or empty, or an
    /// HTTP error when the client cannot be built.
    #[instrument(skip_all, fields(model = %config.model, base_url = %config.base_url))]
    pub fn new(config: ProviderConfig) -> StoryboardResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::NotConfigured(format!(
                    "{} not set",
                    config.api_key_env
                )))
            })?;
        Self::with_api_key(api_key, config)
    }

    /// Creates a client with an explicit bearer key.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error when the underlying client cannot be built.
    #[instrument(skip(api_key), fields(model = %config.model))]
    pub fn with_api_key(api_key: impl Into<String>, config: ProviderConfig) -> StoryboardResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Http(e.to_string())))?;
        let endpoint = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        );
        debug!(endpoint = %endpoint, "Created chat completion client");
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint,
            config,
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wire body for a completion request.
    ///
    /// # Errors
    ///
    /// Returns a builder error when no model is configured or overridden.
    pub fn to_chat_request(&self, req: &CompletionRequest) -> StoryboardResult<ChatRequest> {
        let mut messages = Vec::with_capacity(2);
        if !req.system_prompt.is_empty() {
            messages.push(message(ChatRole::System, &req.system_prompt)?);
        }
        messages.push(message(ChatRole::User, &req.user_prompt)?);
        let model = req
            .model
            .as_deref()
            .unwrap_or(&self.config.model)
            .trim();
        if model.is_empty() {
            return Err(BuilderError::invalid("model", "must name a model").into());
        }
        Ok(ChatRequest::builder()
            .model(model)
            .messages(messages)
            .max_tokens(req.max_tokens)
            .temperature(req.temperature)
            .build()?)
    }

    async fn send_once(&self, body: &ChatRequest) -> Result<String, Failure> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::new(transport_error(&e, self.config.timeout_secs)))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after(response.headers());
            let text = response.text().await.unwrap_or_default();
            return Err(Failure {
                error: ProviderError::new(status_error(status, &text)),
                retry_after,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::MalformedResponse(e.to_string()))
        })?;
        if let Some(usage) = parsed.usage() {
            debug!(
                prompt_tokens = usage.prompt_tokens(),
                completion_tokens = usage.completion_tokens(),
                "Token usage"
            );
        }
        parsed
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyCompletion).into())
    }
}

fn message(role: ChatRole, content: &str) -> Result<ChatMessage, BuilderError> {
    ChatMessage::builder().role(role).content(content).build()
}

/// Classify a failure to get any response.
fn transport_error(error: &reqwest::Error, timeout_secs: u64) -> ProviderErrorKind {
    if error.is_timeout() {
        ProviderErrorKind::Timeout(timeout_secs)
    } else {
        ProviderErrorKind::Http(error.to_string())
    }
}

/// Classify a non-success status, preferring the API's own error message.
pub(crate) fn status_error(status: StatusCode, body: &str) -> ProviderErrorKind {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ProviderErrorKind::RateLimited;
    }
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    ProviderErrorKind::Api {
        status: status.as_u16(),
        message,
    }
}

fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| Duration::from_secs(secs.min(MAX_BACKOFF_SECS)))
}

/// Backoff delays: 500ms, 1s, 2s, ... capped at 30s, jittered.
fn backoff(max_retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(250)
        .max_delay(Duration::from_secs(MAX_BACKOFF_SECS))
        .map(jitter)
        .take(max_retries)
}

#[async_trait]
impl ContentProvider for ChatCompletionClient {
    #[instrument(
        skip(self, req),
        fields(provider = "openai", model = %self.config.model, prompt_len = req.user_prompt.len())
    )]
    async fn complete(&self, req: &CompletionRequest) -> StoryboardResult<CompletionResponse> {
        let body = self.to_chat_request(req)?;
        let (this, body) = (self, &body);

        let text = Retry::spawn(backoff(self.config.max_retries), move || async move {
            match this.send_once(body).await {
                Ok(text) => Ok(text),
                Err(Failure { error, retry_after }) if error.kind.is_transient() => {
                    warn!(error = %error, "Chat completion failed, will retry");
                    Err(RetryError::Transient {
                        err: error,
                        retry_after,
                    })
                }
                Err(Failure { error, .. }) => {
                    warn!(error = %error, "Permanent chat completion error, failing immediately");
                    Err(RetryError::Permanent(error))
                }
            }
        })
        .await?;

        info!(chars = text.len(), "Chat completion received");
        Ok(CompletionResponse::new(text))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
