//! Chat completion wire types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions
    System,
    /// Prompt
    User,
    /// Model reply
    Assistant,
}

/// One message in a chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into), build_fn(error = "storyboard_error::BuilderError"))]
pub struct ChatMessage {
    /// Message role
    role: ChatRole,
    /// Message content
    content: String,
}

impl ChatMessage {
    /// Creates a new builder for `ChatMessage`.
    pub fn builder() -> ChatMessageBuilder {
        ChatMessageBuilder::default()
    }
}

/// Body of `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into), build_fn(error = "storyboard_error::BuilderError"))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation, system message first
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates a new builder for `ChatRequest`.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// Assistant message inside a choice. Content may be null on refusals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChoiceMessage {
    /// Generated text
    #[serde(default)]
    content: Option<String>,
}

/// One candidate completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatChoice {
    /// Position in the choice list
    #[serde(default)]
    index: u32,
    /// Generated message
    message: ChoiceMessage,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Token accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct ChatUsage {
    /// Prompt tokens
    #[serde(default)]
    prompt_tokens: u32,
    /// Completion tokens
    #[serde(default)]
    completion_tokens: u32,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatResponse {
    /// Model that answered
    #[serde(default)]
    model: Option<String>,
    /// Candidate completions
    #[serde(default)]
    choices: Vec<ChatChoice>,
    /// Token accounting
    #[serde(default)]
    usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Text of the first choice, trimmed, when it has any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Error body: `{"error": {"message": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) error: ApiErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub(crate) message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_sampling_fields() {
        let request = ChatRequest::builder()
            .model("gpt-4o-mini")
            .messages(vec![
                ChatMessage::builder()
                    .role(ChatRole::System)
                    .content("Answer in JSON.")
                    .build()
                    .expect("Valid message"),
            ])
            .build()
            .expect("Valid request");
        let value = serde_json::to_value(&request).expect("Serializable");
        assert_eq!(value["messages"][0]["role"], "system");
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn first_text_skips_null_and_blank_content() {
        let null: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]}"#,
        )
        .expect("Valid response");
        assert_eq!(null.first_text(), None);

        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "  \n"}}]}"#)
                .expect("Valid response");
        assert_eq!(blank.first_text(), None);

        let empty: ChatResponse = serde_json::from_str("{}").expect("Valid response");
        assert_eq!(empty.first_text(), None);
    }
}
