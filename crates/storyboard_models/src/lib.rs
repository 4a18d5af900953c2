//! Content providers for Storyboard generation.
//!
//! [`ChatCompletionClient`] talks to any endpoint that speaks the OpenAI chat
//! completion protocol: OpenAI itself, Azure-style gateways, or a local
//! server. Configure it through the `[provider]` section of
//! `storyboard.toml`.
//!
//! ```no_run
//! use storyboard_core::{CompletionRequestBuilder, ProviderConfig};
//! use storyboard_interface::ContentProvider;
//! use storyboard_models::ChatCompletionClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ChatCompletionClient::new(ProviderConfig::default())?;
//! let request = CompletionRequestBuilder::default()
//!     .system_prompt("Reply with JSON.")
//!     .user_prompt("Write a Teach scene about fire exits.")
//!     .build()?;
//! let response = client.complete(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod dto;

pub use client::ChatCompletionClient;
pub use dto::{
    ChatChoice, ChatMessage, ChatMessageBuilder, ChatRequest, ChatRequestBuilder, ChatResponse,
    ChatRole, ChatUsage, ChoiceMessage,
};
