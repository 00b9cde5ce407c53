//! Chat wire-contract types and the [`ChatModel`] trait.
//!
//! The engine is provider-agnostic: it sends an ordered list of role-tagged
//! messages and receives an ordered list of choices whose primary output is
//! a free-text string *expected* (not guaranteed) to be valid JSON. Concrete
//! clients live in the `llm` crate and implement [`ChatModel`].

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message role on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// A chat-completion response: ordered choices plus usage metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    /// Raw texts of all choices, in order.
    pub fn texts(&self) -> Vec<String> {
        self.choices
            .iter()
            .map(|c| c.message.content.clone())
            .collect()
    }
}

/// Core trait for chat-based language models.
///
/// Implementations handle provider specifics: converting messages, making
/// the API call, and parsing the response. Any transport-level failure must
/// be converted to a typed [`LlmError`], never panicked across the boundary.
///
/// Implementations must be `Send + Sync`; share them as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete chat response from the given messages.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Clone this model into a boxed trait object.
    fn clone_box(&self) -> Box<dyn ChatModel>;
}

impl Clone for Box<dyn ChatModel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn first_text_empty_choices() {
        let response = ChatResponse {
            model: "gpt-3.5-turbo".to_string(),
            choices: vec![],
            usage: None,
        };
        assert_eq!(response.first_text(), None);
        assert!(response.texts().is_empty());
    }

    #[test]
    fn first_text_returns_first_choice() {
        let response = ChatResponse {
            model: "gpt-3.5-turbo".to_string(),
            choices: vec![
                Choice {
                    message: ChatMessage::assistant("one"),
                },
                Choice {
                    message: ChatMessage::assistant("two"),
                },
            ],
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        };
        assert_eq!(response.first_text(), Some("one"));
        assert_eq!(response.texts(), vec!["one".to_string(), "two".to_string()]);
    }
}
