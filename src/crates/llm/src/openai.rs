//! OpenAI chat-completions client.
//!
//! Talks to the `/chat/completions` endpoint and maps the wire response
//! into the core [`ChatResponse`]. All HTTP and provider failures come back
//! as typed [`LlmError`] values; nothing here panics on a bad response.

use crate::config::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use sayso_core::{
    ChatMessage, ChatModel, ChatRequest, ChatResponse, Choice, LlmError, Role, Usage,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiClient {
    config: LlmConfig,
    client: Client,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn convert_message(msg: &ChatMessage) -> WireMessage {
        WireMessage {
            role: match msg.role {
                Role::System => "system".to_string(),
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: Some(msg.content.clone()),
        }
    }

    fn convert_response(wire: WireResponse) -> ChatResponse {
        let choices = wire
            .choices
            .into_iter()
            .map(|c| {
                let role = match c.message.role.as_str() {
                    "system" => Role::System,
                    "user" => Role::User,
                    _ => Role::Assistant,
                };
                Choice {
                    message: ChatMessage {
                        role,
                        content: c.message.content.unwrap_or_default(),
                    },
                }
            })
            .collect();

        let usage = wire.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        ChatResponse {
            model: wire.model,
            choices,
            usage,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let messages: Vec<WireMessage> =
            request.messages.iter().map(Self::convert_message).collect();

        let req_body = WireRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
        };

        let mut req = self
            .client
            .post(&url)
            .json(&req_body)
            .header("Authorization", format!("Bearer {}", self.config.api_key));

        if let Some(org) = &self.config.organization {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 => LlmError::Auth(body),
                429 => LlmError::RateLimited(body),
                _ => LlmError::Api {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        debug!(model = %wire.model, choices = wire.choices.len(), "completion received");

        Ok(Self::convert_response(wire))
    }

    fn clone_box(&self) -> Box<dyn ChatModel> {
        Box::new(self.clone())
    }
}

// Wire types for the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = LlmConfig::new("test-key");
        let _client = OpenAiClient::new(config).unwrap();
    }

    #[test]
    fn test_message_conversion_all_roles() {
        let sys = OpenAiClient::convert_message(&ChatMessage::system("You only return JSON."));
        assert_eq!(sys.role, "system");
        assert_eq!(sys.content, Some("You only return JSON.".to_string()));

        let user = OpenAiClient::convert_message(&ChatMessage::user("buy milk"));
        assert_eq!(user.role, "user");

        let asst = OpenAiClient::convert_message(&ChatMessage::assistant("{}"));
        assert_eq!(asst.role, "assistant");
    }

    #[test]
    fn test_response_conversion_basic() {
        let wire = WireResponse {
            model: "gpt-3.5-turbo".to_string(),
            choices: vec![WireChoice {
                message: WireMessage {
                    role: "assistant".to_string(),
                    content: Some(r#"{"action":"todo.create","input":{}}"#.to_string()),
                },
            }],
            usage: Some(WireUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            }),
        };

        let response = OpenAiClient::convert_response(wire);

        assert_eq!(
            response.first_text(),
            Some(r#"{"action":"todo.create","input":{}}"#)
        );
        assert_eq!(response.choices[0].message.role, Role::Assistant);
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 10);
        assert_eq!(usage.completion_tokens, 20);
        assert_eq!(usage.total_tokens, 30);
    }

    #[test]
    fn test_response_conversion_null_content() {
        let wire = WireResponse {
            model: "gpt-3.5-turbo".to_string(),
            choices: vec![WireChoice {
                message: WireMessage {
                    role: "assistant".to_string(),
                    content: None,
                },
            }],
            usage: None,
        };

        let response = OpenAiClient::convert_response(wire);
        assert_eq!(response.first_text(), Some(""));
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_response_conversion_preserves_all_choices() {
        let wire = WireResponse {
            model: "gpt-3.5-turbo".to_string(),
            choices: vec![
                WireChoice {
                    message: WireMessage {
                        role: "assistant".to_string(),
                        content: Some("one".to_string()),
                    },
                },
                WireChoice {
                    message: WireMessage {
                        role: "assistant".to_string(),
                        content: Some("two".to_string()),
                    },
                },
            ],
            usage: None,
        };

        let response = OpenAiClient::convert_response(wire);
        assert_eq!(response.texts(), vec!["one".to_string(), "two".to_string()]);
    }
}
