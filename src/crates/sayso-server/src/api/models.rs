//! Request and response bodies.

use crate::api::error::ApiError;
use serde::{Deserialize, Serialize};
use store::TodoStatus;

/// Prompts longer than this are refused before any LLM round-trip.
pub const MAX_PROMPT_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

impl PromptRequest {
    /// Bounds check before the prompt reaches the dispatcher.
    pub fn validate(&self) -> Result<(), ApiError> {
        let len = self.prompt.chars().count();
        if len == 0 {
            return Err(ApiError::Validation("prompt must not be empty".to_string()));
        }
        if len > MAX_PROMPT_LEN {
            return Err(ApiError::Validation(format!(
                "prompt must be at most {MAX_PROMPT_LEN} characters, got {len}"
            )));
        }
        Ok(())
    }
}

/// Completion texts from the joke endpoint, in choice order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JokeResponse {
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeRequest {
    /// Base64-encoded audio.
    pub audio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: TodoStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<TodoStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_bounds() {
        assert!(PromptRequest {
            prompt: String::new()
        }
        .validate()
        .is_err());

        assert!(PromptRequest {
            prompt: "buy milk".to_string()
        }
        .validate()
        .is_ok());

        assert!(PromptRequest {
            prompt: "x".repeat(MAX_PROMPT_LEN)
        }
        .validate()
        .is_ok());

        assert!(PromptRequest {
            prompt: "x".repeat(MAX_PROMPT_LEN + 1)
        }
        .validate()
        .is_err());
    }

    #[test]
    fn prompt_length_is_in_characters() {
        // 255 multibyte characters are fine even though the byte count is larger.
        let prompt = "ü".repeat(MAX_PROMPT_LEN);
        assert!(PromptRequest { prompt }.validate().is_ok());
    }

    #[test]
    fn list_query_default_limit() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 100);
    }
}
