//! Error types for the dispatch engine.

use crate::schema::ValidationError;
use serde_json::Value;
use thiserror::Error;

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors crossing the LLM client boundary.
///
/// This lives in the core crate so the engine can classify transport
/// failures without depending on any concrete provider implementation.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Provider returned a non-success status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected wire shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// API key not found in environment.
    #[error("API key not found: {0}")]
    ApiKeyMissing(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether this error came from the transport rather than the payload.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::RateLimited(_)
        )
    }
}

/// Errors that can fail a single dispatch attempt.
///
/// Malformed model output and unknown action keys are deliberately absent:
/// those are represented as [`crate::Envelope::Unresolved`] and yield a
/// `json_result: None`, not an error.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The LLM call itself failed.
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    /// The resolved action's input failed its strict schema. The handler
    /// was never invoked, so no mutation occurred. Carries the rejected
    /// input verbatim so callers can report what the model produced.
    #[error("invalid input for {action}: {source}")]
    InvalidInput {
        action: String,
        input: Value,
        #[source]
        source: ValidationError,
    },

    /// A handler targeted a record that does not exist.
    #[error("no record found for {action}: {id}")]
    NotFound { action: String, id: String },

    /// A handler's store operation failed.
    #[error("store operation failed in {action}: {message}")]
    Store { action: String, message: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DispatchError {
    /// Convenience constructor for handler-side store failures.
    pub fn store(action: impl Into<String>, err: impl std::fmt::Display) -> Self {
        DispatchError::Store {
            action: action.into(),
            message: err.to_string(),
        }
    }

    /// Convenience constructor for a missing record.
    pub fn not_found(action: impl Into<String>, id: impl Into<String>) -> Self {
        DispatchError::NotFound {
            action: action.into(),
            id: id.into(),
        }
    }
}
