//! API error types and HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sayso_core::{DispatchError, LlmError};
use serde::{Deserialize, Serialize};
use store::StoreError;
use thiserror::Error;
use transcribe::TranscribeError;

/// Error body returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
    pub code: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Malformed request data (bad base64, bad JSON).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The upstream LLM call failed.
    #[error("language model unavailable: {0}")]
    LlmUnavailable(String),

    /// Audio transcribed to an empty string.
    #[error("no text found in audio")]
    NoTranscript,

    /// Anything else.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::LlmUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::NoTranscript => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "INVALID_INPUT",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::LlmUnavailable(_) => "LLM_UNAVAILABLE",
            ApiError::NoTranscript => "NO_TRANSCRIPT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NotFound",
            ApiError::Validation(_) => "Validation",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::LlmUnavailable(_) => "LlmUnavailable",
            ApiError::NoTranscript => "NoTranscript",
            ApiError::Internal(_) => "Internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
            code: self.code().to_string(),
        };

        tracing::error!(code = body.code, message = body.message, "API error");

        (status, Json(body)).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::InvalidInput { .. } => ApiError::Validation(err.to_string()),
            DispatchError::Llm(inner) => inner.into(),
            DispatchError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        ApiError::LlmUnavailable(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
        }
    }
}

impl From<TranscribeError> for ApiError {
    fn from(err: TranscribeError) -> Self {
        match err {
            TranscribeError::NoText => ApiError::NoTranscript,
            TranscribeError::Decode(inner) => ApiError::BadRequest(inner.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_unprocessable() {
        let err = ApiError::Validation("title: required field is missing".to_string());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn llm_failure_is_bad_gateway() {
        let err: ApiError = DispatchError::Llm(LlmError::Http("timeout".to_string())).into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "LLM_UNAVAILABLE");
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err: ApiError = StoreError::NotFound("abc".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn dispatch_not_found_maps_to_404() {
        let err: ApiError = DispatchError::not_found("todo.delete", "abc").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn dispatch_store_failure_is_internal() {
        // A generic store failure is not a 404, even if its message
        // happens to mention a missing record.
        let err: ApiError =
            DispatchError::store("todo.delete", "record not found: abc").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn no_transcript_is_unprocessable() {
        let err: ApiError = TranscribeError::NoText.into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "NO_TRANSCRIPT");
    }
}
