//! Voice endpoints: transcription alone, and transcribe-then-dispatch.

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{PromptRequest, TranscribeRequest, TranscribeResponse};
use crate::api::routes::AppState;
use axum::{extract::State, Json};
use sayso_core::DispatchResult;
use tracing::info;

/// Handler for POST /api/v1/transcribe.
pub async fn transcribe_audio(
    State(state): State<AppState>,
    Json(request): Json<TranscribeRequest>,
) -> ApiResult<Json<TranscribeResponse>> {
    let text = state.whisper.transcribe_base64(&request.audio).await?;
    Ok(Json(TranscribeResponse { text }))
}

/// Handler for POST /api/v1/transcribe/prompt.
///
/// The voice path: transcribe the audio, then dispatch the transcript as a
/// prompt. The transcript goes through the same bounds check as a typed
/// prompt; a rant longer than the limit is refused rather than truncated.
pub async fn transcribe_prompt(
    State(state): State<AppState>,
    Json(request): Json<TranscribeRequest>,
) -> ApiResult<Json<TranscribedDispatch>> {
    let text = state.whisper.transcribe_base64(&request.audio).await?;
    info!(transcript = %text, "dispatching transcribed prompt");

    let prompt = PromptRequest {
        prompt: text.clone(),
    };
    prompt.validate().map_err(|err| match err {
        ApiError::Validation(msg) => ApiError::Validation(format!("transcript {msg}")),
        other => other,
    })?;

    let result = state.dispatcher.handle_prompt(&text).await?;

    Ok(Json(TranscribedDispatch { text, result }))
}

/// Response for the voice path: the transcript plus the dispatch outcome.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TranscribedDispatch {
    pub text: String,
    pub result: DispatchResult,
}
