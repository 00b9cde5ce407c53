//! The joke endpoint.

use crate::api::error::ApiResult;
use crate::api::models::{JokeResponse, PromptRequest};
use crate::api::routes::AppState;
use axum::{extract::State, Json};
use sayso_core::{ChatMessage, ChatRequest};
use tracing::info;

const JOKE_INSTRUCTION: &str = "You are an assistant that says jokes, and only jokes. \
     The user will give you a context, and you need to create a joke based on that context";

/// Handler for POST /api/v1/joke.
///
/// Same prompt bounds as dispatch, but the completion goes straight back to
/// the client instead of through the action pipeline. No record is touched.
pub async fn tell_joke(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> ApiResult<Json<JokeResponse>> {
    request.validate()?;

    info!(prompt = %request.prompt, "requesting a joke");
    let messages = vec![
        ChatMessage::system(JOKE_INSTRUCTION),
        ChatMessage::user(request.prompt.as_str()),
    ];
    let response = state.model.complete(ChatRequest::new(messages)).await?;

    Ok(Json(JokeResponse {
        choices: response.texts(),
    }))
}
