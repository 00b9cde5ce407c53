//! The text prompt endpoint.

use crate::api::error::ApiResult;
use crate::api::models::PromptRequest;
use crate::api::routes::AppState;
use axum::{extract::State, Json};
use sayso_core::DispatchResult;
use tracing::info;

/// Handler for POST /api/v1/prompt.
///
/// Validates the prompt bounds, then hands it to the dispatcher. The full
/// [`DispatchResult`] goes back to the client, including the raw model
/// choices, so callers can see what the model actually said.
pub async fn dispatch_prompt(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> ApiResult<Json<DispatchResult>> {
    request.validate()?;

    info!(prompt = %request.prompt, "dispatching prompt");
    let result = state.dispatcher.handle_prompt(&request.prompt).await?;

    Ok(Json(result))
}
