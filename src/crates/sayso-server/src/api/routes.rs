//! Route definitions and shared state.

use crate::api::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use sayso_core::{ChatModel, Dispatcher};
use std::sync::Arc;
use store::{PostStore, TodoStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use transcribe::Whisper;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    /// The chat model, shared with the dispatcher, for endpoints that
    /// talk to the model outside the action pipeline.
    pub model: Arc<dyn ChatModel>,
    pub todos: Arc<dyn TodoStore>,
    pub posts: Arc<dyn PostStore>,
    pub whisper: Arc<Whisper>,
}

/// Build the complete API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Prompt dispatch
        .route("/api/v1/prompt", post(handlers::dispatch_prompt))
        // Plain completion, no dispatch
        .route("/api/v1/joke", post(handlers::tell_joke))
        // Voice
        .route("/api/v1/transcribe", post(handlers::transcribe_audio))
        .route(
            "/api/v1/transcribe/prompt",
            post(handlers::transcribe_prompt),
        )
        // Todos
        .route(
            "/api/v1/todos",
            post(handlers::create_todo).get(handlers::list_todos),
        )
        .route(
            "/api/v1/todos/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        // Posts
        .route(
            "/api/v1/posts",
            post(handlers::create_post).get(handlers::list_posts),
        )
        .route(
            "/api/v1/posts/:id",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
