//! Direct REST access to todos, bypassing the LLM.

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{CreateTodoRequest, ListQuery, UpdateTodoRequest};
use crate::api::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use store::{NewTodo, Todo, TodoPatch};

/// Handler for POST /api/v1/todos.
pub async fn create_todo(
    State(state): State<AppState>,
    Json(request): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    if request.title.is_empty() || request.content.is_empty() {
        return Err(ApiError::Validation(
            "title and content must not be empty".to_string(),
        ));
    }

    let todo = state
        .todos
        .create(NewTodo {
            title: request.title,
            content: request.content,
            status: request.status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Handler for GET /api/v1/todos.
pub async fn list_todos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Todo>>> {
    Ok(Json(state.todos.find_many(query.limit).await?))
}

/// Handler for GET /api/v1/todos/:id.
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Todo>> {
    state
        .todos
        .find_first(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// Handler for PUT /api/v1/todos/:id.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    let patch = TodoPatch {
        title: request.title,
        content: request.content,
        status: request.status,
    };
    if !patch.has_updates() {
        return Err(ApiError::Validation("no fields to update".to_string()));
    }

    Ok(Json(state.todos.update(&id, patch).await?))
}

/// Handler for DELETE /api/v1/todos/:id.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Todo>> {
    Ok(Json(state.todos.delete(&id).await?))
}
