//! Direct REST access to posts, bypassing the LLM.

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{CreatePostRequest, ListQuery, UpdatePostRequest};
use crate::api::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use store::{NewPost, Post, PostPatch};

/// Handler for POST /api/v1/posts.
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    if request.title.is_empty() || request.content.is_empty() {
        return Err(ApiError::Validation(
            "title and content must not be empty".to_string(),
        ));
    }

    let post = state
        .posts
        .create(NewPost {
            title: request.title,
            content: request.content,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Handler for GET /api/v1/posts.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(state.posts.find_many(query.limit).await?))
}

/// Handler for GET /api/v1/posts/:id.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Post>> {
    state
        .posts
        .find_first(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// Handler for PUT /api/v1/posts/:id.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    let patch = PostPatch {
        title: request.title,
        content: request.content,
    };
    if !patch.has_updates() {
        return Err(ApiError::Validation("no fields to update".to_string()));
    }

    Ok(Json(state.posts.update(&id, patch).await?))
}

/// Handler for DELETE /api/v1/posts/:id.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.posts.delete(&id).await?))
}
