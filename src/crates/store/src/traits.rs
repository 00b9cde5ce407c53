//! Storage traits.
//!
//! The dispatch handlers and the API layer depend on these traits only, so
//! a persistent backend can replace [`crate::MemoryStore`] without touching
//! either.

use crate::error::Result;
use crate::records::{NewPost, NewTodo, Post, PostPatch, Todo, TodoPatch};
use async_trait::async_trait;

/// Todo persistence.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn create(&self, new: NewTodo) -> Result<Todo>;

    /// Up to `limit` todos, newest first.
    async fn find_many(&self, limit: usize) -> Result<Vec<Todo>>;

    async fn find_first(&self, id: &str) -> Result<Option<Todo>>;

    /// Apply a partial update. `NotFound` when the id does not exist.
    async fn update(&self, id: &str, patch: TodoPatch) -> Result<Todo>;

    /// Remove a record. `NotFound` when the id does not exist.
    async fn delete(&self, id: &str) -> Result<Todo>;
}

/// Post persistence.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, new: NewPost) -> Result<Post>;

    /// Up to `limit` posts, newest first.
    async fn find_many(&self, limit: usize) -> Result<Vec<Post>>;

    async fn find_first(&self, id: &str) -> Result<Option<Post>>;

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Post>;

    async fn delete(&self, id: &str) -> Result<Post>;
}
