//! In-memory store backed by `tokio::sync::RwLock`.

use crate::error::{Result, StoreError};
use crate::records::{NewPost, NewTodo, Post, PostPatch, Todo, TodoPatch};
use crate::traits::{PostStore, TodoStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-process record store. Cheap to clone; clones share the same maps.
///
/// Records live for the process lifetime only. Reads take a shared lock,
/// mutations an exclusive one, per entity kind.
#[derive(Clone, Default)]
pub struct MemoryStore {
    todos: Arc<RwLock<HashMap<String, Todo>>>,
    posts: Arc<RwLock<HashMap<String, Post>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record. Intended for tests.
    pub async fn clear(&self) {
        self.todos.write().await.clear();
        self.posts.write().await.clear();
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create(&self, new: NewTodo) -> Result<Todo> {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            content: new.content,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        debug!(id = %todo.id, "todo created");
        self.todos.write().await.insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    async fn find_many(&self, limit: usize) -> Result<Vec<Todo>> {
        let todos = self.todos.read().await;
        let mut all: Vec<Todo> = todos.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        Ok(all)
    }

    async fn find_first(&self, id: &str) -> Result<Option<Todo>> {
        Ok(self.todos.read().await.get(id).cloned())
    }

    async fn update(&self, id: &str, patch: TodoPatch) -> Result<Todo> {
        let mut todos = self.todos.write().await;
        let todo = todos
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(content) = patch.content {
            todo.content = content;
        }
        if let Some(status) = patch.status {
            todo.status = status;
        }
        todo.updated_at = Utc::now();

        Ok(todo.clone())
    }

    async fn delete(&self, id: &str) -> Result<Todo> {
        self.todos
            .write()
            .await
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, new: NewPost) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            content: new.content,
            created_at: now,
            updated_at: now,
        };
        debug!(id = %post.id, "post created");
        self.posts.write().await.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn find_many(&self, limit: usize) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        Ok(all)
    }

    async fn find_first(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let post = posts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        post.updated_at = Utc::now();

        Ok(post.clone())
    }

    async fn delete(&self, id: &str) -> Result<Post> {
        self.posts
            .write()
            .await
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
