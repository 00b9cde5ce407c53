//! The server's registered actions.
//!
//! Five capabilities over two record kinds. Each handler pulls its fields
//! from the schema-validated input, runs the store operation, and returns
//! the resulting record as JSON. Update and delete actions carry a
//! [`TargetSource`] so the dispatcher can resolve "the one about milk" to a
//! record id.

use async_trait::async_trait;
use sayso_core::{
    Action, ActionRegistry, Candidate, DispatchContext, DispatchError, Handler, InputSchema,
    Result, TargetSource,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use store::{NewPost, NewTodo, PostStore, StoreError, TodoPatch, TodoStatus, TodoStore};

/// How many records the disambiguation round-trip advertises, newest first.
/// Keeps the secondary prompt bounded regardless of store size.
pub const DISAMBIGUATION_LIMIT: usize = 50;

fn required_str(input: &Map<String, Value>, field: &str) -> String {
    // Validation guarantees presence and type for required fields; an
    // empty fallback here is unreachable in practice.
    input
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_str(input: &Map<String, Value>, field: &str) -> Option<String> {
    input
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn parse_status(action: &str, value: &str) -> Result<TodoStatus> {
    value
        .parse()
        .map_err(|e: String| DispatchError::store(action, e))
}

/// Maps store failures onto the dispatch error taxonomy, keeping a missing
/// record distinguishable from any other store failure.
fn store_err(action: &'static str) -> impl Fn(StoreError) -> DispatchError {
    move |e| match e {
        StoreError::NotFound(id) => DispatchError::not_found(action, id),
    }
}

struct CreateTodoHandler {
    todos: Arc<dyn TodoStore>,
}

#[async_trait]
impl Handler for CreateTodoHandler {
    async fn handle(&self, _ctx: &DispatchContext, input: Map<String, Value>) -> Result<Value> {
        let status = match optional_str(&input, "status") {
            Some(s) => parse_status("todo.create", &s)?,
            None => TodoStatus::default(),
        };
        let new = NewTodo {
            title: required_str(&input, "title"),
            content: required_str(&input, "content"),
            status,
        };
        let todo = self
            .todos
            .create(new)
            .await
            .map_err(|e| DispatchError::store("todo.create", e))?;
        Ok(serde_json::to_value(todo)?)
    }
}

struct UpdateTodoHandler {
    todos: Arc<dyn TodoStore>,
}

#[async_trait]
impl Handler for UpdateTodoHandler {
    async fn handle(&self, _ctx: &DispatchContext, input: Map<String, Value>) -> Result<Value> {
        let id = required_str(&input, "id");
        let status = match optional_str(&input, "status") {
            Some(s) => Some(parse_status("todo.update", &s)?),
            None => None,
        };
        let patch = TodoPatch {
            title: optional_str(&input, "title"),
            content: optional_str(&input, "content"),
            status,
        };
        let todo = self
            .todos
            .update(&id, patch)
            .await
            .map_err(store_err("todo.update"))?;
        Ok(serde_json::to_value(todo)?)
    }
}

struct DeleteTodoHandler {
    todos: Arc<dyn TodoStore>,
}

#[async_trait]
impl Handler for DeleteTodoHandler {
    async fn handle(&self, _ctx: &DispatchContext, input: Map<String, Value>) -> Result<Value> {
        let id = required_str(&input, "id");
        let todo = self
            .todos
            .delete(&id)
            .await
            .map_err(store_err("todo.delete"))?;
        Ok(serde_json::to_value(todo)?)
    }
}

struct CreatePostHandler {
    posts: Arc<dyn PostStore>,
}

#[async_trait]
impl Handler for CreatePostHandler {
    async fn handle(&self, _ctx: &DispatchContext, input: Map<String, Value>) -> Result<Value> {
        let new = NewPost {
            title: required_str(&input, "title"),
            content: required_str(&input, "content"),
        };
        let post = self
            .posts
            .create(new)
            .await
            .map_err(|e| DispatchError::store("post.create", e))?;
        Ok(serde_json::to_value(post)?)
    }
}

struct DeletePostHandler {
    posts: Arc<dyn PostStore>,
}

#[async_trait]
impl Handler for DeletePostHandler {
    async fn handle(&self, _ctx: &DispatchContext, input: Map<String, Value>) -> Result<Value> {
        let id = required_str(&input, "id");
        let post = self
            .posts
            .delete(&id)
            .await
            .map_err(store_err("post.delete"))?;
        Ok(serde_json::to_value(post)?)
    }
}

struct TodoTargets {
    todos: Arc<dyn TodoStore>,
}

#[async_trait]
impl TargetSource for TodoTargets {
    async fn candidates(&self) -> Result<Vec<Candidate>> {
        let todos = self
            .todos
            .find_many(DISAMBIGUATION_LIMIT)
            .await
            .map_err(|e| DispatchError::store("todo targets", e))?;
        Ok(todos
            .into_iter()
            .map(|t| Candidate {
                id: t.id,
                title: t.title,
                content: t.content,
            })
            .collect())
    }
}

struct PostTargets {
    posts: Arc<dyn PostStore>,
}

#[async_trait]
impl TargetSource for PostTargets {
    async fn candidates(&self) -> Result<Vec<Candidate>> {
        let posts = self
            .posts
            .find_many(DISAMBIGUATION_LIMIT)
            .await
            .map_err(|e| DispatchError::store("post targets", e))?;
        Ok(posts
            .into_iter()
            .map(|p| Candidate {
                id: p.id,
                title: p.title,
                content: p.content,
            })
            .collect())
    }
}

fn todo_create_schema() -> InputSchema {
    InputSchema::new()
        .text("title")
        .text("content")
        .optional_enumerated("status", &TodoStatus::ALL)
        .with_default(json!("todo"))
}

fn todo_update_schema() -> InputSchema {
    InputSchema::new()
        .ident("id")
        .optional_text("title")
        .optional_text("content")
        .optional_enumerated("status", &TodoStatus::ALL)
}

fn delete_schema() -> InputSchema {
    InputSchema::new().ident("id")
}

/// Build the registry the server dispatches against.
pub fn build_registry(
    todos: Arc<dyn TodoStore>,
    posts: Arc<dyn PostStore>,
) -> ActionRegistry {
    let todo_targets = Arc::new(TodoTargets {
        todos: todos.clone(),
    });
    let post_targets = Arc::new(PostTargets {
        posts: posts.clone(),
    });

    ActionRegistry::builder()
        .register(Action::new(
            "todo.create",
            json!({"title": "the todo title", "content": "the todo content", "status": "todo"}),
            todo_create_schema(),
            Arc::new(CreateTodoHandler {
                todos: todos.clone(),
            }),
        ))
        .register(
            Action::new(
                "todo.update",
                json!({"id": "the todo id", "title": "the new title", "content": "the new content", "status": "done"}),
                todo_update_schema(),
                Arc::new(UpdateTodoHandler {
                    todos: todos.clone(),
                }),
            )
            .with_target(todo_targets.clone()),
        )
        .register(
            Action::new(
                "todo.delete",
                json!({"id": "the todo id"}),
                delete_schema(),
                Arc::new(DeleteTodoHandler { todos }),
            )
            .with_target(todo_targets),
        )
        .register(Action::new(
            "post.create",
            json!({"title": "the post title", "content": "the post content"}),
            InputSchema::new().text("title").text("content"),
            Arc::new(CreatePostHandler {
                posts: posts.clone(),
            }),
        ))
        .register(
            Action::new(
                "post.delete",
                json!({"id": "the post id"}),
                delete_schema(),
                Arc::new(DeletePostHandler { posts }),
            )
            .with_target(post_targets),
        )
        .build()
}
