//! Record types: todos and posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow state of a todo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TodoStatus {
    /// Every status value, in workflow order.
    pub const ALL: [&'static str; 3] = ["todo", "doing", "done"];
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TodoStatus::Todo => "todo",
            TodoStatus::Doing => "doing",
            TodoStatus::Done => "done",
        };
        f.write_str(s)
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TodoStatus::Todo),
            "doing" => Ok(TodoStatus::Doing),
            "done" => Ok(TodoStatus::Done),
            other => Err(format!("unknown todo status: {other}")),
        }
    }
}

/// A stored todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: TodoStatus,
}

/// Partial update for a todo; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<TodoStatus>,
}

impl TodoPatch {
    pub fn has_updates(&self) -> bool {
        self.title.is_some() || self.content.is_some() || self.status.is_some()
    }
}

/// Fields for creating a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// Partial update for a post; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn has_updates(&self) -> bool {
        self.title.is_some() || self.content.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for name in TodoStatus::ALL {
            let status: TodoStatus = name.parse().unwrap();
            assert_eq!(status.to_string(), name);
        }
        assert!("someday".parse::<TodoStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TodoStatus::Doing).unwrap(), "\"doing\"");
        let status: TodoStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(status, TodoStatus::Done);
    }

    #[test]
    fn default_status_is_todo() {
        assert_eq!(TodoStatus::default(), TodoStatus::Todo);
    }

    #[test]
    fn empty_patch_has_no_updates() {
        assert!(!TodoPatch::default().has_updates());
        assert!(TodoPatch {
            status: Some(TodoStatus::Done),
            ..Default::default()
        }
        .has_updates());
        assert!(!PostPatch::default().has_updates());
    }
}
