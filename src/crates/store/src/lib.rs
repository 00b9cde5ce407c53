//! Record storage for sayso.
//!
//! Two entity kinds back the dispatchable actions: todos (title, content,
//! status) and posts (title, content). Handlers and API routes talk to the
//! [`TodoStore`] and [`PostStore`] traits; [`MemoryStore`] is the in-process
//! implementation used by the server.

pub mod error;
pub mod memory;
pub mod records;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use records::{NewPost, NewTodo, Post, PostPatch, Todo, TodoPatch, TodoStatus};
pub use traits::{PostStore, TodoStore};
