//! Route handlers.

pub mod health;
pub mod joke;
pub mod posts;
pub mod prompt;
pub mod todos;
pub mod transcribe;

pub use health::health;
pub use joke::tell_joke;
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use prompt::dispatch_prompt;
pub use todos::{create_todo, delete_todo, get_todo, list_todos, update_todo};
pub use transcribe::{transcribe_audio, transcribe_prompt};
