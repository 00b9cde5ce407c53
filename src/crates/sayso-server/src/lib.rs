//! HTTP server exposing the sayso prompt dispatcher.
//!
//! Wires together the pieces from the other crates: the action registry and
//! dispatcher from `sayso-core`, the OpenAI client from `llm`, the record
//! store from `store`, and the whisper pipeline from `transcribe`. The API
//! surface is a small REST layer plus the two prompt endpoints (`/prompt`
//! for text, `/transcribe/prompt` for voice).

pub mod actions;
pub mod api;
pub mod config;

pub use actions::build_registry;
pub use api::routes::{create_router, AppState};
pub use config::ServerConfig;
