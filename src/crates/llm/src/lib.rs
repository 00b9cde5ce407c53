//! Chat-completion provider clients for sayso.
//!
//! This crate provides concrete implementations of the `ChatModel` trait
//! from `sayso-core`. The dispatch engine only ever sees the trait; swapping
//! providers is a wiring change in the server binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::{LlmConfig, OpenAiClient};
//! use sayso_core::{ChatModel, ChatMessage, ChatRequest};
//!
//! let config = LlmConfig::from_env("OPENAI_API_KEY")?;
//! let client = OpenAiClient::new(config);
//!
//! let request = ChatRequest::new(vec![ChatMessage::system("You only return JSON.")]);
//! let response = client.complete(request).await?;
//! ```

pub mod config;
pub mod openai;

pub use config::LlmConfig;
pub use openai::OpenAiClient;
