//! Prompt-to-action dispatch engine for sayso.
//!
//! This crate turns a free-text user prompt into a validated, executed
//! mutation against a record store. The pipeline is a single linear async
//! flow per invocation:
//!
//! ```text
//! prompt ──> Prompt Compiler ──> ChatModel ──> Response Interpreter
//!                                                     │
//!                                              Envelope::Resolved
//!                                                     │
//!                              Dispatch Executor ──> Schema ──> Handler
//! ```
//!
//! The engine advertises its capabilities to the model as a JSON catalog,
//! asks for exactly one `{ "action": ..., "input": ... }` object back, and
//! treats everything the model returns as untrusted until it passes the
//! resolved action's strict [`InputSchema`].
//!
//! # Design notes
//!
//! - The [`ActionRegistry`] is an immutable value built once at startup and
//!   shared via `Arc`; concurrent dispatches never synchronize on it.
//! - Malformed model output and unknown action keys are *not* errors. They
//!   produce [`Envelope::Unresolved`] and the dispatch yields a result with
//!   `json_result: None`. Only a schema failure on a real action is a hard
//!   failure ([`DispatchError::InvalidInput`]).
//! - Delete/update actions may carry a [`TargetSource`]; when the model did
//!   not supply a usable id, the executor runs a second round-trip that
//!   lists candidate records and asks for the target id alone.
//!
//! # Quick start
//!
//! ```rust,ignore
//! let registry = Arc::new(
//!     ActionRegistry::builder()
//!         .register(Action::new("todo.create", template, schema, handler))
//!         .build(),
//! );
//! let dispatcher = Dispatcher::new(registry, Arc::new(client));
//!
//! let result = dispatcher.handle_prompt("create a todo to buy milk").await?;
//! println!("{:?}", result.json_result);
//! ```

pub mod action;
pub mod chat;
pub mod dispatch;
pub mod error;
pub mod execute;
pub mod interpret;
pub mod prompt;
pub mod schema;

pub use action::{Action, ActionRegistry, ActionRegistryBuilder, Candidate, Handler, TargetSource};
pub use chat::{ChatMessage, ChatModel, ChatRequest, ChatResponse, Choice, Role, Usage};
pub use dispatch::{DispatchResult, Dispatcher};
pub use error::{DispatchError, LlmError, Result};
pub use execute::{DispatchContext, Executor};
pub use interpret::{interpret, Envelope};
pub use prompt::{compile_classification, compile_disambiguation, EMPTY_SENTINEL};
pub use schema::{FieldKind, InputSchema, ValidationError};

#[cfg(test)]
pub(crate) mod testing {
    use super::chat::{ChatMessage, ChatModel, ChatRequest, ChatResponse, Choice};
    use super::error::LlmError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Chat model scripted with a queue of canned replies.
    ///
    /// Each `complete` call pops the next reply; an empty queue returns a
    /// transport error so a test that issues too many calls fails loudly.
    #[derive(Clone, Default)]
    pub struct MockModel {
        replies: Arc<Mutex<VecDeque<String>>>,
        pub requests: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl MockModel {
        pub fn new(replies: impl IntoIterator<Item = &'static str>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(
                    replies.into_iter().map(str::to_string).collect(),
                )),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatModel for MockModel {
        async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::Http("mock model exhausted".to_string()))?;
            Ok(ChatResponse {
                model: "mock".to_string(),
                choices: vec![Choice {
                    message: ChatMessage::assistant(reply),
                }],
                usage: None,
            })
        }

        fn clone_box(&self) -> Box<dyn ChatModel> {
            Box::new(self.clone())
        }
    }
}
