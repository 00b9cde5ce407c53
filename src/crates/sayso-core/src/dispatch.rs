//! The top-level dispatcher: one prompt in, one [`DispatchResult`] out.

use crate::action::ActionRegistry;
use crate::chat::{ChatModel, ChatRequest};
use crate::error::Result;
use crate::execute::{DispatchContext, Executor};
use crate::interpret::{interpret, Envelope};
use crate::prompt::compile_classification;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything one dispatch produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Raw texts of the primary completion's choices, in order.
    pub choices: Vec<String>,
    /// The outbound instruction contents, for inspection and debugging.
    pub messages: Vec<String>,
    /// The executed handler's result. `None` when the reply did not resolve
    /// to an action, or when a disambiguation found no matching record and
    /// the handler returned an empty object.
    pub json_result: Option<Value>,
}

/// Orchestrates the full prompt-to-mutation pipeline.
///
/// Cheap to clone; the registry and model are shared behind `Arc`s, so a
/// server can hand one dispatcher to every request without synchronization.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
    model: Arc<dyn ChatModel>,
    executor: Arc<Executor>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ActionRegistry>, model: Arc<dyn ChatModel>) -> Self {
        let executor = Arc::new(Executor::new(model.clone()));
        Self {
            registry,
            model,
            executor,
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Dispatch one free-text prompt.
    ///
    /// Compiles the classification instruction, runs the primary round-trip,
    /// interprets the first choice, and executes the resolved action. An
    /// unresolved reply is not an error; the result simply carries no
    /// `json_result`.
    pub async fn handle_prompt(&self, user_prompt: &str) -> Result<DispatchResult> {
        let messages = compile_classification(&self.registry, user_prompt);
        let outbound: Vec<String> = messages.iter().map(|m| m.content.clone()).collect();

        let response = self.model.complete(ChatRequest::new(messages)).await?;
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "classification round-trip usage"
            );
        }

        let choices = response.texts();
        let reply = response.first_text().unwrap_or_default();
        debug!(reply, "classification reply");

        let json_result = match interpret(&self.registry, reply) {
            Envelope::Resolved { action, input } => {
                info!(%action, "dispatching resolved action");
                // interpret() only resolves registered keys, so lookup holds.
                match self.registry.lookup(&action) {
                    Some(action) => {
                        let ctx = DispatchContext {
                            prompt: user_prompt.to_string(),
                            choices: choices.clone(),
                        };
                        Some(self.executor.execute(action, input, &ctx).await?)
                    }
                    None => None,
                }
            }
            Envelope::Unresolved => {
                info!("prompt did not resolve to an action");
                None
            }
        };

        Ok(DispatchResult {
            choices,
            messages: outbound,
            json_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Handler};
    use crate::error::DispatchError;
    use crate::schema::InputSchema;
    use crate::testing::MockModel;
    use async_trait::async_trait;
    use serde_json::{json, Map};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Handler for EchoHandler {
        async fn handle(
            &self,
            _ctx: &DispatchContext,
            input: Map<String, Value>,
        ) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"created": Value::Object(input)}))
        }
    }

    fn dispatcher(model: MockModel, calls: Arc<AtomicUsize>) -> Dispatcher {
        let registry = ActionRegistry::builder()
            .register(Action::new(
                "todo.create",
                json!({"title": "title", "content": "content"}),
                InputSchema::new().text("title").text("content"),
                Arc::new(EchoHandler { calls }),
            ))
            .build();
        Dispatcher::new(Arc::new(registry), Arc::new(model))
    }

    #[tokio::test]
    async fn buy_milk_creates_a_todo() {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = MockModel::new([
            r#"{"action":"todo.create","input":{"title":"buy milk","content":"pick up milk on the way home"}}"#,
        ]);
        let dispatcher = dispatcher(model.clone(), calls.clone());

        let result = dispatcher.handle_prompt("buy milk").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let created = &result.json_result.unwrap()["created"];
        assert_eq!(created["title"], "buy milk");
        assert_eq!(result.choices.len(), 1);
        assert!(result.messages[0].contains("todo.create"));
        // One classification round-trip, no disambiguation.
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn unresolved_reply_is_not_an_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = MockModel::new(["I'm sorry, I can't help with that."]);
        let dispatcher = dispatcher(model, calls.clone());

        let result = dispatcher.handle_prompt("what's the weather").await.unwrap();

        assert!(result.json_result.is_none());
        assert_eq!(result.choices.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_action_is_not_an_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = MockModel::new([r#"{"action":"calendar.create","input":{}}"#]);
        let dispatcher = dispatcher(model, calls.clone());

        let result = dispatcher.handle_prompt("schedule a meeting").await.unwrap();

        assert!(result.json_result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_input_is_a_hard_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = MockModel::new([r#"{"action":"todo.create","input":{"title":""}}"#]);
        let dispatcher = dispatcher(model, calls.clone());

        let err = dispatcher.handle_prompt("buy milk").await.unwrap_err();

        assert!(matches!(err, DispatchError::InvalidInput { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = MockModel::new([]);
        let dispatcher = dispatcher(model, calls.clone());

        let err = dispatcher.handle_prompt("buy milk").await.unwrap_err();
        assert!(matches!(err, DispatchError::Llm(_)));
    }

    #[tokio::test]
    async fn empty_choices_is_unresolved() {
        // A response with no choices interprets as an empty reply.
        struct EmptyModel;

        #[async_trait]
        impl ChatModel for EmptyModel {
            async fn complete(
                &self,
                _request: ChatRequest,
            ) -> std::result::Result<crate::ChatResponse, crate::LlmError> {
                Ok(crate::ChatResponse {
                    model: "mock".to_string(),
                    choices: vec![],
                    usage: None,
                })
            }

            fn clone_box(&self) -> Box<dyn ChatModel> {
                Box::new(EmptyModel)
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let registry = ActionRegistry::builder()
            .register(Action::new(
                "todo.create",
                json!({"title": "t", "content": "c"}),
                InputSchema::new().text("title").text("content"),
                Arc::new(EchoHandler {
                    calls: calls.clone(),
                }),
            ))
            .build();
        let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(EmptyModel));

        let result = dispatcher.handle_prompt("buy milk").await.unwrap();
        assert!(result.json_result.is_none());
        assert!(result.choices.is_empty());
    }
}
