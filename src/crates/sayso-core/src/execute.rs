//! Dispatch execution: disambiguation, validation, handler invocation.

use crate::action::Action;
use crate::chat::{ChatModel, ChatRequest};
use crate::error::{DispatchError, Result};
use crate::prompt::{compile_disambiguation, EMPTY_SENTINEL};
use crate::schema::is_ident;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// What the primary round-trip produced, made available to handlers.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    /// The user's prompt, exactly as received.
    pub prompt: String,
    /// Raw texts of the primary completion's choices.
    pub choices: Vec<String>,
}

/// Executes a resolved action against its schema and handler.
pub struct Executor {
    model: Arc<dyn ChatModel>,
}

impl Executor {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Run one resolved action.
    ///
    /// 1. If the action carries a [`crate::TargetSource`] and the raw input
    ///    lacks a usable id, issue the disambiguation round-trip. The
    ///    empty-match sentinel is checked before any validation; it makes
    ///    the dispatch a no-op with an empty result and no mutation.
    /// 2. Validate the input against the action's strict schema; a failure
    ///    is a hard [`DispatchError::InvalidInput`] and the handler never
    ///    runs.
    /// 3. Invoke the handler and return its result verbatim.
    pub async fn execute(
        &self,
        action: &Action,
        raw_input: Value,
        ctx: &DispatchContext,
    ) -> Result<Value> {
        let mut raw_input = raw_input;

        if let Some(target) = action.target() {
            if !has_usable_id(&raw_input) {
                match self.resolve_target(action, target.as_ref(), ctx).await? {
                    Some(id) => {
                        debug!(action = action.key(), %id, "disambiguation resolved a target");
                        merge_id(&mut raw_input, id);
                    }
                    None => {
                        info!(action = action.key(), "no matching record; dispatch is a no-op");
                        return Ok(Value::Object(Map::new()));
                    }
                }
            }
        }

        let validated = action
            .schema()
            .validate(&raw_input)
            .map_err(|source| DispatchError::InvalidInput {
                action: action.key().to_string(),
                input: raw_input,
                source,
            })?;

        action.handler().handle(ctx, validated).await
    }

    /// Secondary round-trip: list candidates, ask for the target id alone.
    ///
    /// Returns `None` when the model answers with the empty-match sentinel
    /// (an empty string or `"{}"`).
    async fn resolve_target(
        &self,
        action: &Action,
        target: &dyn crate::action::TargetSource,
        ctx: &DispatchContext,
    ) -> Result<Option<String>> {
        let candidates = target.candidates().await?;
        debug!(
            action = action.key(),
            candidates = candidates.len(),
            "issuing disambiguation round-trip"
        );

        let messages = compile_disambiguation(&ctx.prompt, &candidates);
        let response = self.model.complete(ChatRequest::new(messages)).await?;

        // Models occasionally wrap the id in quotes; strip them before the
        // sentinel check so a quoted sentinel still counts.
        let reply = response
            .first_text()
            .map(|t| t.trim().trim_matches('"').trim())
            .unwrap_or("");

        if reply.is_empty() || reply == EMPTY_SENTINEL {
            return Ok(None);
        }

        Ok(Some(reply.to_string()))
    }
}

fn has_usable_id(input: &Value) -> bool {
    input
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(is_ident)
}

fn merge_id(input: &mut Value, id: String) {
    if let Some(obj) = input.as_object_mut() {
        obj.insert("id".to_string(), Value::String(id));
    } else {
        let mut obj = Map::new();
        obj.insert("id".to_string(), Value::String(id));
        *input = Value::Object(obj);
    }
}
