//! Response interpretation: raw model text to a resolved action.
//!
//! The interpreter performs the *loose* envelope check only: is the reply
//! valid JSON, does it have the `{action, input}` shape, and does `action`
//! name a registered capability. The strict per-action schema check happens
//! later in the executor. Splitting the two isolates "did the model pick a
//! real capability" from "did it fill that capability's arguments
//! correctly", which produces distinct failure reporting for each.

use crate::action::ActionRegistry;
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of interpreting one model reply.
///
/// A tagged variant rather than an `Option` so every downstream consumer
/// must handle the unresolved case explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// The reply named a registered action; `input` is raw and not yet
    /// validated against that action's schema.
    Resolved { action: String, input: Value },
    /// No actionable intent: unparseable JSON, wrong shape, or an unknown
    /// action key. Never a hard error.
    Unresolved,
}

/// Interpret a raw model reply against the registry.
///
/// All failure modes return [`Envelope::Unresolved`]; this function never
/// returns an error and never panics on malformed input.
pub fn interpret(registry: &ActionRegistry, raw_text: &str) -> Envelope {
    let value: Value = match serde_json::from_str(raw_text) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "model reply is not valid JSON");
            return Envelope::Unresolved;
        }
    };

    let Some(obj) = value.as_object() else {
        debug!("model reply is JSON but not an object");
        return Envelope::Unresolved;
    };

    let Some(action) = obj.get("action").and_then(Value::as_str) else {
        debug!("model reply has no string 'action' field");
        return Envelope::Unresolved;
    };

    let Some(input) = obj.get("input") else {
        debug!(action, "model reply has no 'input' field");
        return Envelope::Unresolved;
    };

    if !registry.contains(action) {
        warn!(action, "model selected an unknown action");
        return Envelope::Unresolved;
    }

    Envelope::Resolved {
        action: action.to_string(),
        input: input.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Handler};
    use crate::execute::DispatchContext;
    use crate::schema::InputSchema;
    use crate::Result;
    use async_trait::async_trait;
    use serde_json::{json, Map};
    use std::sync::Arc;

    struct NoopHandler;

    #[async_trait]
    impl Handler for NoopHandler {
        async fn handle(
            &self,
            _ctx: &DispatchContext,
            input: Map<String, Value>,
        ) -> Result<Value> {
            Ok(Value::Object(input))
        }
    }

    fn registry() -> ActionRegistry {
        ActionRegistry::builder()
            .register(Action::new(
                "todo.create",
                json!({"title": "", "content": ""}),
                InputSchema::new().text("title").text("content"),
                Arc::new(NoopHandler),
            ))
            .build()
    }

    #[test]
    fn resolves_known_action() {
        let envelope = interpret(
            &registry(),
            r#"{"action":"todo.create","input":{"title":"buy milk","content":"remember to buy milk"}}"#,
        );
        assert_eq!(
            envelope,
            Envelope::Resolved {
                action: "todo.create".to_string(),
                input: json!({"title":"buy milk","content":"remember to buy milk"}),
            }
        );
    }

    #[test]
    fn malformed_json_is_unresolved() {
        for garbage in [
            "",
            "not json at all",
            "{truncated",
            "Sure! Here's the JSON you asked for: {\"action\":",
            "null",
            "[1, 2, 3]",
            "42",
        ] {
            assert_eq!(interpret(&registry(), garbage), Envelope::Unresolved);
        }
    }

    #[test]
    fn unknown_action_is_unresolved() {
        let envelope = interpret(
            &registry(),
            r#"{"action":"todo.explode","input":{}}"#,
        );
        assert_eq!(envelope, Envelope::Unresolved);
    }

    #[test]
    fn missing_fields_are_unresolved() {
        assert_eq!(
            interpret(&registry(), r#"{"input":{}}"#),
            Envelope::Unresolved
        );
        assert_eq!(
            interpret(&registry(), r#"{"action":"todo.create"}"#),
            Envelope::Unresolved
        );
        assert_eq!(
            interpret(&registry(), r#"{"action":17,"input":{}}"#),
            Envelope::Unresolved
        );
    }

    #[test]
    fn input_passes_through_unvalidated() {
        // The interpreter must not apply the action schema; garbage input
        // is still Resolved at this stage.
        let envelope = interpret(
            &registry(),
            r#"{"action":"todo.create","input":"garbage"}"#,
        );
        assert_eq!(
            envelope,
            Envelope::Resolved {
                action: "todo.create".to_string(),
                input: json!("garbage"),
            }
        );
    }
}
