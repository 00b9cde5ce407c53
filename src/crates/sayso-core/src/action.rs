//! Actions and the immutable action registry.
//!
//! An [`Action`] is a named, schema-validated capability: a key like
//! `"todo.create"`, an advertised example input shown to the model, a strict
//! [`InputSchema`], and an async [`Handler`] performing the mutation.
//! Delete/update actions additionally carry a [`TargetSource`] so the
//! executor can run a disambiguation round-trip when the model did not
//! supply a usable record id.
//!
//! The [`ActionRegistry`] is built once at process start via
//! [`ActionRegistryBuilder`] and never mutated afterwards, which guarantees
//! the model's view of available capabilities cannot drift mid-session.
//! Keys are kept in a `BTreeMap` so the advertised catalog is deterministic
//! and prompts are reproducible.

use crate::error::Result;
use crate::execute::DispatchContext;
use crate::schema::InputSchema;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A record offered to the model during target disambiguation.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Async mutation performed once an action's input has been validated.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Execute the mutation. `input` has already passed the action's schema;
    /// the result is returned verbatim as the dispatch's `json_result`.
    async fn handle(&self, ctx: &DispatchContext, input: Map<String, Value>) -> Result<Value>;
}

/// Lists the records an action could target, for the disambiguation
/// round-trip. Implementations should bound the list themselves.
#[async_trait]
pub trait TargetSource: Send + Sync {
    async fn candidates(&self) -> Result<Vec<Candidate>>;
}

/// A registered capability.
pub struct Action {
    key: String,
    template: Value,
    schema: InputSchema,
    target: Option<Arc<dyn TargetSource>>,
    handler: Arc<dyn Handler>,
}

impl Action {
    /// Create an action. `template` is the example input advertised to the
    /// model; it is descriptive only and never validated.
    pub fn new(
        key: impl Into<String>,
        template: Value,
        schema: InputSchema,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            key: key.into(),
            template,
            schema,
            target: None,
            handler,
        }
    }

    /// Attach a candidate source, enabling the disambiguation round-trip.
    pub fn with_target(mut self, target: Arc<dyn TargetSource>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn template(&self) -> &Value {
        &self.template
    }

    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }

    pub fn target(&self) -> Option<&Arc<dyn TargetSource>> {
        self.target.as_ref()
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

/// Builder for [`ActionRegistry`]; registration happens at startup only.
#[derive(Default)]
pub struct ActionRegistryBuilder {
    actions: BTreeMap<String, Action>,
}

impl ActionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. Re-registering a key replaces the earlier entry.
    pub fn register(mut self, action: Action) -> Self {
        self.actions.insert(action.key.clone(), action);
        self
    }

    pub fn build(self) -> ActionRegistry {
        ActionRegistry {
            actions: self.actions,
        }
    }
}

/// Immutable mapping from action key to [`Action`].
pub struct ActionRegistry {
    actions: BTreeMap<String, Action>,
}

impl ActionRegistry {
    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder::new()
    }

    pub fn lookup(&self, key: &str) -> Option<&Action> {
        self.actions.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.actions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The capability catalog shown to the model: every key mapped to
    /// `{"input": template}`, in stable key order. By construction the
    /// advertised keys are exactly the registry's keys.
    pub fn advertised(&self) -> Value {
        let mut catalog = Map::new();
        for (key, action) in &self.actions {
            let mut entry = Map::new();
            entry.insert("input".to_string(), action.template.clone());
            catalog.insert(key.clone(), Value::Object(entry));
        }
        Value::Object(catalog)
    }
}
