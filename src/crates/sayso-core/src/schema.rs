//! Strict per-action input validation.
//!
//! Every registered action carries an [`InputSchema`]: an ordered list of
//! field rules validated against the JSON object the model produced. The
//! validator rejects missing required fields, wrong types, empty strings
//! and malformed identifiers, but deliberately *ignores* extra fields the
//! model invented: the input is free text coerced to JSON, and
//! over-generation is common enough that tolerance is policy.
//!
//! Validation reports every problem at once via [`ValidationError`], so a
//! caller can show exactly why a dispatch was refused.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// UUID-shaped identifier, as generated by the record store.
const IDENT_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

/// Whether `value` looks like a store-generated identifier.
pub fn is_ident(value: &str) -> bool {
    // The pattern is a compile-time constant, so construction cannot fail.
    Regex::new(IDENT_PATTERN)
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// Field categories understood by the validator.
///
/// All action inputs are string-valued; the kind selects which extra
/// constraints apply on top of the type check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, non-empty when required or present.
    Text,
    /// Store-generated identifier, must match the UUID format.
    Ident,
    /// One of a fixed set of values.
    Enum,
}

/// Validation rules for one input field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Minimum length for text values (1 = non-empty).
    pub min_len: usize,
    /// Allowed values for [`FieldKind::Enum`].
    pub one_of: Option<Vec<String>>,
    /// Inserted when the field is absent.
    pub default: Option<Value>,
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub field: String,
    pub message: String,
}

/// Itemized validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Schema for one action's input object.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    fields: Vec<FieldRule>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required non-empty text field.
    pub fn text(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldRule {
            name: name.into(),
            kind: FieldKind::Text,
            required: true,
            min_len: 1,
            one_of: None,
            default: None,
        });
        self
    }

    /// Optional text field, non-empty when present.
    pub fn optional_text(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldRule {
            name: name.into(),
            kind: FieldKind::Text,
            required: false,
            min_len: 1,
            one_of: None,
            default: None,
        });
        self
    }

    /// Required identifier field (UUID format).
    pub fn ident(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldRule {
            name: name.into(),
            kind: FieldKind::Ident,
            required: true,
            min_len: 1,
            one_of: None,
            default: None,
        });
        self
    }

    /// Optional enumerated field.
    pub fn optional_enumerated(
        mut self,
        name: impl Into<String>,
        values: &[&str],
    ) -> Self {
        self.fields.push(FieldRule {
            name: name.into(),
            kind: FieldKind::Enum,
            required: false,
            min_len: 1,
            one_of: Some(values.iter().map(|v| v.to_string()).collect()),
            default: None,
        });
        self
    }

    /// Attach a default to the most recently added field, applied when the
    /// field is absent from the input.
    pub fn with_default(mut self, value: Value) -> Self {
        if let Some(rule) = self.fields.last_mut() {
            rule.default = Some(value);
        }
        self
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Validate untrusted input against this schema.
    ///
    /// Returns the validated object (known fields only, defaults applied)
    /// or every problem found.
    pub fn validate(&self, raw: &Value) -> Result<Map<String, Value>, ValidationError> {
        let Some(obj) = raw.as_object() else {
            return Err(ValidationError {
                issues: vec![Issue {
                    field: "input".to_string(),
                    message: "must be a JSON object".to_string(),
                }],
            });
        };

        let mut out = Map::new();
        let mut issues = Vec::new();

        for rule in &self.fields {
            let value = match obj.get(&rule.name) {
                Some(v) => v,
                None => {
                    if let Some(default) = &rule.default {
                        out.insert(rule.name.clone(), default.clone());
                    } else if rule.required {
                        issues.push(Issue {
                            field: rule.name.clone(),
                            message: "required field is missing".to_string(),
                        });
                    }
                    continue;
                }
            };

            let Some(text) = value.as_str() else {
                issues.push(Issue {
                    field: rule.name.clone(),
                    message: "must be a string".to_string(),
                });
                continue;
            };

            if text.chars().count() < rule.min_len {
                issues.push(Issue {
                    field: rule.name.clone(),
                    message: "must not be empty".to_string(),
                });
                continue;
            }

            match rule.kind {
                FieldKind::Text => {}
                FieldKind::Ident => {
                    if !is_ident(text) {
                        issues.push(Issue {
                            field: rule.name.clone(),
                            message: "malformed identifier".to_string(),
                        });
                        continue;
                    }
                }
                FieldKind::Enum => {
                    let allowed = rule.one_of.as_deref().unwrap_or(&[]);
                    if !allowed.iter().any(|v| v == text) {
                        issues.push(Issue {
                            field: rule.name.clone(),
                            message: format!("must be one of: {}", allowed.join(", ")),
                        });
                        continue;
                    }
                }
            }

            out.insert(rule.name.clone(), value.clone());
        }

        if issues.is_empty() {
            Ok(out)
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_schema() -> InputSchema {
        InputSchema::new()
            .text("title")
            .text("content")
            .optional_enumerated("status", &["todo", "doing", "done"])
            .with_default(json!("todo"))
    }

    #[test]
    fn accepts_valid_input_and_applies_default() {
        let out = create_schema()
            .validate(&json!({"title": "A", "content": "B"}))
            .unwrap();
        assert_eq!(out["title"], "A");
        assert_eq!(out["content"], "B");
        assert_eq!(out["status"], "todo");
    }

    #[test]
    fn rejects_empty_required_string() {
        let err = create_schema()
            .validate(&json!({"title": "", "content": "B"}))
            .unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "title");
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = create_schema().validate(&json!({"title": "A"})).unwrap_err();
        assert_eq!(err.issues[0].field, "content");
        assert_eq!(err.issues[0].message, "required field is missing");
    }

    #[test]
    fn reports_all_issues_at_once() {
        let err = create_schema()
            .validate(&json!({"title": 3, "content": "", "status": "later"}))
            .unwrap_err();
        assert_eq!(err.issues.len(), 3);
        let fields: Vec<&str> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "content", "status"]);
    }

    #[test]
    fn ignores_extra_fields() {
        let out = create_schema()
            .validate(&json!({"title": "A", "content": "B", "mood": "cheerful"}))
            .unwrap();
        assert!(!out.contains_key("mood"));
    }

    #[test]
    fn rejects_non_object_input() {
        let err = create_schema().validate(&json!("just a string")).unwrap_err();
        assert_eq!(err.issues[0].field, "input");
    }

    #[test]
    fn ident_format_enforced() {
        let schema = InputSchema::new().ident("id");
        assert!(schema.validate(&json!({"id": "not-a-uuid"})).is_err());
        assert!(schema
            .validate(&json!({"id": "2f9f0e7c-33aa-4cb4-9774-b70c23b0c9e1"}))
            .is_ok());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let schema = InputSchema::new()
            .ident("id")
            .optional_text("title")
            .optional_text("content");
        let out = schema
            .validate(&json!({"id": "2f9f0e7c-33aa-4cb4-9774-b70c23b0c9e1"}))
            .unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn enum_rejects_unknown_value() {
        let err = create_schema()
            .validate(&json!({"title": "A", "content": "B", "status": "someday"}))
            .unwrap_err();
        assert_eq!(err.issues[0].field, "status");
        assert!(err.issues[0].message.contains("todo, doing, done"));
    }

    #[test]
    fn display_joins_issues() {
        let err = create_schema().validate(&json!({})).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("title: required field is missing"));
        assert!(rendered.contains("; "));
    }
}
