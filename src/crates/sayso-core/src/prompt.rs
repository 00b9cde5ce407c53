//! Prompt compilation.
//!
//! Outbound instructions are assembled from structured parts and serialized
//! last. The user's text is embedded as a JSON string literal, so quotes or
//! newlines in the prompt cannot break out of the instruction's framing.

use crate::action::{ActionRegistry, Candidate};
use crate::chat::ChatMessage;

/// Reply value the disambiguation round-trip uses to signal "no matching
/// record". Checked before any parse or validation step.
pub const EMPTY_SENTINEL: &str = "{}";

/// Build the primary classification instruction: the full capability
/// catalog, the user's prompt, and an output contract demanding a single
/// JSON object `{ "action": ..., "input": ... }` with no prose.
///
/// The model is explicitly authorized to fabricate plausible values for
/// input fields the user omitted; best-effort creative completion is an
/// accepted tradeoff, not a defect.
pub fn compile_classification(registry: &ActionRegistry, user_prompt: &str) -> Vec<ChatMessage> {
    let catalog = serde_json::to_string(&registry.advertised()).unwrap_or_default();
    let quoted_prompt = serde_json::to_string(user_prompt).unwrap_or_default();

    let instruction = [
        "You receive a user prompt and select the correct action from a JSON catalog of actions. You only return JSON.".to_string(),
        "The actions and their example inputs in JSON format are:".to_string(),
        catalog,
        "-------".to_string(),
        format!(
            "Given the user prompt {quoted_prompt}, return only the JSON output according to the schema:"
        ),
        r#"{ "action": /* one of the action keys */, "input": /* input object for that action */ }"#
            .to_string(),
        "If the user does not provide every input value, generate appropriate values based on the context and the action. For example, if only a title is provided, create suitable content based on the title. You can be creative here.".to_string(),
        "Return just the JSON output, without extra context or explanation.".to_string(),
    ]
    .join("\n ");

    vec![ChatMessage::system(instruction)]
}

/// Build the secondary disambiguation instruction: list the candidate
/// records and ask for the target id alone, or the empty sentinel when
/// nothing matches.
pub fn compile_disambiguation(user_prompt: &str, candidates: &[Candidate]) -> Vec<ChatMessage> {
    let records = serde_json::to_string(candidates).unwrap_or_default();
    let quoted_prompt = serde_json::to_string(user_prompt).unwrap_or_default();

    let instruction = [
        "You need to select the record targeted by the user's request.".to_string(),
        "The records are:".to_string(),
        records,
        format!(
            "Given the user prompt {quoted_prompt}, return only the id of the record that matches the context from the user:"
        ),
        "-------".to_string(),
        "Return just the id output, without extra context or explanation. Only the id, without anything else.".to_string(),
        "If you can't find a matching record, return an empty string.".to_string(),
    ]
    .join("\n ");

    vec![ChatMessage::system(instruction)]
}
