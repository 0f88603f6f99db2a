//! Intake - turning the classifier's raw output into a structured action.
//!
//! The classifier itself is a language-model call owned by the host. Whatever text it
//! returns, intake always yields an action.

use crown_rules::{ActionKind, PlayerAction};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Seam for the free-text action classifier.
///
/// Implementations send the player's words and the ids of the characters present to a
/// model and return its raw reply, which [`parse_classifier_output`] then interprets.
pub trait ActionClassifier {
    fn classify(&mut self, input: &str, present: &[String]) -> String;
}

#[derive(Debug, Deserialize)]
struct RawAction {
    #[serde(default = "default_action_type")]
    action_type: String,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    details: Option<Map<String, Value>>,
}

fn default_action_type() -> String {
    "speak".to_string()
}

/// Remove a surrounding markdown code fence (with or without a language tag).
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = match trimmed.split_once('\n') {
        Some((_, rest)) => rest,
        None => trimmed.trim_start_matches('`'),
    };
    let body = match body.rfind("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

/// Interpret a classifier reply.
///
/// Missing fields default to `speak`, no target and no details. Compound tags keep their
/// first segment. If the reply is not a JSON object at all, the input is treated as speech
/// to the first present character.
pub fn parse_classifier_output(raw: &str, input: &str, present: &[String]) -> PlayerAction {
    let body = strip_code_fence(raw);

    match serde_json::from_str::<RawAction>(body) {
        Ok(parsed) => PlayerAction {
            action_type: ActionKind::parse(&parsed.action_type),
            target: parsed.target.unwrap_or_default(),
            details: parsed.details.unwrap_or_default(),
        },
        Err(err) => {
            warn!(error = %err, "classifier reply was not an action, treating input as speech");
            PlayerAction::new(
                ActionKind::Speak,
                present.first().cloned().unwrap_or_default(),
            )
            .with_detail("speech", input)
        }
    }
}
