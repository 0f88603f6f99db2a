//! Consequence engine - maps player actions to world state mutations.

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use super::{ActionKind, PlayerAction};
use crate::world_state::{EventDetails, WorldState};

/// Loyalty lost by a threatened character.
pub const THREATEN_LOYALTY_DELTA: i32 = -10;

/// Suspicion gained by an intimidated character.
pub const INTIMIDATE_SUSPICION_DELTA: i32 = 15;

/// Flag set once the player walks out of a scene.
pub const PLAYER_LEFT_FLAG: &str = "player_left_scene";

/// A consequence handler. Handlers mutate the state in place and never fail.
pub type Handler = fn(&mut WorldState, &PlayerAction);

/// Dispatch table from action kind to handler.
///
/// Kinds without an entry, including every [`ActionKind::Unknown`], fall through to a handler
/// that logs the action under its own tag, so no action is ever dropped.
#[derive(Debug, Clone)]
pub struct ConsequenceEngine {
    handlers: HashMap<ActionKind, Handler>,
    fallback: Handler,
}

impl Default for ConsequenceEngine {
    fn default() -> Self {
        let mut handlers: HashMap<ActionKind, Handler> = HashMap::new();
        handlers.insert(ActionKind::Arrest, handle_arrest);
        handlers.insert(ActionKind::Threaten, handle_threaten);
        handlers.insert(ActionKind::Dismiss, handle_dismiss);
        handlers.insert(ActionKind::Speak, handle_speak);
        handlers.insert(ActionKind::Leave, handle_leave);
        handlers.insert(ActionKind::Intimidate, handle_intimidate);
        handlers.insert(ActionKind::Gesture, handle_gesture);
        handlers.insert(ActionKind::Action, handle_gesture);
        handlers.insert(ActionKind::Physical, handle_gesture);

        Self {
            handlers,
            fallback: handle_unknown,
        }
    }
}

impl ConsequenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the handler for a kind.
    pub fn register(&mut self, kind: ActionKind, handler: Handler) {
        self.handlers.insert(kind.canonical(), handler);
    }

    /// Apply the consequences of `action` to `state`.
    pub fn apply(&self, state: &mut WorldState, action: &PlayerAction) {
        let handler = self
            .handlers
            .get(&action.action_type.canonical())
            .copied()
            .unwrap_or(self.fallback);
        debug!(action = %action.action_type, target = %action.target, "applying consequences");
        handler(state, action);
    }
}

/// Apply consequences with the default handler table.
pub fn apply_consequences(state: &mut WorldState, action: &PlayerAction) {
    ConsequenceEngine::default().apply(state, action);
}

fn details<const N: usize>(entries: [(&str, Value); N]) -> EventDetails {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Target-bearing handlers do nothing at all when the target is unknown.
fn known_target<'a>(state: &WorldState, action: &'a PlayerAction) -> Option<&'a str> {
    let target = action.target.as_str();
    if state.contains(target) {
        Some(target)
    } else {
        debug!(action = %action.action_type, target, "target not present, no consequences");
        None
    }
}

fn handle_arrest(state: &mut WorldState, action: &PlayerAction) {
    if let Some(target) = known_target(state, action) {
        state.arrest(target);
    }
}

fn handle_threaten(state: &mut WorldState, action: &PlayerAction) {
    let Some(target) = known_target(state, action) else {
        return;
    };
    state.adjust_loyalty(target, THREATEN_LOYALTY_DELTA);
    state.set_flag(format!("{target}_threatened"), true);
    state.log_event(
        "threatened",
        details([("target", target.into()), ("speech", action.speech().into())]),
    );
}

fn handle_dismiss(state: &mut WorldState, action: &PlayerAction) {
    let Some(target) = known_target(state, action) else {
        return;
    };
    state.relocate(target, format!("{target}_quarters"));
    state.log_event("dismissed", details([("target", target.into())]));
}

fn handle_speak(state: &mut WorldState, action: &PlayerAction) {
    state.log_event(
        "conversation",
        details([
            ("target", action.target.as_str().into()),
            ("speech", action.speech().into()),
        ]),
    );
}

fn handle_leave(state: &mut WorldState, _action: &PlayerAction) {
    state.set_flag(PLAYER_LEFT_FLAG, true);
    state.log_event("player_left", EventDetails::new());
}

fn handle_intimidate(state: &mut WorldState, action: &PlayerAction) {
    let Some(target) = known_target(state, action) else {
        return;
    };
    state.adjust_suspicion(target, INTIMIDATE_SUSPICION_DELTA);
    state.log_event("intimidated", details([("target", target.into())]));
}

/// Shared by gesture, action and physical; the event carries the kind's own name.
fn handle_gesture(state: &mut WorldState, action: &PlayerAction) {
    state.log_event(
        action.action_type.as_str(),
        details([("description", action.description().into())]),
    );
}

fn handle_unknown(state: &mut WorldState, action: &PlayerAction) {
    state.log_event(
        action.action_type.as_str(),
        details([
            ("target", action.target.as_str().into()),
            ("details", Value::Object(action.details.clone())),
        ]),
    );
}
