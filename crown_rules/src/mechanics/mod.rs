//! Game mechanics: player actions and the consequences they have on the world.

mod consequences;

pub use consequences::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kinds of action the player can take.
///
/// The classifier is expected to produce one of the named kinds, but any other tag is kept
/// verbatim in [`ActionKind::Unknown`] so it can still be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Normal conversation.
    Speak,
    Threaten,
    /// Order the guards to take someone.
    Arrest,
    /// Send a character away from the scene.
    Dismiss,
    /// The player leaves the scene.
    Leave,
    Intimidate,
    Gesture,
    Action,
    Physical,
    /// Any other tag, verbatim. Build it through [`ActionKind::parse`]; an `Unknown` that
    /// holds a known tag name is treated as that known kind when applied.
    Unknown(String),
}

impl ActionKind {
    /// Parse a classifier tag. Compound tags such as `"gesture/action/physical"` keep only
    /// the first segment. Matching is exact: `"Arrest"` or `" leave "` are unknown tags and
    /// keep their text as written. Never fails.
    pub fn parse(tag: &str) -> Self {
        let head = tag.split('/').next().unwrap_or_default();
        match head {
            "speak" => ActionKind::Speak,
            "threaten" => ActionKind::Threaten,
            "arrest" => ActionKind::Arrest,
            "dismiss" => ActionKind::Dismiss,
            "leave" => ActionKind::Leave,
            "intimidate" => ActionKind::Intimidate,
            "gesture" => ActionKind::Gesture,
            "action" => ActionKind::Action,
            "physical" => ActionKind::Physical,
            _ => ActionKind::Unknown(head.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Speak => "speak",
            ActionKind::Threaten => "threaten",
            ActionKind::Arrest => "arrest",
            ActionKind::Dismiss => "dismiss",
            ActionKind::Leave => "leave",
            ActionKind::Intimidate => "intimidate",
            ActionKind::Gesture => "gesture",
            ActionKind::Action => "action",
            ActionKind::Physical => "physical",
            ActionKind::Unknown(tag) => tag,
        }
    }

    /// The same kind with any `Unknown` that spells a known tag resolved to that kind.
    pub fn canonical(&self) -> Self {
        match self {
            ActionKind::Unknown(tag) => ActionKind::parse(tag),
            known => known.clone(),
        }
    }

    /// Whether the scene closes once this action has been applied.
    pub fn ends_scene(&self) -> bool {
        matches!(self.as_str(), "leave" | "arrest" | "dismiss")
    }
}

impl From<&str> for ActionKind {
    fn from(tag: &str) -> Self {
        ActionKind::parse(tag)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ActionKind::parse(&tag))
    }
}

/// A structured player action, as produced by the action classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAction {
    pub action_type: ActionKind,
    /// Target character id; empty when the action targets no one.
    #[serde(default)]
    pub target: String,
    /// Conventionally carries `speech` and/or `description`.
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl PlayerAction {
    pub fn new(action_type: ActionKind, target: impl Into<String>) -> Self {
        Self {
            action_type,
            target: target.into(),
            details: Map::new(),
        }
    }

    /// Attach a detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// A string detail, or "" when absent or not a string.
    pub fn detail_str(&self, key: &str) -> &str {
        self.details.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn speech(&self) -> &str {
        self.detail_str("speech")
    }

    pub fn description(&self) -> &str {
        self.detail_str("description")
    }
}
