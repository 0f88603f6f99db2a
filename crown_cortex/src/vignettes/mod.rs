//! Vignettes - scripted events that fire when the realm reaches a certain shape.
//!
//! A vignette is eligible when:
//! - **Trigger**: its stat comparison holds
//! - **Preconditions**: every listed flag is set
//! - **Invalidation**: none of its invalidating flags is set
//! - **Cooldown**: it has no turns of cooldown left
//!
//! The orchestrator then picks the eligible vignette with the highest priority.

mod condition;
mod orchestrator;
mod snapshot;

pub use condition::*;
pub use orchestrator::*;
pub use snapshot::*;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::warn;

/// A vignette's trigger as authored.
///
/// Conditions that fail to parse are kept as `Malformed` and never fire, so one broken
/// definition cannot stop the rest of a catalogue from loading or being evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Condition(TriggerCondition),
    Malformed { source: String },
}

impl Trigger {
    /// Parse authored text, keeping malformed text instead of failing.
    pub fn parse_lenient(source: &str) -> Self {
        match source.parse::<TriggerCondition>() {
            Ok(condition) => Trigger::Condition(condition),
            Err(err) => {
                warn!(source, error = %err, "malformed trigger condition will never fire");
                Trigger::Malformed {
                    source: source.to_string(),
                }
            }
        }
    }

    pub fn evaluate(&self, stats: &BTreeMap<String, i32>) -> bool {
        match self {
            Trigger::Condition(condition) => condition.evaluate(stats),
            Trigger::Malformed { .. } => false,
        }
    }
}

impl From<TriggerCondition> for Trigger {
    fn from(condition: TriggerCondition) -> Self {
        Trigger::Condition(condition)
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Condition(condition) => write!(f, "{condition}"),
            Trigger::Malformed { source } => f.write_str(source),
        }
    }
}

impl Serialize for Trigger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Trigger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Ok(Trigger::parse_lenient(&source))
    }
}

/// A candidate scripted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vignette {
    pub id: String,
    #[serde(rename = "trigger")]
    pub trigger_condition: Trigger,
    /// Higher fires first.
    pub priority: i32,
    /// Turns before the vignette may fire again.
    #[serde(default)]
    pub cooldown: u32,
    /// Flags that must all be true.
    #[serde(default)]
    pub preconditions: Vec<String>,
    /// Flags that, if any is true, keep the vignette from firing.
    #[serde(default)]
    pub invalidated_by: Vec<String>,
}

impl Vignette {
    pub fn new(id: impl Into<String>, trigger: impl Into<Trigger>, priority: i32) -> Self {
        Self {
            id: id.into(),
            trigger_condition: trigger.into(),
            priority,
            cooldown: 0,
            preconditions: Vec::new(),
            invalidated_by: Vec::new(),
        }
    }

    /// Build from authored condition text; malformed text yields a vignette that never fires.
    pub fn authored(id: impl Into<String>, condition: &str, priority: i32) -> Self {
        Self::new(id, Trigger::parse_lenient(condition), priority)
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_preconditions<S: Into<String>>(mut self, flags: impl IntoIterator<Item = S>) -> Self {
        self.preconditions.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn with_invalidated_by<S: Into<String>>(mut self, flags: impl IntoIterator<Item = S>) -> Self {
        self.invalidated_by.extend(flags.into_iter().map(Into::into));
        self
    }
}
