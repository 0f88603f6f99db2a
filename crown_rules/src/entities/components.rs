//! Component definitions for characters.

use serde::{Deserialize, Serialize};

/// A disposition score bounded to `0..=100`.
///
/// Every way of producing a `Meter` clamps, including deserialization, so a loyalty or
/// suspicion value outside the range cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(from = "i32", into = "i32")]
pub struct Meter(u8);

impl Meter {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 100;

    /// Build a meter, clamping `value` into range.
    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX) as u8)
    }

    pub fn value(&self) -> i32 {
        self.0 as i32
    }

    /// Shift by `delta`, clamping the result.
    pub fn adjusted(self, delta: i32) -> Self {
        Self::new(self.value().saturating_add(delta))
    }
}

impl From<i32> for Meter {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<Meter> for i32 {
    fn from(meter: Meter) -> Self {
        meter.value()
    }
}

impl std::fmt::Display for Meter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a character knows, as ordered fact identifiers without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Knowledge(Vec<String>);

impl Knowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fact. Returns false if it was already known.
    pub fn learn(&mut self, fact: impl Into<String>) -> bool {
        let fact = fact.into();
        if self.knows(&fact) {
            return false;
        }
        self.0.push(fact);
        true
    }

    pub fn knows(&self, fact: &str) -> bool {
        self.0.iter().any(|f| f == fact)
    }

    pub fn facts(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for Knowledge {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut knowledge = Knowledge::new();
        for fact in iter {
            knowledge.learn(fact);
        }
        knowledge
    }
}
