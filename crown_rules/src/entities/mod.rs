//! Entity definitions for the court.

mod character;
mod components;

pub use character::*;
pub use components::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::RulesError;

/// Identifier of a character, e.g. `duke_valerius`.
///
/// Ids are opaque strings chosen by the scenario author; they also prefix the flags the
/// consequence engine sets (`{id}_arrested`, `{id}_threatened`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of a flag scoped to this character, e.g. `duke_arrested`.
    pub fn flag(&self, suffix: &str) -> String {
        format!("{}_{}", self.0, suffix)
    }
}

impl From<&str> for CharacterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CharacterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of one play session's world state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil session ID (useful for fixtures).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a character stands with the crown.
///
/// Transitions only move away from `Free`; nothing in this crate releases a prisoner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Free,
    Imprisoned,
    Dead,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Free => "free",
            Status::Imprisoned => "imprisoned",
            Status::Dead => "dead",
        }
    }
}

impl FromStr for Status {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Status::Free),
            "imprisoned" => Ok(Status::Imprisoned),
            "dead" => Ok(Status::Dead),
            other => Err(RulesError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision-making framework the narrative layer voices a character with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Risk-averse, weighs every angle.
    #[default]
    Calculator,
    /// Honour above survival.
    Loyalist,
    /// Survival above everything.
    Coward,
    /// Plays for dominance.
    Schemer,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Calculator => "calculator",
            Personality::Loyalist => "loyalist",
            Personality::Coward => "coward",
            Personality::Schemer => "schemer",
        }
    }
}

impl FromStr for Personality {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calculator" => Ok(Personality::Calculator),
            "loyalist" => Ok(Personality::Loyalist),
            "coward" => Ok(Personality::Coward),
            "schemer" => Ok(Personality::Schemer),
            other => Err(RulesError::InvalidPersonality(other.to_string())),
        }
    }
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("free".parse::<Status>().unwrap(), Status::Free);
        assert_eq!("imprisoned".parse::<Status>().unwrap(), Status::Imprisoned);
        assert_eq!("dead".parse::<Status>().unwrap(), Status::Dead);
        assert!(matches!(
            "invalid_status".parse::<Status>(),
            Err(RulesError::InvalidStatus(s)) if s == "invalid_status"
        ));
    }

    #[test]
    fn test_personality_parse() {
        assert_eq!("schemer".parse::<Personality>().unwrap(), Personality::Schemer);
        assert!("Coward".parse::<Personality>().is_err());
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(serde_json::to_string(&Status::Imprisoned).unwrap(), "\"imprisoned\"");
        assert!(serde_json::from_str::<Status>("\"exiled\"").is_err());
    }

    #[test]
    fn test_character_id_flag() {
        let id = CharacterId::new("duke_valerius");
        assert_eq!(id.flag("arrested"), "duke_valerius_arrested");
        assert_eq!(id.to_string(), "duke_valerius");
    }
}
