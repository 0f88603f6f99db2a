//! Character definitions.

use serde::{Deserialize, Serialize};

use super::{CharacterId, Knowledge, Meter, Personality, Status};
use crate::error::Result;

/// A non-player character at court.
///
/// Fields are readable by anyone; mutation after construction goes through
/// [`WorldState`](crate::WorldState) so the clamping and logging rules apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub status: Status,
    pub loyalty: Meter,
    pub location: String,

    #[serde(default)]
    pub suspicion_of_player: Meter,
    /// Fact ids this character knows.
    #[serde(default)]
    pub knows: Knowledge,
    /// Hidden agenda, descriptive only.
    #[serde(default)]
    pub agenda: String,
    #[serde(default)]
    pub personality: Personality,
}

impl Character {
    /// Create a new character. `loyalty` is clamped into `0..=100`.
    pub fn new(
        id: impl Into<CharacterId>,
        name: impl Into<String>,
        status: Status,
        loyalty: i32,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            loyalty: Meter::new(loyalty),
            location: location.into(),
            suspicion_of_player: Meter::default(),
            knows: Knowledge::new(),
            agenda: String::new(),
            personality: Personality::default(),
        }
    }

    /// Create a character from an untyped status name, rejecting unknown statuses.
    pub fn parse(
        id: impl Into<CharacterId>,
        name: impl Into<String>,
        status: &str,
        loyalty: i32,
        location: impl Into<String>,
    ) -> Result<Self> {
        let status = status.parse::<Status>()?;
        Ok(Self::new(id, name, status, loyalty, location))
    }

    /// Set the starting suspicion (clamped).
    pub fn with_suspicion(mut self, suspicion: i32) -> Self {
        self.suspicion_of_player = Meter::new(suspicion);
        self
    }

    /// Add facts this character knows.
    pub fn with_knows<S: Into<String>>(mut self, facts: impl IntoIterator<Item = S>) -> Self {
        for fact in facts {
            self.knows.learn(fact);
        }
        self
    }

    pub fn with_agenda(mut self, agenda: impl Into<String>) -> Self {
        self.agenda = agenda.into();
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    /// Check if the character can still be summoned to a scene.
    pub fn is_free(&self) -> bool {
        self.status == Status::Free
    }

    pub fn is_alive(&self) -> bool {
        self.status != Status::Dead
    }
}
