//! World state management - the central structure holding all game data.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::entities::{Character, CharacterId, SessionId, Status};
use crate::error::Result;

/// Where arrested characters are taken.
pub const DUNGEON: &str = "dungeon";

/// Open key-value payload attached to an event.
pub type EventDetails = Map<String, Value>;

/// A logged event in the court's history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub day: u32,
    pub event_type: String,
    #[serde(default)]
    pub details: EventDetails,
}

impl Event {
    pub fn new(day: u32, event_type: impl Into<String>, details: EventDetails) -> Self {
        Self {
            day,
            event_type: event_type.into(),
            details,
        }
    }

    /// Read a string detail, if present.
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }
}

/// The complete state of the court at any point in time.
///
/// All mutation goes through the methods below. Operations naming an unknown character are
/// silent no-ops so that a stale or malformed action cannot crash a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    #[serde(default)]
    session_id: SessionId,

    /// Current day of the reign, starting at 1.
    #[serde(deserialize_with = "day_from_one")]
    day: u32,

    /// All characters keyed by id.
    #[serde(default)]
    npcs: BTreeMap<CharacterId, Character>,

    /// Append-only event log.
    #[serde(default)]
    events: Vec<Event>,

    /// Boolean flags; absent means false.
    #[serde(default)]
    flags: BTreeMap<String, bool>,

    /// Named realm counters (stability, treasury, ...).
    #[serde(default)]
    stats: BTreeMap<String, i32>,
}

fn day_from_one<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let day = u32::deserialize(deserializer)?;
    if day == 0 {
        return Err(de::Error::invalid_value(de::Unexpected::Unsigned(0), &"a day of at least 1"));
    }
    Ok(day)
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl WorldState {
    /// Create an empty world state starting on `day` (at least 1).
    pub fn new(day: u32) -> Self {
        Self {
            session_id: SessionId::new(),
            day: day.max(1),
            npcs: BTreeMap::new(),
            events: Vec::new(),
            flags: BTreeMap::new(),
            stats: BTreeMap::new(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Add a character, replacing any previous character with the same id.
    pub fn add_character(&mut self, character: Character) -> Option<Character> {
        self.npcs.insert(character.id.clone(), character)
    }

    /// Get character by ID.
    pub fn get_character(&self, id: &str) -> Option<&Character> {
        self.npcs.get(&CharacterId::from(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_character(id).is_some()
    }

    /// All characters in ascending id order.
    pub fn npcs(&self) -> impl Iterator<Item = &Character> {
        self.npcs.values()
    }

    pub fn npc_count(&self) -> usize {
        self.npcs.len()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    /// Read a flag; absent flags are false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn stats(&self) -> &BTreeMap<String, i32> {
        &self.stats
    }

    pub fn stat(&self, name: &str) -> Option<i32> {
        self.stats.get(name).copied()
    }

    /// Mutable access is kept private so every write goes through a clamping mutator.
    fn character_mut(&mut self, id: &str) -> Option<&mut Character> {
        let character = self.npcs.get_mut(&CharacterId::from(id));
        if character.is_none() {
            debug!(target_id = id, "ignoring mutation of unknown character");
        }
        character
    }

    /// Arrest a character: imprison, move to the dungeon, set `{id}_arrested`, log "arrest".
    ///
    /// Arresting an already imprisoned character repeats the writes and logs a second event.
    pub fn arrest(&mut self, id: &str) {
        let Some(character) = self.character_mut(id) else {
            return;
        };
        character.status = Status::Imprisoned;
        character.location = DUNGEON.to_string();
        let flag = character.id.flag("arrested");

        self.set_flag(flag, true);
        let mut details = EventDetails::new();
        details.insert("target".into(), Value::from(id));
        self.log_event("arrest", details);
    }

    /// Shift a character's loyalty by `delta`, clamped to `0..=100`. Logs nothing.
    pub fn adjust_loyalty(&mut self, id: &str, delta: i32) {
        if let Some(character) = self.character_mut(id) {
            character.loyalty = character.loyalty.adjusted(delta);
        }
    }

    /// Shift a character's suspicion of the player by `delta`, clamped to `0..=100`.
    pub fn adjust_suspicion(&mut self, id: &str, delta: i32) {
        if let Some(character) = self.character_mut(id) {
            character.suspicion_of_player = character.suspicion_of_player.adjusted(delta);
        }
    }

    /// Move a character somewhere else.
    pub fn relocate(&mut self, id: &str, location: impl Into<String>) {
        if let Some(character) = self.character_mut(id) {
            character.location = location.into();
        }
    }

    /// Teach a character a fact. Already-known facts are not duplicated.
    pub fn learn(&mut self, id: &str, fact: impl Into<String>) {
        if let Some(character) = self.character_mut(id) {
            character.knows.learn(fact);
        }
    }

    /// Append an event stamped with the current day.
    pub fn log_event(&mut self, event_type: impl Into<String>, details: EventDetails) {
        let event = Event::new(self.day, event_type, details);
        debug!(day = event.day, event_type = %event.event_type, "event logged");
        self.events.push(event);
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    pub fn set_stat(&mut self, name: impl Into<String>, value: i32) {
        self.stats.insert(name.into(), value);
    }

    /// Shift a realm counter, treating an absent counter as 0.
    pub fn adjust_stat(&mut self, name: impl Into<String>, delta: i32) {
        let value = self.stats.entry(name.into()).or_insert(0);
        *value = value.saturating_add(delta);
    }

    /// Move to the next day.
    pub fn advance_day(&mut self) {
        self.day += 1;
    }

    /// Characters at an exact location, in ascending id order.
    pub fn characters_at<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a Character> + 'a {
        self.npcs.values().filter(move |c| c.location == location)
    }

    /// Events logged on `day` or later, in log order.
    pub fn events_since(&self, day: u32) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.day >= day)
    }

    /// Serialize to a JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore from a JSON document produced by [`WorldState::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
