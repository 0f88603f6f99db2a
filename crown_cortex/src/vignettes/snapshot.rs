//! The read-only view of the realm the orchestrator evaluates against.

use crown_rules::{Status, WorldState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Vignette;

/// Stats, flags and cooldowns at one evaluation tick.
///
/// Selection never mutates a snapshot. The caller advances it with [`Snapshot::tick`] and
/// records firings with [`Snapshot::record_fired`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    pub turn: u32,
    #[serde(default)]
    pub stats: BTreeMap<String, i32>,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    /// Vignette id -> turns remaining.
    #[serde(default)]
    pub cooldowns: BTreeMap<String, u32>,
    /// Vignettes awaiting presentation. Selection returns a single winner and leaves this alone.
    #[serde(default)]
    pub pending_queue: Vec<String>,
}

impl Snapshot {
    pub fn new(turn: u32) -> Self {
        Self {
            turn,
            ..Default::default()
        }
    }

    /// Derive stats and flags from the world.
    ///
    /// Besides the world's own stats and flags, every character contributes the stats
    /// `{id}_loyalty` and `{id}_suspicion` and the flags `{id}_free`, `{id}_imprisoned`,
    /// `{id}_dead` and `{id}_alive`. Derived values overwrite world entries of the same name.
    pub fn from_world(world: &WorldState) -> Self {
        let mut stats = world.stats().clone();
        let mut flags = world.flags().clone();

        for character in world.npcs() {
            let id = &character.id;
            stats.insert(id.flag("loyalty"), character.loyalty.value());
            stats.insert(id.flag("suspicion"), character.suspicion_of_player.value());

            flags.insert(id.flag("free"), character.status == Status::Free);
            flags.insert(id.flag("imprisoned"), character.status == Status::Imprisoned);
            flags.insert(id.flag("dead"), character.status == Status::Dead);
            flags.insert(id.flag("alive"), character.is_alive());
        }

        Self {
            turn: 0,
            stats,
            flags,
            cooldowns: BTreeMap::new(),
            pending_queue: Vec::new(),
        }
    }

    /// Replace stats and flags from the world, keeping turn, cooldowns and queue.
    pub fn refresh(&mut self, world: &WorldState) {
        let derived = Self::from_world(world);
        self.stats = derived.stats;
        self.flags = derived.flags;
    }

    pub fn with_stat(mut self, name: impl Into<String>, value: i32) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    pub fn with_cooldown(mut self, vignette_id: impl Into<String>, turns: u32) -> Self {
        self.cooldowns.insert(vignette_id.into(), turns);
        self
    }

    /// Absent flags are false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn cooldown_remaining(&self, vignette_id: &str) -> u32 {
        self.cooldowns.get(vignette_id).copied().unwrap_or(0)
    }

    /// Advance one turn: every cooldown drops by one and expired entries are removed.
    pub fn tick(&mut self) {
        self.turn += 1;
        self.cooldowns.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });
    }

    /// Start a fired vignette's cooldown.
    pub fn record_fired(&mut self, vignette: &Vignette) {
        if vignette.cooldown > 0 {
            self.cooldowns.insert(vignette.id.clone(), vignette.cooldown);
        } else {
            self.cooldowns.remove(&vignette.id);
        }
    }
}
