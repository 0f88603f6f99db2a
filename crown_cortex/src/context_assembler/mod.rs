//! Context Assembler - Builds the per-character context the narrative layer prompts with.
//!
//! Assembly works as follows:
//! 1. **Casting**: Required characters plus whoever is already at the location
//! 2. **History**: Events from the recent window, rendered as one line each
//! 3. **Flags**: Whether the player has threatened or arrested the character
//! 4. **Packing**: One packet per cast member, renderable as a prompt section

mod cast;

pub use cast::*;

use crown_rules::{Character, CharacterId, Personality, Status, WorldState};
use serde::{Deserialize, Serialize};

/// Configuration for context assembly.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// How many days back recent events reach.
    pub recent_event_window: u32,

    /// Maximum number of characters in one scene.
    pub max_cast: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            recent_event_window: 3,
            max_cast: 3,
        }
    }
}

/// The context assembler builds scenes and context packets from the world state.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    config: ContextConfig,
}

impl ContextAssembler {
    /// Create a new context assembler with the given configuration.
    pub fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    /// Create a context assembler with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ContextConfig::default())
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Cast a scene at `location`; see [`SceneCast::assemble`].
    pub fn cast(&self, state: &WorldState, location: &str, required: &[&str]) -> Option<SceneCast> {
        SceneCast::assemble(state, location, required, self.config.max_cast)
    }

    /// First day included in the recent-events window, never before day 1.
    pub fn window_start(&self, state: &WorldState) -> u32 {
        state.day().saturating_sub(self.config.recent_event_window).max(1)
    }

    /// Build the context packet for one character.
    pub fn build_packet(&self, character: &Character, state: &WorldState) -> ContextPacket {
        let recent_events = state
            .events_since(self.window_start(state))
            .map(|e| {
                format!(
                    "Day {}: {} - {}",
                    e.day,
                    e.event_type,
                    serde_json::Value::Object(e.details.clone())
                )
            })
            .collect();

        ContextPacket {
            npc_id: character.id.clone(),
            name: character.name.clone(),
            status: character.status,
            loyalty: character.loyalty.value(),
            location: character.location.clone(),
            knows: character.knows.facts().to_vec(),
            agenda: character.agenda.clone(),
            suspicion_of_player: character.suspicion_of_player.value(),
            personality: character.personality,
            recent_events,
            flags: PacketFlags {
                was_threatened: state.flag(&character.id.flag("threatened")),
                was_arrested: state.flag(&character.id.flag("arrested")),
            },
        }
    }

    /// Build packets for every member of a cast, in cast order.
    pub fn build_packets(&self, cast: &SceneCast, state: &WorldState) -> Vec<ContextPacket> {
        cast.members
            .iter()
            .map(|c| self.build_packet(c, state))
            .collect()
    }
}

/// What the player has done to a character so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PacketFlags {
    pub was_threatened: bool,
    pub was_arrested: bool,
}

/// Everything the narrative layer may tell the model about one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPacket {
    pub npc_id: CharacterId,
    pub name: String,
    pub status: Status,
    pub loyalty: i32,
    pub location: String,
    pub knows: Vec<String>,
    pub agenda: String,
    pub suspicion_of_player: i32,
    pub personality: Personality,
    pub recent_events: Vec<String>,
    pub flags: PacketFlags,
}

impl ContextPacket {
    /// Format the packet as a prompt section.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!("## {} ({})\n", self.name, self.npc_id));
        prompt.push_str(&format!(
            "Status: {}, Location: {}, Personality: {}\n",
            self.status, self.location, self.personality
        ));
        prompt.push_str(&format!(
            "Loyalty: {}/100, Suspicion of the King: {}/100\n",
            self.loyalty, self.suspicion_of_player
        ));
        if !self.agenda.is_empty() {
            prompt.push_str(&format!("Agenda: {}\n", self.agenda));
        }
        prompt.push('\n');

        prompt.push_str("### What you know\n");
        if self.knows.is_empty() {
            prompt.push_str("- Nothing secret\n");
        } else {
            for fact in &self.knows {
                prompt.push_str(&format!("- {}\n", fact));
            }
        }
        prompt.push('\n');

        let wavering = self.loyalty < 30;
        let wary = self.suspicion_of_player > 50;
        if self.flags.was_threatened || self.flags.was_arrested || wavering || wary {
            prompt.push_str("### Your situation\n");
            if self.flags.was_threatened {
                prompt.push_str("- The King has threatened you.\n");
            }
            if self.flags.was_arrested {
                prompt.push_str("- The King has had you arrested.\n");
            }
            if wavering {
                prompt.push_str("- Your loyalty to the crown is wavering.\n");
            }
            if wary {
                prompt.push_str("- You suspect the King knows more than he says.\n");
            }
            prompt.push('\n');
        }

        if !self.recent_events.is_empty() {
            prompt.push_str("### Recent events\n");
            for event in &self.recent_events {
                prompt.push_str(&format!("- {}\n", event));
            }
            prompt.push('\n');
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crown_rules::{apply_consequences, ActionKind, EventDetails, PlayerAction};

    fn court() -> WorldState {
        let mut state = WorldState::new(1);
        state.add_character(
            Character::new("duke_valerius", "Duke Valerius", Status::Free, 35, "duke_quarters")
                .with_knows(["secret_king_illegitimate", "baron_was_ally"])
                .with_agenda("protect conspiracy, appear loyal")
                .with_suspicion(20),
        );
        state.add_character(
            Character::new("bishop_erasmus", "Bishop Erasmus", Status::Free, 55, "chapel")
                .with_personality(Personality::Loyalist),
        );
        state
    }

    #[test]
    fn test_window_start_never_before_day_one() {
        let assembler = ContextAssembler::with_defaults();
        let mut state = court();
        assert_eq!(assembler.window_start(&state), 1);

        for _ in 0..6 {
            state.advance_day();
        }
        assert_eq!(assembler.window_start(&state), 4);
    }

    #[test]
    fn test_build_packet() {
        let assembler = ContextAssembler::with_defaults();
        let mut state = court();
        let threat = PlayerAction::new(ActionKind::Threaten, "duke_valerius").with_detail("speech", "Confess!");
        apply_consequences(&mut state, &threat);

        let duke = state.get_character("duke_valerius").unwrap();
        let packet = assembler.build_packet(duke, &state);

        assert_eq!(packet.npc_id.as_str(), "duke_valerius");
        assert_eq!(packet.loyalty, 25);
        assert_eq!(packet.knows.len(), 2);
        assert!(packet.flags.was_threatened);
        assert!(!packet.flags.was_arrested);
        assert_eq!(packet.recent_events.len(), 1);
        assert!(packet.recent_events[0].starts_with("Day 1: threatened - "));
        assert!(packet.recent_events[0].contains("Confess!"));
    }

    #[test]
    fn test_recent_events_window() {
        let assembler = ContextAssembler::new(ContextConfig {
            recent_event_window: 1,
            max_cast: 3,
        });
        let mut state = court();
        state.log_event("coronation", EventDetails::new());
        state.advance_day();
        state.advance_day();
        state.log_event("feast", EventDetails::new());
        state.advance_day();
        state.log_event("hunt", EventDetails::new());

        let bishop = state.get_character("bishop_erasmus").unwrap();
        let packet = assembler.build_packet(bishop, &state);

        assert_eq!(packet.recent_events.len(), 2);
        assert!(packet.recent_events[0].contains("feast"));
    }

    #[test]
    fn test_build_packets_follow_cast_order() {
        let assembler = ContextAssembler::with_defaults();
        let state = court();
        let cast = assembler.cast(&state, "chapel", &["duke_valerius"]).unwrap();
        let packets = assembler.build_packets(&cast, &state);

        let ids: Vec<_> = packets.iter().map(|p| p.npc_id.as_str()).collect();
        assert_eq!(ids, vec!["duke_valerius", "bishop_erasmus"]);
    }

    #[test]
    fn test_context_to_prompt() {
        let assembler = ContextAssembler::with_defaults();
        let mut state = court();
        state.adjust_loyalty("duke_valerius", -10);
        state.set_flag("duke_valerius_threatened", true);

        let duke = state.get_character("duke_valerius").unwrap();
        let prompt = assembler.build_packet(duke, &state).to_prompt_string();

        assert!(prompt.contains("## Duke Valerius (duke_valerius)"));
        assert!(prompt.contains("Loyalty: 25/100"));
        assert!(prompt.contains("- secret_king_illegitimate"));
        assert!(prompt.contains("The King has threatened you."));
        assert!(prompt.contains("loyalty to the crown is wavering"));
        assert!(!prompt.contains("Recent events"));
    }

    #[test]
    fn test_prompt_without_secrets() {
        let assembler = ContextAssembler::with_defaults();
        let state = court();
        let bishop = state.get_character("bishop_erasmus").unwrap();
        let prompt = assembler.build_packet(bishop, &state).to_prompt_string();

        assert!(prompt.contains("- Nothing secret"));
        assert!(prompt.contains("Personality: loyalist"));
        assert!(!prompt.contains("Your situation"));
    }
}
