//! Scene casting - who is present when a scene opens.

use crown_rules::{Character, WorldState};

/// The characters present in a scene, required ones first.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCast {
    pub location: String,
    pub members: Vec<Character>,
}

impl SceneCast {
    /// Gather a cast for `location`.
    ///
    /// Every required character must exist and be free, otherwise no scene can be built.
    /// Other characters already at the location join, in id order, until `max_cast` is reached.
    pub fn assemble(
        state: &WorldState,
        location: &str,
        required: &[&str],
        max_cast: usize,
    ) -> Option<Self> {
        let mut members: Vec<Character> = Vec::new();

        for id in required {
            let character = state.get_character(id)?;
            if !character.is_free() {
                return None;
            }
            if !members.iter().any(|m| m.id == character.id) {
                members.push(character.clone());
            }
        }

        for character in state.characters_at(location) {
            if members.len() >= max_cast {
                break;
            }
            if !members.iter().any(|m| m.id == character.id) {
                members.push(character.clone());
            }
        }

        Some(Self {
            location: location.to_string(),
            members,
        })
    }

    /// The character a scene centres on.
    pub fn primary(&self) -> Option<&Character> {
        self.members.first()
    }

    pub fn ids(&self) -> Vec<String> {
        self.members.iter().map(|c| c.id.to_string()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|c| c.id.as_str() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Character> {
        self.members.iter().find(|c| c.id.as_str() == id)
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|c| c.name.as_str()).collect()
    }
}
