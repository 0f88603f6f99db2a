//! Scenario and vignette catalogue files.
//!
//! Both are TOML. A scenario describes the court on its first day:
//!
//! ```toml
//! day = 1
//!
//! [flags]
//! baron_executed = true
//!
//! [stats]
//! stability = 45
//!
//! [[characters]]
//! id = "duke_valerius"
//! name = "Duke Valerius"
//! status = "free"
//! loyalty = 35
//! location = "duke_quarters"
//! knows = ["secret_king_illegitimate"]
//! personality = "schemer"
//! ```
//!
//! A catalogue lists vignettes:
//!
//! ```toml
//! [[vignettes]]
//! id = "peasant_riots"
//! trigger = "stability < 20"
//! priority = 80
//! cooldown = 5
//! invalidated_by = ["player_dead"]
//! ```

use crown_rules::{Character, Personality, WorldState};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::error::ConfigError;
use crate::vignettes::{Trigger, Vignette, VignetteOrchestrator};

fn default_day() -> u32 {
    1
}

/// A character as written in a scenario file.
///
/// Status and personality stay strings until [`CharacterDef::build`] so an invalid value is
/// reported with the character it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterDef {
    pub id: String,
    pub name: String,
    pub status: String,
    pub loyalty: i32,
    pub location: String,
    #[serde(default)]
    pub suspicion_of_player: i32,
    #[serde(default)]
    pub knows: Vec<String>,
    #[serde(default)]
    pub agenda: String,
    #[serde(default)]
    pub personality: Option<String>,
}

impl CharacterDef {
    /// Validate and build the character.
    pub fn build(&self) -> Result<Character, ConfigError> {
        let personality = match &self.personality {
            Some(name) => name.parse::<Personality>()?,
            None => Personality::default(),
        };
        let character = Character::parse(
            self.id.as_str(),
            self.name.as_str(),
            &self.status,
            self.loyalty,
            self.location.as_str(),
        )?
        .with_suspicion(self.suspicion_of_player)
        .with_knows(self.knows.iter().cloned())
        .with_agenda(self.agenda.as_str())
        .with_personality(personality);
        Ok(character)
    }
}

/// The court on its first day.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_day")]
    pub day: u32,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub stats: BTreeMap<String, i32>,
    #[serde(default)]
    pub characters: Vec<CharacterDef>,
}

impl ScenarioConfig {
    /// Build a fresh world state. Fails on the first invalid character.
    pub fn build_world(&self) -> Result<WorldState, ConfigError> {
        let mut world = WorldState::new(self.day);
        for def in &self.characters {
            world.add_character(def.build()?);
        }
        for (name, value) in &self.flags {
            world.set_flag(name.as_str(), *value);
        }
        for (name, value) in &self.stats {
            world.set_stat(name.as_str(), *value);
        }
        Ok(world)
    }
}

/// A list of vignettes in declaration order.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct VignetteCatalog {
    #[serde(default)]
    pub vignettes: Vec<Vignette>,
}

impl VignetteCatalog {
    /// Ids of vignettes whose trigger failed to parse; they load but never fire.
    pub fn malformed(&self) -> Vec<&str> {
        self.vignettes
            .iter()
            .filter(|v| matches!(v.trigger_condition, Trigger::Malformed { .. }))
            .map(|v| v.id.as_str())
            .collect()
    }

    pub fn into_orchestrator(self) -> VignetteOrchestrator {
        VignetteOrchestrator::new(self.vignettes)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_scenario_from_str(text: &str) -> Result<ScenarioConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

pub fn load_scenario_from_path(path: impl AsRef<Path>) -> Result<ScenarioConfig, ConfigError> {
    let path = path.as_ref();
    let scenario = load_scenario_from_str(&read(path)?)?;
    info!(path = %path.display(), characters = scenario.characters.len(), "scenario loaded");
    Ok(scenario)
}

pub fn load_vignettes_from_str(text: &str) -> Result<VignetteCatalog, ConfigError> {
    Ok(toml::from_str(text)?)
}

pub fn load_vignettes_from_path(path: impl AsRef<Path>) -> Result<VignetteCatalog, ConfigError> {
    let path = path.as_ref();
    let catalog = load_vignettes_from_str(&read(path)?)?;
    info!(
        path = %path.display(),
        vignettes = catalog.vignettes.len(),
        malformed = catalog.malformed().len(),
        "vignette catalogue loaded"
    );
    Ok(catalog)
}
