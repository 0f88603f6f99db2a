//! Session - one player's deterministic turn loop.
//!
//! A session owns exactly one world state. Model-backed collaborators (the action classifier
//! and the narrative backend) are handed in by the host; the session only decides what
//! happens to the world and which vignette fires.

use crown_rules::{CharacterId, ConsequenceEngine, PlayerAction, Status, WorldState};
use tracing::{debug, info};

use crate::context_assembler::{ContextAssembler, ContextPacket, SceneCast};
use crate::intake::{parse_classifier_output, ActionClassifier};
use crate::vignettes::{Snapshot, VignetteOrchestrator};

/// Seam for the model that writes scene openings and in-character replies.
pub trait NarrativeBackend {
    fn opening(&mut self, cast: &SceneCast, packets: &[ContextPacket]) -> String;

    fn respond(&mut self, speaker: &ContextPacket, input: &str, history: &[Exchange]) -> String;
}

/// One round of conversation inside a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub player: String,
    pub reply: String,
}

/// An open scene.
#[derive(Debug, Clone)]
pub struct Scene {
    pub cast: SceneCast,
    pub opening: String,
    pub packets: Vec<ContextPacket>,
    pub history: Vec<Exchange>,
}

/// What happened in one turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub action: PlayerAction,
    /// The scene closed after this action.
    pub scene_ended: bool,
    /// Who answered and what they said.
    pub reply: Option<(CharacterId, String)>,
    /// Vignette that fired this turn, if any.
    pub vignette: Option<String>,
}

/// Result of ending a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    Continue,
    /// Every character is imprisoned.
    ConspiracyBroken,
}

pub struct Session<C, N> {
    world: WorldState,
    orchestrator: VignetteOrchestrator,
    snapshot: Snapshot,
    assembler: ContextAssembler,
    engine: ConsequenceEngine,
    classifier: C,
    narrator: N,
    scene: Option<Scene>,
}

impl<C: ActionClassifier, N: NarrativeBackend> Session<C, N> {
    pub fn new(world: WorldState, orchestrator: VignetteOrchestrator, classifier: C, narrator: N) -> Self {
        let snapshot = Snapshot::from_world(&world);
        Self {
            world,
            orchestrator,
            snapshot,
            assembler: ContextAssembler::with_defaults(),
            engine: ConsequenceEngine::default(),
            classifier,
            narrator,
            scene: None,
        }
    }

    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_engine(mut self, engine: ConsequenceEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Hand the world back, e.g. for saving.
    pub fn into_world(self) -> WorldState {
        self.world
    }

    /// Open a scene at `location`. Returns `None` when a required character is missing or
    /// not free; any scene already open is closed either way.
    pub fn open_scene(&mut self, location: &str, required: &[&str]) -> Option<&Scene> {
        self.scene = None;
        let cast = self.assembler.cast(&self.world, location, required)?;
        let packets = self.assembler.build_packets(&cast, &self.world);
        let opening = self.narrator.opening(&cast, &packets);

        info!(location, cast = ?cast.ids(), "scene opened");
        self.scene = Some(Scene {
            cast,
            opening,
            packets,
            history: Vec::new(),
        });
        self.scene.as_ref()
    }

    pub fn close_scene(&mut self) {
        if self.scene.take().is_some() {
            debug!("scene closed");
        }
    }

    /// Play one turn of free text.
    pub fn handle_input(&mut self, input: &str) -> TurnOutcome {
        let present = self.scene.as_ref().map(|s| s.cast.ids()).unwrap_or_default();
        let raw = self.classifier.classify(input, &present);
        let action = parse_classifier_output(&raw, input, &present);

        self.engine.apply(&mut self.world, &action);

        let scene_ended = action.action_type.ends_scene();
        let reply = if scene_ended {
            self.close_scene();
            None
        } else {
            self.reply_to(&action, input)
        };

        let vignette = self.evaluate_vignettes();

        TurnOutcome {
            action,
            scene_ended,
            reply,
            vignette,
        }
    }

    /// The targeted character answers if they exist, otherwise the scene's primary character.
    fn reply_to(&mut self, action: &PlayerAction, input: &str) -> Option<(CharacterId, String)> {
        let scene = self.scene.as_mut()?;
        let speaker = self
            .world
            .get_character(&action.target)
            .or_else(|| {
                scene
                    .cast
                    .primary()
                    .and_then(|p| self.world.get_character(p.id.as_str()))
            })?;

        let packet = self.assembler.build_packet(speaker, &self.world);
        let reply = self.narrator.respond(&packet, input, &scene.history);
        scene.history.push(Exchange {
            player: input.to_string(),
            reply: reply.clone(),
        });
        Some((speaker.id.clone(), reply))
    }

    /// Advance the vignette clock one turn and fire at most one vignette.
    ///
    /// Cooldowns tick before selection, so a vignette with cooldown `n` is next eligible
    /// `n` turns after it fired.
    pub fn evaluate_vignettes(&mut self) -> Option<String> {
        self.snapshot.tick();
        self.snapshot.refresh(&self.world);

        let fired = self.orchestrator.select(&self.snapshot)?.clone();
        self.snapshot.record_fired(&fired);
        self.snapshot.pending_queue.push(fired.id.clone());
        Some(fired.id)
    }

    /// Take every fired vignette not yet presented, oldest first.
    pub fn drain_pending_vignettes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.snapshot.pending_queue)
    }

    /// Close any open scene and move to the next day.
    pub fn end_day(&mut self) -> DayOutcome {
        self.close_scene();
        self.world.advance_day();
        info!(day = self.world.day(), "new day");

        let mut npcs = self.world.npcs().peekable();
        if npcs.peek().is_some() && npcs.all(|c| c.status == Status::Imprisoned) {
            DayOutcome::ConspiracyBroken
        } else {
            DayOutcome::Continue
        }
    }
}
