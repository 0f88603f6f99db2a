//! Vignette orchestrator - deterministic selection of the next vignette to fire.

use tracing::{debug, info};

use super::{Snapshot, Vignette};

/// Holds the vignette catalogue in declaration order and selects from it.
///
/// Selection is a pure function of the snapshot: it reads stats, flags and cooldowns and
/// never writes to them.
#[derive(Debug, Clone, Default)]
pub struct VignetteOrchestrator {
    vignettes: Vec<Vignette>,
}

impl VignetteOrchestrator {
    /// Build from a catalogue. A repeated id replaces the earlier definition in its slot.
    pub fn new(vignettes: impl IntoIterator<Item = Vignette>) -> Self {
        let mut orchestrator = Self::default();
        for vignette in vignettes {
            orchestrator.add(vignette);
        }
        orchestrator
    }

    /// Add a vignette, replacing any existing one with the same id.
    pub fn add(&mut self, vignette: Vignette) {
        match self.vignettes.iter_mut().find(|v| v.id == vignette.id) {
            Some(existing) => *existing = vignette,
            None => self.vignettes.push(vignette),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Vignette> {
        self.vignettes.iter().find(|v| v.id == id)
    }

    pub fn vignettes(&self) -> &[Vignette] {
        &self.vignettes
    }

    pub fn len(&self) -> usize {
        self.vignettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vignettes.is_empty()
    }

    /// Check if a vignette's trigger condition is met.
    pub fn check_trigger(&self, vignette: &Vignette, snapshot: &Snapshot) -> bool {
        vignette.trigger_condition.evaluate(&snapshot.stats)
    }

    /// Every precondition flag must be present and true.
    pub fn check_preconditions(&self, vignette: &Vignette, snapshot: &Snapshot) -> bool {
        vignette.preconditions.iter().all(|flag| snapshot.flag(flag))
    }

    /// Any invalidating flag that is present and true excludes the vignette.
    pub fn is_invalidated(&self, vignette: &Vignette, snapshot: &Snapshot) -> bool {
        vignette.invalidated_by.iter().any(|flag| snapshot.flag(flag))
    }

    pub fn is_on_cooldown(&self, vignette: &Vignette, snapshot: &Snapshot) -> bool {
        snapshot.cooldown_remaining(&vignette.id) > 0
    }

    pub fn is_eligible(&self, vignette: &Vignette, snapshot: &Snapshot) -> bool {
        self.check_trigger(vignette, snapshot)
            && self.check_preconditions(vignette, snapshot)
            && !self.is_invalidated(vignette, snapshot)
            && !self.is_on_cooldown(vignette, snapshot)
    }

    /// All vignettes that could fire this tick, in declaration order.
    pub fn eligible<'a>(&'a self, snapshot: &'a Snapshot) -> impl Iterator<Item = &'a Vignette> + 'a {
        self.vignettes
            .iter()
            .filter(move |vignette| self.is_eligible(vignette, snapshot))
    }

    /// Select the highest-priority eligible vignette.
    ///
    /// Among vignettes sharing the highest priority, the one declared first wins.
    pub fn select(&self, snapshot: &Snapshot) -> Option<&Vignette> {
        let mut best: Option<&Vignette> = None;
        for vignette in self.vignettes.iter().filter(|v| self.is_eligible(v, snapshot)) {
            debug!(vignette = %vignette.id, priority = vignette.priority, "eligible vignette");
            if best.map_or(true, |b| vignette.priority > b.priority) {
                best = Some(vignette);
            }
        }

        if let Some(selected) = best {
            info!(turn = snapshot.turn, vignette = %selected.id, "vignette selected");
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vignettes() -> Vec<Vignette> {
        vec![
            Vignette::authored("peasant_riots", "stability < 20", 80)
                .with_cooldown(5)
                .with_invalidated_by(["player_dead"]),
            Vignette::authored("duke_betrayal", "duke_loyalty < 20", 100)
                .with_preconditions(["duke_alive"])
                .with_invalidated_by(["duke_dead", "duke_imprisoned"]),
            Vignette::authored("bankruptcy", "treasury < 10", 60).with_cooldown(8),
            Vignette::authored("border_incident", "war_tension > 80", 70)
                .with_cooldown(10)
                .with_invalidated_by(["at_war"]),
        ]
    }

    fn orchestrator() -> VignetteOrchestrator {
        VignetteOrchestrator::new(sample_vignettes())
    }

    fn crisis(stability: i32, treasury: i32, duke_loyalty: i32, war_tension: i32) -> Snapshot {
        Snapshot::new(15)
            .with_stat("stability", stability)
            .with_stat("treasury", treasury)
            .with_stat("duke_loyalty", duke_loyalty)
            .with_stat("war_tension", war_tension)
    }

    #[test]
    fn test_priority_resolution_all_active() {
        let snapshot = crisis(18, 8, 15, 85)
            .with_flag("duke_alive", true)
            .with_flag("at_war", false);

        let selected = orchestrator().select(&snapshot).map(|v| v.id.clone());
        assert_eq!(selected.as_deref(), Some("duke_betrayal"));
    }

    #[test]
    fn test_priority_with_precondition_failure() {
        let snapshot = crisis(18, 8, 15, 85)
            .with_flag("duke_alive", false)
            .with_flag("at_war", false);

        let selected = orchestrator().select(&snapshot).map(|v| v.id.clone());
        assert_eq!(selected.as_deref(), Some("peasant_riots"));
    }

    #[test]
    fn test_absent_precondition_counts_as_false() {
        let snapshot = crisis(50, 50, 15, 50);
        assert!(orchestrator().select(&snapshot).is_none());
    }

    #[test]
    fn test_cooldown_respected() {
        let snapshot = crisis(18, 50, 50, 50)
            .with_flag("duke_alive", true)
            .with_cooldown("peasant_riots", 3);

        assert!(orchestrator().select(&snapshot).is_none());
    }

    #[test]
    fn test_invalidation_prevents_firing() {
        let snapshot = crisis(50, 50, 15, 85)
            .with_flag("duke_alive", true)
            .with_flag("duke_imprisoned", true)
            .with_flag("at_war", true);

        assert!(orchestrator().select(&snapshot).is_none());
    }

    #[test]
    fn test_single_invalidation_flag() {
        let orchestrator = VignetteOrchestrator::new([Vignette::authored("duke_plot", "duke_loyalty < 20", 90)
            .with_invalidated_by(["duke_dead"])]);
        let snapshot = Snapshot::new(1)
            .with_stat("duke_loyalty", 5)
            .with_flag("duke_dead", true);
        assert!(orchestrator.select(&snapshot).is_none());

        let cleared = snapshot.with_flag("duke_dead", false);
        assert_eq!(orchestrator.select(&cleared).map(|v| v.id.as_str()), Some("duke_plot"));
    }

    #[test]
    fn test_no_triggers_returns_none() {
        let snapshot = crisis(80, 100, 80, 20).with_flag("duke_alive", true);
        assert!(orchestrator().select(&snapshot).is_none());
    }

    #[test]
    fn test_selection_is_pure() {
        let orchestrator = orchestrator();
        let snapshot = crisis(18, 8, 15, 85).with_flag("duke_alive", true);
        let before = snapshot.clone();

        let first = orchestrator.select(&snapshot).map(|v| v.id.clone());
        let second = orchestrator.select(&snapshot).map(|v| v.id.clone());

        assert_eq!(first, second);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_tie_break_prefers_first_declared() {
        let orchestrator = VignetteOrchestrator::new([
            Vignette::authored("zealots_march", "stability < 50", 70),
            Vignette::authored("bread_riot", "stability < 50", 70),
            Vignette::authored("minor_grumbling", "stability < 50", 10),
        ]);
        let snapshot = Snapshot::new(1).with_stat("stability", 10);

        assert_eq!(orchestrator.select(&snapshot).map(|v| v.id.as_str()), Some("zealots_march"));
    }

    #[test]
    fn test_malformed_condition_isolated() {
        let orchestrator = VignetteOrchestrator::new([
            Vignette::authored("broken", "stability <", 1000),
            Vignette::authored("unknown_stat", "morale < 50", 900),
            Vignette::authored("bankruptcy", "treasury < 10", 60),
        ]);
        let snapshot = Snapshot::new(1).with_stat("treasury", 3).with_stat("stability", 0);

        assert_eq!(orchestrator.select(&snapshot).map(|v| v.id.as_str()), Some("bankruptcy"));
    }

    #[test]
    fn test_eligible_in_declaration_order() {
        let snapshot = crisis(18, 8, 15, 85).with_flag("duke_alive", true);
        let orchestrator = orchestrator();
        let ids: Vec<_> = orchestrator.eligible(&snapshot).map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["peasant_riots", "duke_betrayal", "bankruptcy", "border_incident"]);
    }

    #[test]
    fn test_duplicate_id_replaces_in_place() {
        let orchestrator = VignetteOrchestrator::new([
            Vignette::authored("riots", "stability < 20", 10),
            Vignette::authored("bankruptcy", "treasury < 10", 60),
            Vignette::authored("riots", "stability < 30", 90),
        ]);

        assert_eq!(orchestrator.len(), 2);
        assert_eq!(orchestrator.vignettes()[0].priority, 90);
        assert_eq!(orchestrator.get("riots").unwrap().trigger_condition.to_string(), "stability < 30");
    }
}
