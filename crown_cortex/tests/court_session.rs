//! Session integration tests - scenario files through a full day of play.

use crown_cortex::{
    load_scenario_from_str, load_vignettes_from_str, ActionClassifier, ContextPacket, DayOutcome,
    Exchange, NarrativeBackend, SceneCast, Session, Snapshot, VignetteOrchestrator,
};
use crown_rules::{ActionKind, Status, WorldState};
use std::collections::VecDeque;

const SCENARIO: &str = r#"
day = 1

[flags]
baron_executed = true

[stats]
stability = 22
treasury = 40

[[characters]]
id = "duke_valerius"
name = "Duke Valerius"
status = "free"
loyalty = 35
location = "duke_quarters"
suspicion_of_player = 20
knows = ["secret_king_illegitimate", "baron_was_ally"]
agenda = "protect conspiracy, appear loyal"
personality = "schemer"

[[characters]]
id = "bishop_erasmus"
name = "Bishop Erasmus"
status = "free"
loyalty = 55
location = "chapel"
suspicion_of_player = 10
knows = ["secret_king_illegitimate"]
agenda = "support the Duke, maintain pious facade"
personality = "coward"
"#;

const CATALOG: &str = r#"
[[vignettes]]
id = "duke_betrayal"
trigger = "duke_valerius_loyalty < 20"
priority = 100
preconditions = ["duke_valerius_alive"]
invalidated_by = ["duke_valerius_imprisoned"]

[[vignettes]]
id = "bishop_confession"
trigger = "bishop_erasmus_suspicion >= 40"
priority = 90
cooldown = 3
invalidated_by = ["bishop_erasmus_arrested"]

[[vignettes]]
id = "peasant_riots"
trigger = "stability < 20"
priority = 80
cooldown = 5

[[vignettes]]
id = "broken_omen"
trigger = "stability <"
priority = 1000
"#;

struct Scripted(VecDeque<&'static str>);

impl ActionClassifier for Scripted {
    fn classify(&mut self, _input: &str, _present: &[String]) -> String {
        self.0.pop_front().unwrap_or("{}").to_string()
    }
}

#[derive(Default)]
struct Recorder {
    prompts: Vec<String>,
}

impl NarrativeBackend for Recorder {
    fn opening(&mut self, cast: &SceneCast, packets: &[ContextPacket]) -> String {
        self.prompts
            .extend(packets.iter().map(ContextPacket::to_prompt_string));
        format!("The court gathers: {}", cast.names().join(", "))
    }

    fn respond(&mut self, speaker: &ContextPacket, input: &str, _history: &[Exchange]) -> String {
        self.prompts.push(speaker.to_prompt_string());
        format!("{} considers '{}'", speaker.name, input)
    }
}

fn build(actions: &[&'static str]) -> Session<Scripted, Recorder> {
    let world = load_scenario_from_str(SCENARIO).unwrap().build_world().unwrap();
    let orchestrator = load_vignettes_from_str(CATALOG).unwrap().into_orchestrator();
    Session::new(
        world,
        orchestrator,
        Scripted(actions.iter().copied().collect()),
        Recorder::default(),
    )
}

#[test]
fn intimidating_the_bishop_triggers_confession() {
    let intimidate = r#"{"action_type":"intimidate","target":"bishop_erasmus"}"#;
    let mut session = build(&[intimidate, intimidate]);
    session.open_scene("chapel", &["bishop_erasmus"]);

    let first = session.handle_input("I know what you did.");
    assert_eq!(first.vignette, None);

    let second = session.handle_input("Speak, or burn.");
    assert_eq!(second.vignette.as_deref(), Some("bishop_confession"));

    let bishop = session.world().get_character("bishop_erasmus").unwrap();
    assert_eq!(bishop.suspicion_of_player.value(), 40);

    let last_prompt = session.narrator().prompts.last().unwrap();
    assert!(last_prompt.contains("Suspicion of the King: 40/100"));
    assert!(last_prompt.contains("Day 1: intimidated"));
}

#[test]
fn threatening_the_duke_twice_then_arresting_him() {
    let threaten = r#"```json
{"action_type": "threaten", "target": "duke_valerius", "details": {"speech": "Confess!"}}
```"#;
    let arrest = r#"{"action_type":"arrest","target":"duke_valerius"}"#;
    let mut session = build(&[threaten, threaten, arrest]);

    let scene = session.open_scene("throne_room", &["duke_valerius"]).unwrap();
    assert_eq!(scene.opening, "The court gathers: Duke Valerius");

    assert_eq!(session.handle_input("Confess!").vignette, None);
    let second = session.handle_input("Confess!");
    assert_eq!(second.vignette.as_deref(), Some("duke_betrayal"));
    assert_eq!(session.world().get_character("duke_valerius").unwrap().loyalty.value(), 15);

    let third = session.handle_input("Guards!");
    assert!(third.scene_ended);
    assert_eq!(third.action.action_type, ActionKind::Arrest);
    assert_eq!(third.vignette, None);

    let duke = session.world().get_character("duke_valerius").unwrap();
    assert_eq!(duke.status, Status::Imprisoned);
    assert_eq!(duke.location, "dungeon");
    assert!(session.world().flag("duke_valerius_threatened"));
    assert!(session.world().flag("duke_valerius_arrested"));

    let types: Vec<_> = session
        .world()
        .events()
        .iter()
        .map(|e| e.event_type.as_str())
        .collect();
    assert_eq!(types, vec!["threatened", "threatened", "arrest"]);

    assert_eq!(session.end_day(), DayOutcome::Continue);
}

#[test]
fn scene_cannot_open_with_prisoner() {
    let arrest = r#"{"action_type":"arrest","target":"duke_valerius"}"#;
    let mut session = build(&[arrest]);
    session.open_scene("throne_room", &["duke_valerius"]);
    session.handle_input("Take him.");
    session.end_day();

    assert!(session.open_scene("dungeon", &["duke_valerius"]).is_none());
}

#[test]
fn world_survives_save_and_load_after_play() {
    let speak = r#"{"action_type":"speak","target":"bishop_erasmus","details":{"speech":"Pray for me."}}"#;
    let mut session = build(&[speak, r#"{"action_type":"leave"}"#]);
    session.open_scene("chapel", &["bishop_erasmus"]);
    session.handle_input("Pray for me.");
    assert!(session.handle_input("I take my leave.").scene_ended);
    session.end_day();

    let world = session.into_world();
    let restored = WorldState::from_json(&world.to_json().unwrap()).unwrap();

    assert_eq!(restored, world);
    assert_eq!(restored.day(), 2);
    assert!(restored.flag("player_left_scene"));
    assert_eq!(
        restored.get_character("duke_valerius").unwrap().knows.facts(),
        ["secret_king_illegitimate".to_string(), "baron_was_ally".to_string()]
    );
}

#[test]
fn selection_over_loaded_catalogue_is_deterministic() {
    let world = load_scenario_from_str(SCENARIO).unwrap().build_world().unwrap();
    let orchestrator: VignetteOrchestrator = load_vignettes_from_str(CATALOG).unwrap().into_orchestrator();

    let snapshot = Snapshot::from_world(&world).with_stat("stability", 10);
    let first = orchestrator.select(&snapshot).map(|v| v.id.clone());
    let second = orchestrator.select(&snapshot).map(|v| v.id.clone());

    assert_eq!(first.as_deref(), Some("peasant_riots"));
    assert_eq!(first, second);
}
