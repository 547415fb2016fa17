use parking_lot::Mutex;
use sector_cinematic::{ActorKind, CinematicHooks, CinematicTick, Script, ScriptLine};
use sector_core::{Animator, Localizer, Millis, PoseFlags, SoundSink};
use sector_math::{Vec2, Vec3};
use sector_mission::prelude::*;
use sector_triggers::{ActionEffect, NarrativeEvent, Trigger};
use std::sync::Arc;

#[derive(Default)]
struct HostLog {
    renders: Vec<MissionMode>,
    world_steps: usize,
    effects: Vec<(String, ActionEffect)>,
    narratives: Vec<NarrativeEvent>,
    sounds: Vec<String>,
    events: Vec<String>,
    screens: Vec<String>,
    clues: Vec<String>,
    bosses: usize,
    xp: u32,
    speaking: Vec<String>,
    concluded: Vec<MissionReport>,
    next_report: Option<WorldReport>,
}

#[derive(Clone, Default)]
struct RecordingHost {
    log: Arc<Mutex<HostLog>>,
}

impl RecordingHost {
    fn queue_report(&self, report: WorldReport) {
        self.log.lock().next_report = Some(report);
    }
}

impl SoundSink for RecordingHost {
    fn play(&mut self, cue: &str) {
        self.log.lock().sounds.push(cue.to_string());
    }

    fn play_voice(&mut self, _speaker: &str) {}
}

impl Animator for RecordingHost {
    fn animate(&mut self, actor: &str, pose: &PoseFlags, _now: Millis, _delta: Millis) {
        if pose.is_speaking {
            self.log.lock().speaking.push(actor.to_string());
        }
    }
}

impl CinematicHooks for RecordingHost {
    fn script_event(&mut self, name: &str) {
        self.log.lock().events.push(name.to_string());
    }
}

impl Localizer for RecordingHost {
    fn translate(&self, key: &str) -> String {
        format!("[{}]", key)
    }
}

impl MissionHost for RecordingHost {
    fn render(&mut self, frame: &FrameView<'_>) {
        self.log.lock().renders.push(frame.mode);
    }

    fn step_world(&mut self, _step: &WorldStep) -> WorldReport {
        let mut log = self.log.lock();
        log.world_steps += 1;
        log.next_report.take().unwrap_or_default()
    }

    fn world_effect(&mut self, trigger_id: &str, effect: &ActionEffect) {
        self.log
            .lock()
            .effects
            .push((trigger_id.to_string(), effect.clone()));
    }

    fn narrate(&mut self, event: &NarrativeEvent) {
        self.log.lock().narratives.push(event.clone());
    }

    fn open_ui(&mut self, screen: &str) {
        self.log.lock().screens.push(screen.to_string());
    }

    fn show_clue(&mut self, clue: &ClueDefinition, _text: &str) {
        self.log.lock().clues.push(clue.id.clone());
    }

    fn spawn_boss(&mut self, _boss: &BossDefinition) {
        self.log.lock().bosses += 1;
    }

    fn gain_xp(&mut self, xp: u32, _sp: u32) {
        self.log.lock().xp += xp;
    }

    fn mission_concluded(&mut self, report: &MissionReport) {
        self.log.lock().concluded.push(report.clone());
    }
}

fn boss(kill_threshold: Option<u32>) -> BossDefinition {
    BossDefinition {
        enemy_type: "TANK".to_string(),
        position: Vec2::new(0.0, -30.0),
        kill_threshold,
    }
}

fn reward_trigger() -> Trigger {
    Trigger::circle("shrine", Vec2::new(0.0, 5.0), 1.0)
        .with_action(ActionEffect::GiveReward { xp: 50, sp: 1 })
}

fn mission(sector: SectorDefinition) -> (MissionLoop<RecordingHost>, RecordingHost) {
    let host = RecordingHost::default();
    let mut mission = MissionLoop::new(sector, MissionConfig::default(), host.clone());
    mission.start(0.0);
    (mission, host)
}

fn idle() -> MoveInput {
    MoveInput::default()
}

#[test]
fn test_boss_intro_blocks_triggers_and_movement() {
    let sector = SectorDefinition::new("s1")
        .with_trigger(reward_trigger())
        .with_boss(boss(Some(1)));
    let (mut mission, host) = mission(sector);

    host.queue_report(WorldReport {
        kills: 1,
        ..WorldReport::default()
    });
    assert_eq!(mission.tick(100.0, 100.0, idle()).mode, MissionMode::Normal);
    assert!(mission.state().boss_intro);
    assert_eq!(host.log.lock().bosses, 1);

    // Standing in the reward zone and pushing the stick does nothing during the intro
    mission.place_player(Vec2::new(0.0, 5.0));
    let mut modes = Vec::new();
    let mut now = 200.0;
    while now < 4100.0 {
        modes.push(mission.tick(now, 100.0, MoveInput::run(Vec2::new(1.0, 0.0))).mode);
        now += 100.0;
    }
    assert!(modes.iter().all(|mode| *mode == MissionMode::BossIntro));
    assert!(mission.state().running);
    assert_eq!(host.log.lock().world_steps, 1);
    assert_eq!(host.log.lock().xp, 0);
    assert_eq!(mission.state().player_position, Vec3::new(0.0, 0.0, 5.0));

    while now < 6000.0 {
        modes.push(mission.tick(now, 100.0, idle()).mode);
        now += 100.0;
    }

    let resumes = modes
        .windows(2)
        .filter(|pair| pair[0] == MissionMode::BossIntro && pair[1] == MissionMode::Normal)
        .count();
    assert_eq!(resumes, 1);
    assert_eq!(host.log.lock().xp, 50);
    assert_eq!(mission.state().counters.xp, 50);
}

#[test]
fn test_one_shot_trigger_fires_once() {
    let sector = SectorDefinition::new("s1").with_trigger(
        reward_trigger().with_action(ActionEffect::SpawnEnemy {
            enemy_type: "WALKER".to_string(),
            count: 2,
            position: None,
        }),
    );
    let (mut mission, host) = mission(sector);
    mission.place_player(Vec2::new(0.0, 5.0));

    let mut fired = 0;
    for frame in 1..=200 {
        let report = mission.tick(frame as Millis * 16.0, 16.0, idle());
        fired += report.triggers.map(|summary| summary.fired).unwrap_or(0);
    }

    assert_eq!(fired, 1);
    assert_eq!(host.log.lock().xp, 50);
    assert_eq!(host.log.lock().effects.len(), 1);
}

#[test]
fn test_narrative_content_sets_speech_timer() {
    let sector = SectorDefinition::new("s1").with_trigger(
        Trigger::circle("well", Vec2::new(0.0, 0.0), 2.0)
            .with_content("well")
            .with_kind(sector_triggers::TriggerKind::Speech),
    );
    let (mut mission, host) = mission(sector);

    mission.tick(100.0, 16.0, idle());

    let log = host.log.lock();
    assert_eq!(log.narratives.len(), 1);
    // "[well]" is 6 characters
    assert_eq!(log.narratives[0].duration, 2300.0);
    assert!(log.sounds.iter().any(|cue| cue == "speech_start"));
    drop(log);
    assert!(mission.state().is_speaking(2399.0));
    assert!(!mission.state().is_speaking(2400.0));
}

#[test]
fn test_cinematic_then_exit_trigger_spawns_boss() {
    let script = Script::new("meet", "Loke")
        .with_line(ScriptLine::new("Loke", "hi").with_trigger("family_follow"))
        .with_exit_trigger(BOSS_START_EVENT);
    let sector = SectorDefinition::new("s1")
        .with_trigger(
            Trigger::circle("meet_zone", Vec2::new(0.0, 0.0), 2.0)
                .with_action(ActionEffect::StartCinematic { script: "meet".to_string() }),
        )
        .with_script(script)
        .with_actor(ActorDefinition {
            name: "Loke".to_string(),
            aliases: Vec::new(),
            position: Vec2::new(2.0, 0.0),
            scale: 1.0,
            kind: ActorKind::Animated,
        })
        .with_boss(boss(None));
    let (mut mission, host) = mission(sector);

    assert_eq!(mission.tick(100.0, 100.0, idle()).mode, MissionMode::Normal);
    assert!(mission.cinematic().is_some());

    // "[hi]" types for 120 ms and stays up for 2120 ms
    let report = mission.tick(200.0, 100.0, idle());
    assert_eq!(report.mode, MissionMode::Cinematic);
    assert!(report.triggers.is_none());
    assert_eq!(host.log.lock().speaking, vec!["Loke"]);

    let mut now = 300.0;
    let mut finished_at = None;
    while now < 3000.0 {
        let report = mission.tick(now, 100.0, idle());
        if let Some(CinematicTick::Finished { exit_trigger }) = report.cinematic {
            assert_eq!(exit_trigger.as_deref(), Some(BOSS_START_EVENT));
            finished_at = Some(now);
            break;
        }
        now += 100.0;
    }
    assert_eq!(finished_at, Some(2300.0));
    assert_eq!(host.log.lock().events, vec!["family_follow"]);
    assert_eq!(host.log.lock().bosses, 0);

    // Exit trigger fires one beat later
    assert_eq!(mission.tick(3200.0, 100.0, idle()).mode, MissionMode::Normal);
    assert_eq!(host.log.lock().bosses, 0);
    assert_eq!(mission.tick(3300.0, 100.0, idle()).mode, MissionMode::BossIntro);
    assert_eq!(host.log.lock().bosses, 1);
    assert_eq!(host.log.lock().events, vec!["family_follow", BOSS_START_EVENT]);
}

#[test]
fn test_death_concludes_after_delay() {
    let (mut mission, host) = mission(SectorDefinition::new("s1"));

    host.queue_report(WorldReport {
        damage_to_player: 150.0,
        ..WorldReport::default()
    });
    mission.tick(100.0, 100.0, idle());
    assert!(mission.state().is_dead);
    assert_eq!(mission.state().counters.damage_taken, 150.0);

    assert_eq!(mission.tick(3000.0, 100.0, idle()).mode, MissionMode::Dead);
    assert!(host.log.lock().concluded.is_empty());

    assert_eq!(mission.tick(3100.0, 100.0, idle()).mode, MissionMode::Dead);
    let renders = host.log.lock().renders.len();

    // Nothing more is drawn once the death has been reported
    for i in 1..=10 {
        let now = 3100.0 + i as f64 * 100.0;
        assert_eq!(mission.tick(now, 100.0, idle()).mode, MissionMode::Paused);
    }

    let log = host.log.lock();
    assert_eq!(log.renders.len(), renders);
    assert_eq!(log.concluded.len(), 1);
    assert_eq!(log.concluded[0].outcome, MissionOutcome::Died);
    assert_eq!(log.concluded[0].elapsed, 3100.0);
    assert_eq!(log.world_steps, 1);
}

#[test]
fn test_victory_after_boss_defeat_grace() {
    let (mut mission, host) = mission(SectorDefinition::new("s1").with_boss(boss(Some(1))));

    host.queue_report(WorldReport {
        kills: 1,
        ..WorldReport::default()
    });
    mission.tick(0.0, 16.0, idle());
    assert_eq!(mission.tick(4000.0, 16.0, idle()).mode, MissionMode::Normal);

    host.queue_report(WorldReport {
        boss_defeated: true,
        kills: 1,
        ..WorldReport::default()
    });
    mission.tick(5000.0, 16.0, idle());
    assert!(mission.state().boss_defeated);

    assert_eq!(mission.tick(7999.0, 16.0, idle()).mode, MissionMode::Normal);
    assert_eq!(mission.tick(8000.0, 16.0, idle()).mode, MissionMode::Concluding);
    assert_eq!(mission.outcome(), Some(MissionOutcome::Victory));
    assert_eq!(mission.tick(8100.0, 16.0, idle()).mode, MissionMode::Paused);

    let log = host.log.lock();
    assert_eq!(log.concluded.len(), 1);
    assert_eq!(log.concluded[0].counters.kills, 2);
}

#[test]
fn test_open_ui_freezes_world_until_closed() {
    let sector = SectorDefinition::new("s1").with_trigger(
        Trigger::rect("crate", Vec2::new(0.0, 0.0), 2.0, 2.0)
            .reset_on_exit()
            .with_action(ActionEffect::OpenUi { screen: "loot".to_string() }),
    );
    let (mut mission, host) = mission(sector);

    assert_eq!(mission.tick(100.0, 16.0, idle()).mode, MissionMode::Normal);
    assert_eq!(host.log.lock().screens, vec!["loot"]);

    for now in [200.0, 300.0, 400.0] {
        assert_eq!(mission.tick(now, 16.0, idle()).mode, MissionMode::InteractionPaused);
    }
    assert_eq!(host.log.lock().world_steps, 1);
    assert_eq!(
        host.log.lock().renders.last(),
        Some(&MissionMode::InteractionPaused)
    );

    // Closed while still inside: not reopened by the refresh
    mission.close_interaction();
    for now in [500.0, 600.0] {
        let report = mission.tick(now, 16.0, idle());
        assert_eq!(report.mode, MissionMode::Normal);
        assert_eq!(report.triggers.map(|summary| summary.refreshed), Some(1));
    }
    assert_eq!(host.log.lock().screens.len(), 1);

    // Leave and come back
    mission.place_player(Vec2::new(10.0, 0.0));
    mission.tick(700.0, 16.0, idle());
    mission.place_player(Vec2::new(0.0, 0.0));
    mission.tick(800.0, 16.0, idle());
    assert_eq!(host.log.lock().screens, vec!["loot", "loot"]);
    assert_eq!(mission.mode(), MissionMode::Normal);
    assert_eq!(mission.tick(900.0, 16.0, idle()).mode, MissionMode::InteractionPaused);
}

#[test]
fn test_clue_pickup_gates_world() {
    let sector = SectorDefinition::new("s1").with_clue(ClueDefinition {
        id: "diary".to_string(),
        position: Vec2::new(0.0, 0.0),
        radius: 1.5,
        content: "clue.diary".to_string(),
    });
    let (mut mission, host) = mission(sector);

    mission.tick(100.0, 16.0, idle());
    assert_eq!(host.log.lock().clues, vec!["diary"]);
    assert_eq!(mission.tick(200.0, 16.0, idle()).mode, MissionMode::InteractionPaused);

    mission.close_clue();
    assert_eq!(mission.tick(300.0, 16.0, idle()).mode, MissionMode::Normal);
    assert_eq!(host.log.lock().clues.len(), 1);
    assert_eq!(mission.state().collected_clues, vec!["diary"]);
}

#[test]
fn test_pause_skips_render_and_simulation() {
    let (mut mission, host) = mission(SectorDefinition::new("s1"));
    mission.set_paused(true);

    assert_eq!(mission.tick(100.0, 16.0, idle()).mode, MissionMode::Paused);
    assert!(host.log.lock().renders.is_empty());
    assert_eq!(host.log.lock().world_steps, 0);

    mission.set_paused(false);
    assert_eq!(mission.tick(200.0, 16.0, idle()).mode, MissionMode::Normal);
    assert_eq!(host.log.lock().world_steps, 1);
}

#[test]
fn test_pause_does_not_eat_cinematic_line_time() {
    let script = Script::new("meet", "Loke")
        .with_line(ScriptLine::new("Loke", "hi"))
        .with_line(ScriptLine::new("Robert", "bye"));
    let (mut mission, _host) = mission(SectorDefinition::new("s1").with_script(script));

    assert!(mission.start_cinematic("meet", 100.0));
    assert_eq!(mission.tick(200.0, 100.0, idle()).mode, MissionMode::Cinematic);

    mission.set_paused(true);
    assert_eq!(mission.tick(300.0, 100.0, idle()).mode, MissionMode::Paused);
    mission.set_paused(false);

    // 200 ms of the 2120 ms line had played before the pause
    let report = mission.tick(10_000.0, 100.0, idle());
    assert!(matches!(report.cinematic, Some(CinematicTick::Playing { line_index: 0, .. })));
    let report = mission.tick(11_900.0, 100.0, idle());
    assert!(matches!(report.cinematic, Some(CinematicTick::Playing { line_index: 0, .. })));
    let report = mission.tick(12_000.0, 100.0, idle());
    assert_eq!(report.cinematic, Some(CinematicTick::Advanced { line_index: 1 }));
}

#[test]
fn test_request_end_aborts() {
    let (mut mission, host) = mission(SectorDefinition::new("s1"));
    mission.request_end();

    assert_eq!(mission.tick(100.0, 16.0, idle()).mode, MissionMode::Concluding);
    assert_eq!(mission.outcome(), Some(MissionOutcome::Aborted));
    assert_eq!(host.log.lock().concluded.len(), 1);
}

#[test]
fn test_shutdown_cancels_pending_timers() {
    let sector = SectorDefinition::new("s1")
        .with_trigger(reward_trigger().with_delayed_action(
            ActionEffect::SpawnEnemy {
                enemy_type: "WALKER".to_string(),
                count: 3,
                position: None,
            },
            5000.0,
        ))
        .with_boss(boss(Some(1)));
    let (mut mission, host) = mission(sector);
    mission.place_player(Vec2::new(0.0, 5.0));

    mission.tick(100.0, 16.0, idle());
    host.queue_report(WorldReport {
        kills: 1,
        ..WorldReport::default()
    });
    mission.tick(200.0, 16.0, idle());
    assert_eq!(mission.pending_timers(), 2);

    assert_eq!(mission.shutdown(), 2);
    assert_eq!(mission.pending_timers(), 0);

    let renders = host.log.lock().renders.len();
    mission.tick(10_000.0, 16.0, idle());
    assert!(host.log.lock().effects.is_empty());
    assert_eq!(host.log.lock().renders.len(), renders);
    assert!(mission.state().boss_intro);
}

#[test]
fn test_sessions_are_independent() {
    let (mut first, first_host) = mission(SectorDefinition::new("a").with_trigger(reward_trigger()));
    let (mut second, second_host) = mission(SectorDefinition::new("b").with_trigger(reward_trigger()));

    first.place_player(Vec2::new(0.0, 5.0));
    first.tick(100.0, 16.0, idle());
    second.tick(100.0, 16.0, idle());

    assert_eq!(first_host.log.lock().xp, 50);
    assert_eq!(second_host.log.lock().xp, 0);
}

#[test]
fn test_sector_file_round_trip_through_loader() {
    let json = r#"{
        "id": "camp_road",
        "triggers": [
            {"id": "radio", "position": {"x": 0.0, "y": 0.0}, "radius": 2.0,
             "type": "INFO", "content": "sector.radio",
             "actions": [{"type": "PLAY_SOUND", "sound": "radio_static"},
                         {"type": "CAMERA_SHAKE", "intensity": 0.4}]}
        ]
    }"#;
    let sector = SectorDefinition::from_json_str(json, Validation::Strict).unwrap();
    let (mut mission, host) = mission(sector);

    mission.tick(100.0, 16.0, idle());

    let log = host.log.lock();
    assert!(log.sounds.iter().any(|cue| cue == "radio_static"));
    assert!(log.sounds.iter().any(|cue| cue == "narrative_reveal"));
    assert_eq!(log.narratives[0].text, "[sector.radio]");
    drop(log);
    assert!(mission.state().is_thinking(200.0));
    assert!(mission.state().camera_fx.shake_intensity(100.0) > 0.0);
}
