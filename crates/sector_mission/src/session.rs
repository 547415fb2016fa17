//! Mission loop
//!
//! One [`MissionLoop`] per mission session. The host calls [`MissionLoop::tick`]
//! once per frame; the loop resolves the [`MissionMode`] for that tick and runs
//! exactly one mode handler.

use crate::config::MissionConfig;
use crate::definition::SectorDefinition;
use crate::host::{FrameView, MissionHost, WorldReport, WorldStep};
use crate::mode::MissionMode;
use crate::movement::{self, MoveInput};
use crate::state::{MissionOutcome, MissionRuntimeState};
use crate::vitals::DamageOutcome;
use sector_cinematic::{
    Actor, BubblePlacement, Camera, Cast, CinematicHooks, CinematicSequencer, CinematicState,
    CinematicTick, Speakers,
};
use sector_core::{Animator, Millis, PoseFlags, Scheduler, SoundSink};
use sector_math::Vec2;
use sector_triggers::{ActionEffect, EvaluationSummary, NarrativeEvent, TriggerEngine, TriggerHandler};

/// Event name that brings the boss in
pub const BOSS_START_EVENT: &str = "boss_start";

/// Deferred mission work
#[derive(Debug, Clone, PartialEq)]
enum MissionTask {
    EndBossIntro,
    ExitTrigger(String),
    DeathSequenceDone,
    VictoryGrace,
}

/// Trigger output, kept in firing order
#[derive(Debug, Clone)]
enum Fired {
    Action(String, ActionEffect),
    Narrative(NarrativeEvent),
}

#[derive(Debug, Default)]
struct FiredQueue {
    fired: Vec<Fired>,
}

impl TriggerHandler for FiredQueue {
    fn execute(&mut self, trigger_id: &str, effect: &ActionEffect) {
        self.fired.push(Fired::Action(trigger_id.to_string(), effect.clone()));
    }

    fn narrate(&mut self, event: NarrativeEvent) {
        self.fired.push(Fired::Narrative(event));
    }
}

/// Forwards sequencer output to the host, holding script events back so the
/// loop can react to them
struct HookRelay<'a, H: MissionHost> {
    host: &'a mut H,
    events: Vec<String>,
}

impl<H: MissionHost> SoundSink for HookRelay<'_, H> {
    fn play(&mut self, cue: &str) {
        self.host.play(cue);
    }

    fn play_voice(&mut self, speaker: &str) {
        self.host.play_voice(speaker);
    }
}

impl<H: MissionHost> Animator for HookRelay<'_, H> {
    fn animate(&mut self, actor: &str, pose: &PoseFlags, now: Millis, delta: Millis) {
        self.host.animate(actor, pose, now, delta);
    }
}

impl<H: MissionHost> CinematicHooks for HookRelay<'_, H> {
    fn script_event(&mut self, name: &str) {
        self.events.push(name.to_string());
    }
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub mode: MissionMode,
    /// Trigger evaluation, normal mode only
    pub triggers: Option<EvaluationSummary>,
    /// Sequencer result, cinematic mode only
    pub cinematic: Option<CinematicTick>,
}

/// Per-frame orchestration of one mission session
pub struct MissionLoop<H: MissionHost> {
    config: MissionConfig,
    sector: SectorDefinition,
    state: MissionRuntimeState,
    host: H,
    engine: TriggerEngine,
    sequencer: CinematicSequencer,
    cinematic: Option<CinematicState>,
    cast: Cast,
    camera: Camera,
    tasks: Scheduler<MissionTask>,
    mode: MissionMode,
    frame: u64,
    /// First paused tick of the current pause
    paused_since: Option<Millis>,
    torn_down: bool,
}

impl<H: MissionHost> MissionLoop<H> {
    /// Build a session for `sector`. Nothing runs until [`MissionLoop::start`].
    pub fn new(sector: SectorDefinition, config: MissionConfig, host: H) -> Self {
        let state = MissionRuntimeState::new(&sector, &config.player);

        let player = config
            .player
            .aliases
            .iter()
            .fold(Actor::new(config.player.name.clone(), state.player_position), |actor, alias| {
                actor.with_alias(alias.clone())
            });
        let cast = sector
            .cast
            .iter()
            .fold(Cast::new(player), |cast, actor| cast.with_member(actor.to_actor()));

        let mut camera = Camera::new(config.viewport);
        camera.set(state.player_position + config.camera.follow_offset, state.player_position);

        Self {
            sequencer: CinematicSequencer::new(config.cinematic),
            engine: TriggerEngine::new(),
            cinematic: None,
            tasks: Scheduler::new(),
            mode: MissionMode::Paused,
            frame: 0,
            paused_since: None,
            torn_down: false,
            config,
            sector,
            state,
            host,
            cast,
            camera,
        }
    }

    /// Start the mission clock
    pub fn start(&mut self, now: Millis) {
        if self.torn_down {
            log::warn!("Mission '{}' was torn down and cannot restart", self.sector.id);
            return;
        }
        self.state.running = true;
        self.state.started_at = now;
        log::info!("Mission '{}' started", self.sector.id);
    }

    /// Run one frame
    pub fn tick(&mut self, now: Millis, delta: Millis, input: MoveInput) -> FrameReport {
        if self.torn_down {
            return FrameReport {
                frame: self.frame,
                mode: MissionMode::Paused,
                triggers: None,
                cinematic: None,
            };
        }

        self.frame += 1;
        self.run_due_tasks(now);

        let mode = MissionMode::resolve(&self.state, self.cinematic.is_some());
        if mode != self.mode {
            log::info!("Mission mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
        if mode == MissionMode::Paused {
            self.paused_since.get_or_insert(now);
        } else if let Some(since) = self.paused_since.take() {
            if let Some(cinematic) = self.cinematic.as_mut() {
                cinematic.resume_after(now - since);
            }
        }
        if self.config.debug {
            log::debug!("Frame {} at {:.0}ms in {}", self.frame, now, mode);
        }

        let mut report = FrameReport {
            frame: self.frame,
            mode,
            triggers: None,
            cinematic: None,
        };

        match mode {
            MissionMode::BossIntro => self.tick_boss_intro(now, delta),
            MissionMode::Dead => self.tick_dead(now, delta),
            MissionMode::Concluding => self.tick_concluding(now),
            MissionMode::Paused => {}
            MissionMode::Cinematic => report.cinematic = Some(self.tick_cinematic(now, delta)),
            MissionMode::InteractionPaused => self.render(now, None),
            MissionMode::Normal => report.triggers = self.tick_normal(now, delta, input),
        }

        report
    }

    /// Cancel every pending timer and stop ticking. Returns how many timers
    /// were dropped.
    pub fn shutdown(&mut self) -> usize {
        let cancelled = self.cancel_timers();
        self.cinematic = None;
        self.state.running = false;
        self.torn_down = true;
        log::info!(
            "Mission '{}' torn down, {} pending task(s) cancelled",
            self.sector.id,
            cancelled
        );
        cancelled
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state.paused = paused;
    }

    /// The player closed the open UI screen
    pub fn close_interaction(&mut self) {
        if !self.state.interaction_open {
            return;
        }
        self.state.interaction_open = false;
        if let Some(source) = self.state.interaction_source.take() {
            self.state.dismissed_interactions.push(source);
        }
    }

    /// The player finished reading a clue
    pub fn close_clue(&mut self) {
        self.state.clue_open = None;
    }

    /// End the mission from outside (quit, retreat)
    pub fn request_end(&mut self) {
        self.state.end_requested = true;
    }

    /// Move the player without simulating the path
    pub fn place_player(&mut self, position: Vec2) {
        self.state.player_position = position.to_vec3(self.state.player_position.y);
        self.cast.player.position = self.state.player_position;
    }

    /// Start a conversation by script id. Returns false if it cannot start.
    pub fn start_cinematic(&mut self, script_id: &str, now: Millis) -> bool {
        if let Some(current) = &self.cinematic {
            log::warn!(
                "Cinematic '{}' requested while '{}' is playing",
                script_id,
                current.script_id
            );
            return false;
        }

        let script = match self.sector.script(script_id) {
            Some(script) => script,
            None => {
                log::warn!("Unknown cinematic script '{}'", script_id);
                return false;
            }
        };

        let speakers = Speakers::new(self.config.player.name.clone(), script.counterpart.clone());
        let cinematic = CinematicState::start(
            script,
            speakers,
            &self.cast,
            &self.camera,
            now,
            &self.config.cinematic,
            &self.host,
        );
        self.cinematic = Some(cinematic);
        true
    }

    pub fn state(&self) -> &MissionRuntimeState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn mode(&self) -> MissionMode {
        self.mode
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    pub fn cinematic(&self) -> Option<&CinematicState> {
        self.cinematic.as_ref()
    }

    pub fn outcome(&self) -> Option<MissionOutcome> {
        self.state.outcome
    }

    /// Timers still waiting (mission tasks plus delayed trigger actions)
    pub fn pending_timers(&self) -> usize {
        self.tasks.len() + self.engine.pending_count()
    }

    fn run_due_tasks(&mut self, now: Millis) {
        for task in self.tasks.drain_due(now) {
            match task {
                MissionTask::EndBossIntro => {
                    self.state.boss_intro = false;
                    log::info!("Boss intro finished");
                }
                MissionTask::ExitTrigger(name) => self.handle_event(&name, now),
                MissionTask::DeathSequenceDone => self.state.death_sequence_done = true,
                MissionTask::VictoryGrace => self.state.victory_ready = true,
            }
        }

        let mut queue = FiredQueue::default();
        if self.engine.pump(now, &mut queue) > 0 {
            self.apply_fired(queue, now);
        }
    }

    fn tick_boss_intro(&mut self, now: Millis, delta: Millis) {
        if let Some(boss) = &self.sector.boss {
            let focus = boss.position.to_vec3(0.0);
            self.camera.approach(
                focus + self.config.camera.boss_intro_offset,
                focus,
                self.config.camera.follow_lerp,
            );
        }
        self.host
            .animate(&self.cast.player.name, &PoseFlags::idle(), now, delta);
        self.render(now, None);
    }

    fn tick_dead(&mut self, now: Millis, delta: Millis) {
        let pose = PoseFlags {
            is_dead: true,
            ..PoseFlags::default()
        };
        self.host.animate(&self.cast.player.name, &pose, now, delta);
        self.render(now, None);

        if self.state.death_sequence_done && self.state.outcome.is_none() {
            self.conclude(MissionOutcome::Died, now);
        }
    }

    fn tick_concluding(&mut self, now: Millis) {
        let outcome = if self.state.victory_ready {
            MissionOutcome::Victory
        } else {
            MissionOutcome::Aborted
        };
        self.conclude(outcome, now);
    }

    fn tick_cinematic(&mut self, now: Millis, delta: Millis) -> CinematicTick {
        let cinematic = match self.cinematic.as_mut() {
            Some(cinematic) => cinematic,
            None => return CinematicTick::Idle,
        };

        let mut relay = HookRelay {
            host: &mut self.host,
            events: Vec::new(),
        };
        let tick = self.sequencer.advance(
            cinematic,
            &mut self.camera,
            &self.cast,
            now,
            delta,
            self.frame,
            &mut relay,
        );
        let events = relay.events;

        for event in &events {
            self.handle_event(event, now);
        }

        let mut bubble = None;
        match &tick {
            CinematicTick::Finished { exit_trigger } => {
                self.cinematic = None;
                if let Some(trigger) = exit_trigger {
                    log::debug!(
                        "Exit trigger '{}' in {:.0}ms",
                        trigger,
                        self.config.timing.cinematic_exit_delay
                    );
                    self.tasks.schedule_after(
                        now,
                        self.config.timing.cinematic_exit_delay,
                        MissionTask::ExitTrigger(trigger.clone()),
                    );
                }
            }
            CinematicTick::Playing { bubble: placement, .. } => bubble = *placement,
            _ => {}
        }

        self.render(now, bubble);
        tick
    }

    fn tick_normal(&mut self, now: Millis, delta: Millis, input: MoveInput) -> Option<EvaluationSummary> {
        // Movement
        let player = &self.config.player;
        let moving = input.is_moving();
        let sprinting = self.state.vitals.update_stamina(
            input.sprint && moving,
            delta,
            player.stamina_drain,
            player.stamina_regen,
        );
        let speed = if sprinting { player.run_speed } else { player.walk_speed };
        let ground = movement::step(self.state.player_ground(), input.direction, speed, delta);
        let ground = movement::resolve_obstacles(ground, player.radius, &self.state.obstacles);
        self.place_player(ground);

        // Combat
        let report = self.host.step_world(&WorldStep {
            now,
            delta,
            player_position: self.state.player_position,
            player_moving: moving,
        });
        self.apply_world_report(report, now);
        if self.state.is_dead || self.state.boss_intro {
            self.render(now, None);
            return None;
        }

        // Triggers
        self.state.prune_dismissed();
        let mut queue = FiredQueue::default();
        let summary = self.engine.evaluate(
            self.state.player_position,
            &mut self.state.triggers,
            now,
            &self.host,
            &mut queue,
        );
        self.apply_fired(queue, now);

        // Clues
        if let Some(clue) = self.state.collect_clue() {
            let text = self.host.translate(&clue.content);
            log::info!("Clue '{}' collected", clue.id);
            self.host.play("clue_pickup");
            self.host.show_clue(&clue, &text);
        }

        // Environment and FX
        self.state.camera_fx.expire(now);
        self.follow_camera(now);

        let pose = PoseFlags {
            is_moving: moving,
            is_running: sprinting,
            is_speaking: self.state.is_speaking(now),
            is_thinking: self.state.is_thinking(now),
            is_dead: false,
        };
        self.host.animate(&self.cast.player.name, &pose, now, delta);
        self.render(now, None);

        Some(summary)
    }

    fn apply_world_report(&mut self, report: WorldReport, now: Millis) {
        self.state.counters.kills += report.kills;
        self.state.counters.damage_dealt += report.damage_dealt;
        self.state.enemies = report.enemies;

        if report.damage_to_player > 0.0 {
            let amount = report.damage_to_player;
            match self
                .state
                .vitals
                .apply_damage(amount, now, self.config.player.invulnerability)
            {
                DamageOutcome::Hit { remaining } => {
                    self.state.counters.damage_taken += amount;
                    log::debug!("Player hit for {:.1}, {:.1} HP left", amount, remaining);
                    self.host.play("player_hit");
                }
                DamageOutcome::Killed => {
                    self.state.counters.damage_taken += amount;
                    self.on_player_death(now);
                }
                DamageOutcome::Ignored => {}
            }
        }

        if report.boss_defeated && self.state.boss_spawned && !self.state.boss_defeated {
            self.state.boss_defeated = true;
            log::info!("Boss defeated, victory in {:.0}ms", self.config.timing.boss_defeat_grace);
            self.host.play("boss_defeated");
            self.tasks
                .schedule_after(now, self.config.timing.boss_defeat_grace, MissionTask::VictoryGrace);
        }

        let threshold = self.sector.boss.as_ref().and_then(|boss| boss.kill_threshold);
        if let Some(threshold) = threshold {
            if !self.state.boss_spawned && self.state.counters.kills >= threshold {
                self.spawn_boss(now);
            }
        }
    }

    fn on_player_death(&mut self, now: Millis) {
        self.state.is_dead = true;
        log::info!("Player died at {:.0}ms", now);
        self.host.play("player_death");
        self.tasks
            .schedule_after(now, self.config.timing.death_delay, MissionTask::DeathSequenceDone);
    }

    fn spawn_boss(&mut self, now: Millis) {
        if self.state.boss_spawned {
            return;
        }
        let boss = match &self.sector.boss {
            Some(boss) => boss,
            None => {
                log::warn!("Sector '{}' has no boss to spawn", self.sector.id);
                return;
            }
        };

        self.state.boss_spawned = true;
        self.state.boss_intro = true;
        log::info!("Boss '{}' spawned, intro until {:.0}ms", boss.enemy_type, now + self.config.timing.boss_intro);
        self.host.spawn_boss(boss);
        self.host.play("boss_intro");
        self.tasks
            .schedule_after(now, self.config.timing.boss_intro, MissionTask::EndBossIntro);
    }

    fn handle_event(&mut self, name: &str, now: Millis) {
        self.host.script_event(name);
        if name == BOSS_START_EVENT {
            self.spawn_boss(now);
        }
    }

    fn apply_fired(&mut self, queue: FiredQueue, now: Millis) {
        for fired in queue.fired {
            match fired {
                Fired::Action(trigger_id, effect) => self.apply_effect(&trigger_id, effect, now),
                Fired::Narrative(event) => self.present(event, now),
            }
        }
    }

    fn apply_effect(&mut self, trigger_id: &str, effect: ActionEffect, now: Millis) {
        match effect {
            ActionEffect::PlaySound { sound } => self.host.play(&sound),
            ActionEffect::GiveReward { xp, sp } => {
                log::info!("Trigger '{}' rewards {} XP, {} SP", trigger_id, xp, sp);
                self.state.gain_xp(xp, sp);
                self.host.gain_xp(xp, sp);
            }
            ActionEffect::CameraShake { intensity, duration } => {
                self.state.camera_fx.shake(intensity, duration, now)
            }
            ActionEffect::CameraPan { target, duration } => {
                self.state.camera_fx.pan(target, duration, now)
            }
            ActionEffect::StartCinematic { script } => {
                self.start_cinematic(&script, now);
            }
            ActionEffect::OpenUi { screen } => self.open_interaction(trigger_id, &screen),
            other => self.host.world_effect(trigger_id, &other),
        }
    }

    fn open_interaction(&mut self, trigger_id: &str, screen: &str) {
        if self.state.interaction_open {
            return;
        }
        if self.state.dismissed_interactions.iter().any(|id| id == trigger_id) {
            return;
        }
        self.state.interaction_open = true;
        self.state.interaction_source = Some(trigger_id.to_string());
        log::debug!("Trigger '{}' opened '{}'", trigger_id, screen);
        self.host.open_ui(screen);
    }

    fn present(&mut self, event: NarrativeEvent, now: Millis) {
        self.host.play(event.audio_cue());
        if event.is_speech() {
            self.state.speech_until = now + event.duration;
        } else {
            self.state.thinking_until = now + event.duration;
        }
        self.host.narrate(&event);
    }

    fn follow_camera(&mut self, now: Millis) {
        let fx = &self.state.camera_fx;
        let focus = fx
            .pan_target(now)
            .unwrap_or_else(|| self.state.player_ground())
            .to_vec3(0.0);
        let shake = fx.shake_offset(now);
        let camera = &self.config.camera;
        self.camera
            .approach(focus + camera.follow_offset + shake, focus + shake, camera.follow_lerp);
    }

    fn render(&mut self, now: Millis, bubble: Option<BubblePlacement>) {
        let view = FrameView {
            mode: self.mode,
            now,
            frame: self.frame,
            camera: &self.camera,
            player_position: self.state.player_position,
            vitals: &self.state.vitals,
            bubble,
        };
        self.host.render(&view);
    }

    fn cancel_timers(&mut self) -> usize {
        self.tasks.cancel_all() + self.engine.cancel_pending()
    }

    fn conclude(&mut self, outcome: MissionOutcome, now: Millis) {
        self.state.outcome = Some(outcome);
        self.state.running = false;
        self.cinematic = None;
        let cancelled = self.cancel_timers();

        let report = self.state.report(outcome, now);
        log::info!(
            "Mission '{}' concluded: {:?} ({} kills, {} XP, {} pending task(s) dropped)",
            self.sector.id,
            outcome,
            report.counters.kills,
            report.counters.xp,
            cancelled
        );
        self.host.mission_concluded(&report);
    }
}
