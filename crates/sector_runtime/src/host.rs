//! Logging host
//!
//! Implements every collaborator the mission loop needs without a window or
//! audio device. Sounds, poses and UI requests become log lines; enemies run
//! in a [`HeadlessWorld`].

use crate::world::HeadlessWorld;
use sector_cinematic::CinematicHooks;
use sector_core::{Animator, Localizer, Millis, PoseFlags, SoundSink};
use sector_math::Vec2;
use sector_mission::{
    BossDefinition, ClueDefinition, FrameView, MissionHost, MissionMode, MissionReport,
    WorldReport, WorldStep,
};
use sector_triggers::{ActionEffect, NarrativeEvent};
use std::collections::HashMap;
use std::path::Path;

/// Enemy type used for waves
const WAVE_ENEMY: &str = "WALKER";
/// Waves come in from this far away
const WAVE_DISTANCE: f32 = 12.0;

/// Load a flat `{ "key": "text" }` string table
pub fn load_strings(path: impl AsRef<Path>) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub struct HeadlessHost {
    strings: HashMap<String, String>,
    world: HeadlessWorld,
    poses: HashMap<String, PoseFlags>,
    player_position: Vec2,
    last_mode: Option<MissionMode>,
    frames: u64,
    report: Option<MissionReport>,
}

impl HeadlessHost {
    pub fn new(strings: HashMap<String, String>) -> Self {
        Self {
            strings,
            world: HeadlessWorld::new(),
            poses: HashMap::new(),
            player_position: Vec2::ZERO,
            last_mode: None,
            frames: 0,
            report: None,
        }
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn report(&self) -> Option<&MissionReport> {
        self.report.as_ref()
    }
}

impl SoundSink for HeadlessHost {
    fn play(&mut self, cue: &str) {
        log::debug!("sound: {}", cue);
    }

    fn play_voice(&mut self, speaker: &str) {
        log::trace!("voice blip: {}", speaker);
    }
}

impl Animator for HeadlessHost {
    fn animate(&mut self, actor: &str, pose: &PoseFlags, _now: Millis, _delta: Millis) {
        let previous = self.poses.insert(actor.to_string(), *pose);
        if previous.as_ref() != Some(pose) {
            log::trace!("{} pose {:?}", actor, pose);
        }
    }
}

impl CinematicHooks for HeadlessHost {
    fn script_event(&mut self, name: &str) {
        log::info!("Script event '{}'", name);
    }
}

impl Localizer for HeadlessHost {
    fn translate(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl MissionHost for HeadlessHost {
    fn render(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        if self.last_mode != Some(frame.mode) {
            self.last_mode = Some(frame.mode);
            log::info!(
                "[{:>7.0}ms] {} | player ({:.1}, {:.1}) HP {:.0}",
                frame.now,
                frame.mode,
                frame.player_position.x,
                frame.player_position.z,
                frame.vitals.hp
            );
        }
        if let Some(bubble) = frame.bubble {
            log::trace!("bubble at ({:.0}, {:.0}) tail {:?}", bubble.x, bubble.y, bubble.tail);
        }
    }

    fn step_world(&mut self, step: &WorldStep) -> WorldReport {
        self.player_position = step.player_position.xz();
        self.world.step(step)
    }

    fn world_effect(&mut self, trigger_id: &str, effect: &ActionEffect) {
        match effect {
            ActionEffect::SpawnEnemy {
                enemy_type,
                count,
                position,
            } => {
                let center = position.unwrap_or(self.player_position + Vec2::new(0.0, -WAVE_DISTANCE));
                self.world.spawn(enemy_type, *count, center);
            }
            ActionEffect::StartWave { count } => {
                let center = self.player_position + Vec2::new(WAVE_DISTANCE, 0.0);
                self.world.spawn(WAVE_ENEMY, *count, center);
            }
            ActionEffect::ShowText { text, .. } => {
                log::info!("TEXT: {}", self.translate(text));
            }
            ActionEffect::UnlockObject { object_id } => {
                log::info!("Trigger '{}' unlocked '{}'", trigger_id, object_id);
            }
            other => log::debug!("Trigger '{}' effect {:?}", trigger_id, other.kind()),
        }
    }

    fn narrate(&mut self, event: &NarrativeEvent) {
        let who = if event.is_speech() { "SAYS" } else { "NOTE" };
        log::info!("{}: {} ({:.0}ms)", who, event.text, event.duration);
    }

    fn open_ui(&mut self, screen: &str) {
        log::info!("UI '{}' opened", screen);
    }

    fn show_clue(&mut self, clue: &ClueDefinition, text: &str) {
        log::info!("CLUE '{}': {}", clue.id, text);
    }

    fn spawn_boss(&mut self, boss: &BossDefinition) {
        self.world.spawn_boss(&boss.enemy_type, boss.position);
    }

    fn gain_xp(&mut self, xp: u32, sp: u32) {
        log::info!("+{} XP, +{} SP", xp, sp);
    }

    fn mission_concluded(&mut self, report: &MissionReport) {
        self.report = Some(report.clone());
    }
}
