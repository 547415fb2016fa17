//! Host collaborators of the mission loop
//!
//! The host renders, runs enemies and projectiles, plays audio and shows UI.
//! The loop calls into it through [`MissionHost`] and never the other way
//! round.

use crate::definition::{BossDefinition, ClueDefinition};
use crate::mode::MissionMode;
use crate::state::{EnemySnapshot, MissionReport};
use crate::vitals::PlayerVitals;
use sector_cinematic::{BubblePlacement, Camera, CinematicHooks};
use sector_core::{Localizer, Millis};
use sector_math::Vec3;
use sector_triggers::{ActionEffect, NarrativeEvent};

/// Input to one world simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldStep {
    pub now: Millis,
    pub delta: Millis,
    pub player_position: Vec3,
    pub player_moving: bool,
}

/// What the world did during a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldReport {
    /// Enemies killed this step
    pub kills: u32,
    /// Damage the player dealt this step
    pub damage_dealt: f32,
    /// Damage enemies dealt to the player this step
    pub damage_to_player: f32,
    /// Living enemies after the step
    pub enemies: Vec<EnemySnapshot>,
    /// The boss died this step
    pub boss_defeated: bool,
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub mode: MissionMode,
    pub now: Millis,
    pub frame: u64,
    pub camera: &'a Camera,
    pub player_position: Vec3,
    pub vitals: &'a PlayerVitals,
    /// Speech bubble of the active conversation line
    pub bubble: Option<BubblePlacement>,
}

/// Everything the mission loop needs from its environment
pub trait MissionHost: CinematicHooks + Localizer {
    /// Draw a frame. Called in every mode that renders.
    fn render(&mut self, frame: &FrameView<'_>);

    /// Advance enemies, projectiles and combat. Called in normal mode only.
    fn step_world(&mut self, step: &WorldStep) -> WorldReport;

    /// World-facing trigger effect (spawn, unlock, wave, text)
    fn world_effect(&mut self, trigger_id: &str, effect: &ActionEffect);

    /// Present narrative text from a trigger
    fn narrate(&mut self, event: &NarrativeEvent);

    /// Open a UI screen; the world freezes until it is closed
    fn open_ui(&mut self, screen: &str);

    /// Show a clue that was just picked up
    fn show_clue(&mut self, clue: &ClueDefinition, text: &str);

    /// Put the boss into the world
    fn spawn_boss(&mut self, boss: &BossDefinition);

    /// Experience and skill points granted by a trigger
    fn gain_xp(&mut self, _xp: u32, _sp: u32) {}

    /// The mission is over
    fn mission_concluded(&mut self, report: &MissionReport);
}
