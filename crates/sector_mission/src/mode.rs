//! Mission modes
//!
//! Exactly one mode owns each tick. Modes are checked in priority order and
//! the first match wins, so a boss intro cannot be interrupted by a death in
//! the same tick and triggers never run while a cinematic owns the camera.

use crate::state::MissionRuntimeState;
use std::fmt;

/// Mode owning the current tick, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionMode {
    /// Camera locked on the boss after it first spawns
    BossIntro,
    /// Player death sequence
    Dead,
    /// Victory grace elapsed or end requested; the mission wraps up
    Concluding,
    /// Paused or not running; nothing happens, not even rendering
    Paused,
    /// A conversation owns the camera
    Cinematic,
    /// UI or clue open: the world is drawn but frozen
    InteractionPaused,
    /// Movement, combat, triggers, environment and FX
    Normal,
}

impl MissionMode {
    /// Pick the mode for this tick. A concluded mission stays paused.
    pub fn resolve(state: &MissionRuntimeState, cinematic_active: bool) -> Self {
        if state.outcome.is_some() {
            Self::Paused
        } else if state.boss_intro {
            Self::BossIntro
        } else if state.is_dead {
            Self::Dead
        } else if state.outcome.is_none() && (state.victory_ready || state.end_requested) {
            Self::Concluding
        } else if state.paused || !state.running {
            Self::Paused
        } else if cinematic_active {
            Self::Cinematic
        } else if state.interaction_open || state.clue_open.is_some() {
            Self::InteractionPaused
        } else {
            Self::Normal
        }
    }

    /// Whether the world simulation (movement, combat, triggers) runs
    pub fn simulates(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Whether a frame is drawn
    pub fn renders(&self) -> bool {
        !matches!(self, Self::Paused | Self::Concluding)
    }
}

impl fmt::Display for MissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BossIntro => write!(f, "boss_intro"),
            Self::Dead => write!(f, "dead"),
            Self::Concluding => write!(f, "concluding"),
            Self::Paused => write!(f, "paused"),
            Self::Cinematic => write!(f, "cinematic"),
            Self::InteractionPaused => write!(f, "interaction_paused"),
            Self::Normal => write!(f, "normal"),
        }
    }
}
