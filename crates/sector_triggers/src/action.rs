//! Trigger actions and narrative events

use crate::trigger::TriggerKind;
use sector_core::Millis;
use sector_math::Vec2;
use serde::{Deserialize, Serialize};

/// Base display time for narrative text
pub const NARRATIVE_BASE_DURATION: Millis = 2000.0;
/// Extra display time per character of narrative text
pub const NARRATIVE_PER_CHAR_DURATION: Millis = 50.0;

fn default_count() -> u32 {
    1
}

fn default_shake_duration() -> Millis {
    500.0
}

/// Effect carried by a trigger action
///
/// The `type` tag is closed: a sector file naming any other action type fails
/// to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionEffect {
    /// Show a line of on-screen text
    ShowText {
        text: String,
        #[serde(default)]
        duration: Option<Millis>,
    },
    /// Play a one-shot sound cue
    PlaySound { sound: String },
    /// Spawn enemies
    SpawnEnemy {
        enemy_type: String,
        #[serde(default = "default_count")]
        count: u32,
        #[serde(default)]
        position: Option<Vec2>,
    },
    /// Unlock a door, crate or similar world object
    UnlockObject { object_id: String },
    /// Grant experience and skill points
    GiveReward {
        #[serde(default)]
        xp: u32,
        #[serde(default)]
        sp: u32,
    },
    /// Shake the camera
    CameraShake {
        intensity: f32,
        #[serde(default = "default_shake_duration")]
        duration: Millis,
    },
    /// Pan the camera toward a ground point
    CameraPan { target: Vec2, duration: Millis },
    /// Start an enemy wave
    StartWave {
        #[serde(default = "default_count")]
        count: u32,
    },
    /// Start a scripted conversation
    StartCinematic { script: String },
    /// Open a UI screen; re-sent every tick while inside a reset-on-exit zone
    OpenUi { screen: String },
}

/// Fieldless tag of an [`ActionEffect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ShowText,
    PlaySound,
    SpawnEnemy,
    UnlockObject,
    GiveReward,
    CameraShake,
    CameraPan,
    StartWave,
    StartCinematic,
    OpenUi,
}

impl ActionEffect {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::ShowText { .. } => ActionKind::ShowText,
            Self::PlaySound { .. } => ActionKind::PlaySound,
            Self::SpawnEnemy { .. } => ActionKind::SpawnEnemy,
            Self::UnlockObject { .. } => ActionKind::UnlockObject,
            Self::GiveReward { .. } => ActionKind::GiveReward,
            Self::CameraShake { .. } => ActionKind::CameraShake,
            Self::CameraPan { .. } => ActionKind::CameraPan,
            Self::StartWave { .. } => ActionKind::StartWave,
            Self::StartCinematic { .. } => ActionKind::StartCinematic,
            Self::OpenUi { .. } => ActionKind::OpenUi,
        }
    }
}

impl ActionKind {
    /// Actions re-executed on every tick the player stays inside a
    /// reset-on-exit zone. Everything else fires once per entry.
    pub fn refreshes_while_inside(&self) -> bool {
        matches!(self, Self::OpenUi)
    }
}

/// An action attached to a trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerAction {
    #[serde(flatten)]
    pub effect: ActionEffect,
    /// Delay before the effect is dispatched (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<Millis>,
}

impl TriggerAction {
    /// Create an action dispatched on entry
    pub fn new(effect: ActionEffect) -> Self {
        Self { effect, delay: None }
    }

    /// Create an action dispatched `delay` ms after entry
    pub fn delayed(effect: ActionEffect, delay: Millis) -> Self {
        Self {
            effect,
            delay: Some(delay),
        }
    }

    /// Delay to schedule with, if any
    pub fn effective_delay(&self) -> Option<Millis> {
        self.delay.filter(|delay| *delay > 0.0)
    }
}

impl From<ActionEffect> for TriggerAction {
    fn from(effect: ActionEffect) -> Self {
        Self::new(effect)
    }
}

/// Narrative text emitted when a trigger with content is entered
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeEvent {
    /// Trigger that produced the text
    pub trigger_id: String,
    /// Speech bubble or generic narrative
    pub kind: TriggerKind,
    /// Localized text
    pub text: String,
    /// Display time in milliseconds
    pub duration: Millis,
}

impl NarrativeEvent {
    pub fn new(trigger_id: impl Into<String>, kind: TriggerKind, text: String) -> Self {
        let duration = Self::display_duration(&text);
        Self {
            trigger_id: trigger_id.into(),
            kind,
            text,
            duration,
        }
    }

    /// Read-speed display time for a piece of text
    pub fn display_duration(text: &str) -> Millis {
        NARRATIVE_BASE_DURATION + text.chars().count() as Millis * NARRATIVE_PER_CHAR_DURATION
    }

    /// Whether this is spoken by the player (speech bubble)
    pub fn is_speech(&self) -> bool {
        self.kind == TriggerKind::Speech
    }

    /// Sound cue to play alongside the text
    pub fn audio_cue(&self) -> &'static str {
        self.kind.audio_cue()
    }
}
