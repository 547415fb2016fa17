//! Dialogue scripts

use crate::camera::CameraShot;
use sector_core::Millis;
use sector_math::Vec3;
use serde::{Deserialize, Serialize};

/// Typing time per character of a line
pub const TYPING_MS_PER_CHAR: Millis = 30.0;
/// Reading time added after a line has fully typed out
pub const READING_BUFFER: Millis = 2000.0;

/// One line of dialogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptLine {
    /// Speaker name, matched case-insensitively against the cast
    pub speaker: String,
    /// Text, or a localization key before the script is started
    pub text: String,
    /// Comma-separated events fired when the line ends
    #[serde(default)]
    pub trigger: Option<String>,
    /// Fixed camera shot for this line instead of the orbit
    #[serde(default)]
    pub camera: Option<CameraShot>,
}

impl ScriptLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            trigger: None,
            camera: None,
        }
    }

    /// Set events fired when the line ends
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Set a fixed camera shot
    pub fn with_camera(mut self, shot: CameraShot) -> Self {
        self.camera = Some(shot);
        self
    }

    /// Time for the text to type out
    pub fn typing_duration(&self) -> Millis {
        typing_duration(&self.text)
    }

    /// Total time the line stays up
    pub fn duration(&self) -> Millis {
        line_duration(&self.text)
    }

    /// Event names from the inline trigger, in order
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.trigger
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Typing time for `text`
pub fn typing_duration(text: &str) -> Millis {
    text.chars().count() as Millis * TYPING_MS_PER_CHAR
}

/// Full display time for `text`
pub fn line_duration(text: &str) -> Millis {
    typing_duration(text) + READING_BUFFER
}

/// Camera framing for a conversation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Framing {
    /// Camera offset from the speakers' midpoint at the start
    pub offset: Vec3,
    /// Orbit speed in radians per millisecond
    #[serde(default)]
    pub rotation_speed: f32,
    /// Fraction of the offset removed by the dolly-in (0 = none)
    #[serde(default)]
    pub zoom: f32,
}

impl Default for Framing {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 2.5, 7.0),
            rotation_speed: 0.0,
            zoom: 0.0,
        }
    }
}

/// A complete conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Script id referenced by START_CINEMATIC actions
    pub id: String,
    /// Second speaker slot; lines naming other roster members reuse it
    pub counterpart: String,
    /// Lines in playback order
    pub lines: Vec<ScriptLine>,
    /// Event fired after the conversation ends (e.g. `boss_start`)
    #[serde(default)]
    pub exit_trigger: Option<String>,
    /// Camera framing, defaults when absent
    #[serde(default)]
    pub framing: Option<Framing>,
}

impl Script {
    pub fn new(id: impl Into<String>, counterpart: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            counterpart: counterpart.into(),
            lines: Vec::new(),
            exit_trigger: None,
            framing: None,
        }
    }

    /// Append a line
    pub fn with_line(mut self, line: ScriptLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Set the exit trigger
    pub fn with_exit_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.exit_trigger = Some(trigger.into());
        self
    }

    /// Set camera framing
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = Some(framing);
        self
    }
}
