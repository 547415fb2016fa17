//! Collaborator traits
//!
//! The mission runtime never renders, plays audio or owns text tables. Hosts
//! implement these traits and pass them in when a session is built.

use crate::Millis;

/// Resolves a text key into user-visible text
pub trait Localizer {
    fn translate(&self, key: &str) -> String;
}

impl<F> Localizer for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// Localizer that returns keys untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyLocalizer;

impl Localizer for KeyLocalizer {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Fire-and-forget sound dispatch keyed by symbolic name
pub trait SoundSink {
    /// Play a one-shot cue
    fn play(&mut self, cue: &str);
    /// Play a short voice blip for a speaker
    fn play_voice(&mut self, speaker: &str);
}

/// Per-tick pose flags handed to the animator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoseFlags {
    pub is_moving: bool,
    pub is_running: bool,
    pub is_speaking: bool,
    pub is_thinking: bool,
    pub is_dead: bool,
}

impl PoseFlags {
    /// Idle pose
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn speaking(is_speaking: bool) -> Self {
        Self {
            is_speaking,
            ..Self::default()
        }
    }
}

/// Applies poses to named actors
pub trait Animator {
    fn animate(&mut self, actor: &str, pose: &PoseFlags, now: Millis, delta: Millis);
}
