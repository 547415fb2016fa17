//! Per-tick dialogue sequencing

use crate::actor::Cast;
use crate::bubble::{BubbleLayout, BubblePlacement};
use crate::camera::Camera;
use crate::state::CinematicState;
use sector_core::{Animator, Millis, PoseFlags, SoundSink};
use serde::{Deserialize, Serialize};

/// Sequencer tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Exponential smoothing factor applied to the camera every tick
    pub camera_lerp: f32,
    /// Dolly-in duration in milliseconds
    pub zoom_duration: Millis,
    /// Voice blip every N frames while a line types out
    pub speech_tick_frames: u64,
    /// Speech bubble safe band
    pub bubble: BubbleLayout,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            camera_lerp: 0.05,
            zoom_duration: 5000.0,
            speech_tick_frames: 4,
            bubble: BubbleLayout::default(),
        }
    }
}

/// Collaborators the sequencer drives
pub trait CinematicHooks: SoundSink + Animator {
    /// Inline event named by a script line, fired when the line ends
    fn script_event(&mut self, name: &str);
}

/// Result of one sequencer tick
#[derive(Debug, Clone, PartialEq)]
pub enum CinematicTick {
    /// No conversation is running
    Idle,
    /// A line is on screen
    Playing {
        line_index: usize,
        /// Resolved speaker, `None` if nobody in the scene matched
        speaker: Option<String>,
        bubble: Option<BubblePlacement>,
        /// Characters typed so far
        visible_chars: usize,
    },
    /// The previous line ended and `line_index` begins this tick
    Advanced { line_index: usize },
    /// The script is exhausted
    Finished { exit_trigger: Option<String> },
}

/// Advances conversations
#[derive(Debug, Clone, Default)]
pub struct CinematicSequencer {
    config: SequencerConfig,
}

impl CinematicSequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Advance `cinematic` to `now`
    #[allow(clippy::too_many_arguments)]
    pub fn advance(
        &self,
        cinematic: &mut CinematicState,
        camera: &mut Camera,
        cast: &Cast,
        now: Millis,
        delta: Millis,
        frame: u64,
        hooks: &mut dyn CinematicHooks,
    ) -> CinematicTick {
        if !cinematic.active {
            return CinematicTick::Idle;
        }

        self.update_camera(cinematic, camera, now);

        let line = match cinematic.current_line() {
            Some(line) => line.clone(),
            None => {
                return CinematicTick::Finished {
                    exit_trigger: cinematic.finish(),
                }
            }
        };

        let elapsed = cinematic.line_elapsed(now);
        let typing = cinematic.is_typing(now);
        let speaker = cast.resolve_speaker(&line.speaker, &cinematic.speakers);

        if typing && self.config.speech_tick_frames > 0 && frame % self.config.speech_tick_frames == 0 {
            hooks.play_voice(speaker.map(|actor| actor.name.as_str()).unwrap_or(&line.speaker));
        }

        for actor in cast.iter() {
            let is_speaker = speaker.map(|s| s.name == actor.name).unwrap_or(false);
            hooks.animate(&actor.name, &PoseFlags::speaking(is_speaker && typing), now, delta);
        }

        if elapsed > cinematic.line_duration && !cinematic.fading_out {
            cinematic.fading_out = true;
            for event in line.events() {
                log::debug!("Cinematic '{}' event '{}'", cinematic.script_id, event);
                hooks.script_event(event);
            }

            let next = cinematic.line_index + 1;
            if next < cinematic.script.len() {
                cinematic.begin_line(next, now);
                log::debug!("Cinematic '{}' line {}", cinematic.script_id, next);
                return CinematicTick::Advanced { line_index: next };
            }
            return CinematicTick::Finished {
                exit_trigger: cinematic.finish(),
            };
        }

        let total_chars = line.text.chars().count();
        let typed = (elapsed.max(0.0) / crate::script::TYPING_MS_PER_CHAR) as usize;

        CinematicTick::Playing {
            line_index: cinematic.line_index,
            speaker: speaker.map(|actor| actor.name.clone()),
            bubble: speaker.map(|actor| self.config.bubble.place(&*camera, actor)),
            visible_chars: typed.min(total_chars),
        }
    }

    fn update_camera(&self, cinematic: &CinematicState, camera: &mut Camera, now: Millis) {
        let (position, look_at) = match cinematic.custom_camera {
            Some(shot) => (shot.position, shot.look_at),
            None => (cinematic.camera_target(now), cinematic.camera_look_at),
        };
        camera.approach(position, look_at, self.config.camera_lerp);
    }
}
