//! Per-conversation state

use crate::actor::{Cast, Speakers};
use crate::camera::{Camera, CameraShot};
use crate::script::{Script, ScriptLine};
use crate::sequencer::SequencerConfig;
use sector_core::{Localizer, Millis};
use sector_math::Vec3;

/// Height of the look target above the speakers' feet
const LOOK_HEIGHT: f32 = 1.5;

/// State of one running conversation
#[derive(Debug, Clone, PartialEq)]
pub struct CinematicState {
    pub active: bool,
    pub script_id: String,
    /// Lines with text already localized
    pub script: Vec<ScriptLine>,
    pub line_index: usize,
    pub line_start_time: Millis,
    pub line_duration: Millis,
    pub typing_duration: Millis,
    pub start_time: Millis,
    pub speakers: Speakers,
    /// Camera position when the conversation started
    pub camera_base_pos: Vec3,
    /// Fixed look target for the orbit
    pub camera_look_at: Vec3,
    /// Midpoint between player and counterpart
    pub mid_point: Vec3,
    /// Orbit offset from the midpoint before rotation and zoom
    pub relative_offset: Vec3,
    /// Radians per millisecond
    pub rotation_speed: f32,
    pub zoom: f32,
    /// Milliseconds for the dolly-in to complete
    pub zoom_duration: Millis,
    /// Set on the tick the current line ends
    pub fading_out: bool,
    /// Shot overriding the orbit for the current line
    pub custom_camera: Option<CameraShot>,
    /// Event to fire after the conversation ends
    pub exit_trigger: Option<String>,
}

impl CinematicState {
    /// Begin a conversation at `now`
    pub fn start(
        script: &Script,
        speakers: Speakers,
        cast: &Cast,
        camera: &Camera,
        now: Millis,
        config: &SequencerConfig,
        localizer: &dyn Localizer,
    ) -> Self {
        let framing = script.framing.unwrap_or_default();

        let player_pos = cast.player.position;
        let mid_point = match cast.member(&speakers.counterpart) {
            Some(counterpart) => (player_pos + counterpart.position) * 0.5,
            None => {
                log::warn!(
                    "Cinematic '{}' counterpart '{}' not in scene, framing the player",
                    script.id,
                    speakers.counterpart
                );
                player_pos
            }
        };

        let lines: Vec<ScriptLine> = script
            .lines
            .iter()
            .map(|line| ScriptLine {
                text: localizer.translate(&line.text),
                ..line.clone()
            })
            .collect();

        log::info!("Cinematic '{}' started ({} lines)", script.id, lines.len());

        let mut state = Self {
            active: true,
            script_id: script.id.clone(),
            script: lines,
            line_index: 0,
            line_start_time: now,
            line_duration: 0.0,
            typing_duration: 0.0,
            start_time: now,
            speakers,
            camera_base_pos: camera.position,
            camera_look_at: mid_point + Vec3::new(0.0, LOOK_HEIGHT, 0.0),
            mid_point,
            relative_offset: framing.offset,
            rotation_speed: framing.rotation_speed,
            zoom: framing.zoom,
            zoom_duration: config.zoom_duration,
            fading_out: false,
            custom_camera: None,
            exit_trigger: script.exit_trigger.clone(),
        };
        state.begin_line(0, now);
        state
    }

    /// Line being shown, `None` once the script is exhausted
    pub fn current_line(&self) -> Option<&ScriptLine> {
        if self.active {
            self.script.get(self.line_index)
        } else {
            None
        }
    }

    /// Make `index` the current line starting at `now`
    pub fn begin_line(&mut self, index: usize, now: Millis) {
        self.line_index = index;
        self.line_start_time = now;
        self.fading_out = false;
        match self.script.get(index) {
            Some(line) => {
                self.typing_duration = line.typing_duration();
                self.line_duration = line.duration();
                self.custom_camera = line.camera;
            }
            None => {
                self.typing_duration = 0.0;
                self.line_duration = 0.0;
                self.custom_camera = None;
            }
        }
    }

    /// Milliseconds since the current line started
    pub fn line_elapsed(&self, now: Millis) -> Millis {
        now - self.line_start_time
    }

    /// Whether the current line is still typing out
    pub fn is_typing(&self, now: Millis) -> bool {
        self.line_elapsed(now) < self.typing_duration
    }

    /// Orbit camera position at `now`
    pub fn camera_target(&self, now: Millis) -> Vec3 {
        let elapsed = (now - self.start_time).max(0.0);

        let mut offset = self.relative_offset;
        if self.rotation_speed > 0.0 {
            offset = offset.rotate_y(elapsed as f32 * self.rotation_speed);
        }

        let progress = if self.zoom_duration > 0.0 {
            (elapsed / self.zoom_duration).min(1.0) as f32
        } else {
            1.0
        };
        let zoom_factor = 1.0 - progress * self.zoom;

        self.mid_point + offset * zoom_factor
    }

    /// Move the line and orbit clocks forward by time spent paused
    pub fn resume_after(&mut self, paused_for: Millis) {
        if paused_for <= 0.0 {
            return;
        }
        self.line_start_time += paused_for;
        self.start_time += paused_for;
        log::debug!("Cinematic '{}' resumed after {:.0}ms", self.script_id, paused_for);
    }

    /// End the conversation and hand back its exit trigger
    pub fn finish(&mut self) -> Option<String> {
        log::info!("Cinematic '{}' finished", self.script_id);
        self.active = false;
        self.script.clear();
        self.line_index = 0;
        self.fading_out = false;
        self.custom_camera = None;
        self.exit_trigger.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use crate::script::Framing;
    use sector_math::consts::FRAC_PI_2;

    fn cast() -> Cast {
        Cast::new(Actor::new("Robert", Vec3::new(-1.0, 0.0, 0.0)))
            .with_member(Actor::new("Loke", Vec3::new(1.0, 0.0, 0.0)))
    }

    fn start(script: &Script) -> CinematicState {
        CinematicState::start(
            script,
            Speakers::new("Robert", "Loke"),
            &cast(),
            &Camera::default(),
            1000.0,
            &SequencerConfig::default(),
            &|key: &str| key.to_uppercase(),
        )
    }

    #[test]
    fn test_start_localizes_and_frames() {
        let script = Script::new("talk", "Loke")
            .with_line(ScriptLine::new("Robert", "dialogue.a"))
            .with_exit_trigger("boss_start");
        let state = start(&script);

        assert!(state.active);
        assert_eq!(state.script[0].text, "DIALOGUE.A");
        assert_eq!(state.mid_point, Vec3::ZERO);
        assert_eq!(state.camera_look_at, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(state.line_start_time, 1000.0);
        assert_eq!(state.typing_duration, 300.0);
        assert_eq!(state.line_duration, 2300.0);
    }

    #[test]
    fn test_orbit_rotates_and_zooms() {
        let script = Script::new("talk", "Loke").with_framing(Framing {
            offset: Vec3::new(0.0, 0.0, 8.0),
            rotation_speed: FRAC_PI_2 / 1000.0,
            zoom: 0.5,
        });
        let state = start(&script);

        assert_eq!(state.camera_target(1000.0), Vec3::new(0.0, 0.0, 8.0));

        // Quarter turn after 1s, dolly 20% of the way in
        let target = state.camera_target(2000.0);
        assert!((target.length() - 8.0 * 0.9).abs() < 1e-3);
        assert!((target.x - 7.2).abs() < 1e-3);

        // Dolly stops after the zoom window
        assert!((state.camera_target(6000.0).length() - 4.0).abs() < 1e-3);
        assert!((state.camera_target(60000.0).length() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_resume_after_keeps_line_progress() {
        let script = Script::new("talk", "Loke").with_line(ScriptLine::new("Robert", "dialogue.a"));
        let mut state = start(&script);
        let target = state.camera_target(1500.0);

        state.resume_after(4000.0);
        assert_eq!(state.line_elapsed(5500.0), 500.0);
        assert_eq!(state.camera_target(5500.0), target);

        state.resume_after(-10.0);
        assert_eq!(state.line_start_time, 5000.0);
    }

    #[test]
    fn test_finish_clears_and_returns_exit_trigger() {
        let script = Script::new("talk", "Loke")
            .with_line(ScriptLine::new("Loke", "hi"))
            .with_exit_trigger("boss_start");
        let mut state = start(&script);

        assert_eq!(state.finish().as_deref(), Some("boss_start"));
        assert!(!state.active);
        assert!(state.current_line().is_none());
        assert_eq!(state.finish(), None);
    }
}
