//! Camera shake and pan

use sector_core::Millis;
use sector_math::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shake {
    intensity: f32,
    start: Millis,
    duration: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pan {
    target: Vec2,
    start: Millis,
    duration: Millis,
}

/// Active camera effects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraFx {
    shake: Option<Shake>,
    pan: Option<Pan>,
}

impl CameraFx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a shake; a stronger running shake is kept
    pub fn shake(&mut self, intensity: f32, duration: Millis, now: Millis) {
        let current = self.shake_intensity(now);
        if intensity >= current {
            self.shake = Some(Shake {
                intensity,
                start: now,
                duration,
            });
        }
    }

    /// Pan the follow target toward `target` for `duration`
    pub fn pan(&mut self, target: Vec2, duration: Millis, now: Millis) {
        self.pan = Some(Pan {
            target,
            start: now,
            duration,
        });
    }

    /// Shake amplitude at `now`, decaying linearly to zero
    pub fn shake_intensity(&self, now: Millis) -> f32 {
        match self.shake {
            Some(shake) if shake.duration > 0.0 => {
                let t = ((now - shake.start) / shake.duration).clamp(0.0, 1.0) as f32;
                shake.intensity * (1.0 - t)
            }
            _ => 0.0,
        }
    }

    /// Camera offset from the shake at `now`
    pub fn shake_offset(&self, now: Millis) -> Vec3 {
        let intensity = self.shake_intensity(now);
        if intensity <= 0.0 {
            return Vec3::ZERO;
        }
        // Deterministic wobble so replays match
        let phase = (now * 0.05) as f32;
        Vec3::new(phase.sin(), (phase * 1.7).cos(), (phase * 1.3).sin()) * intensity
    }

    /// Ground point the camera should follow instead of the player, if panning
    pub fn pan_target(&self, now: Millis) -> Option<Vec2> {
        self.pan
            .filter(|pan| now - pan.start < pan.duration)
            .map(|pan| pan.target)
    }

    /// Drop effects that have run out
    pub fn expire(&mut self, now: Millis) {
        if self.shake_intensity(now) <= 0.0 {
            self.shake = None;
        }
        if self.pan_target(now).is_none() {
            self.pan = None;
        }
    }
}
