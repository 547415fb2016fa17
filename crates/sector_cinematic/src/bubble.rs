//! Speech bubble screen placement

use crate::actor::{Actor, ActorKind};
use crate::camera::Camera;
use serde::{Deserialize, Serialize};

/// Side of the bubble its tail points out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleTail {
    Top,
    Bottom,
    Left,
    Right,
}

/// Where to draw the bubble for the current speaker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubblePlacement {
    /// Pixels from the left edge
    pub x: f32,
    /// Pixels from the top edge
    pub y: f32,
    pub tail: BubbleTail,
    /// Whether the anchor had to be pulled into the safe band
    pub clamped: bool,
}

/// Safe band the bubble anchor is clamped into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleLayout {
    /// Horizontal margin in pixels
    pub margin_x: f32,
    /// Vertical margin in pixels
    pub margin_y: f32,
}

impl Default for BubbleLayout {
    fn default() -> Self {
        Self {
            margin_x: 200.0,
            margin_y: 150.0,
        }
    }
}

impl BubbleLayout {
    pub fn new(margin_x: f32, margin_y: f32) -> Self {
        Self { margin_x, margin_y }
    }

    /// Project the actor's bubble anchor and clamp it on screen.
    ///
    /// Horizontal clamping is applied first, so at a corner the vertical
    /// tail wins. Anchors behind the camera are pinned to the bottom band.
    pub fn place(&self, camera: &Camera, actor: &Actor) -> BubblePlacement {
        let viewport = camera.viewport;
        let clip = camera.project_clip(actor.bubble_anchor());

        let mut tail = match actor.kind {
            ActorKind::Door => BubbleTail::Left,
            ActorKind::Animated => BubbleTail::Bottom,
        };

        if clip.w <= f32::EPSILON {
            // Mirrored horizontally when behind the eye
            let ndc_x = if clip.w.abs() > f32::EPSILON { -clip.x / clip.w } else { 0.0 };
            let x = (ndc_x * 0.5 + 0.5) * viewport.width;
            let x = x.clamp(self.margin_x, (viewport.width - self.margin_x).max(self.margin_x));
            return BubblePlacement {
                x,
                y: (viewport.height - self.margin_y).max(self.margin_y),
                tail: BubbleTail::Bottom,
                clamped: true,
            };
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let mut x = (ndc_x * 0.5 + 0.5) * viewport.width;
        let mut y = (1.0 - (ndc_y * 0.5 + 0.5)) * viewport.height;
        let mut clamped = false;

        if x < self.margin_x {
            x = self.margin_x;
            tail = BubbleTail::Left;
            clamped = true;
        } else if x > viewport.width - self.margin_x {
            x = viewport.width - self.margin_x;
            tail = BubbleTail::Right;
            clamped = true;
        }

        if y < self.margin_y {
            y = self.margin_y;
            tail = BubbleTail::Top;
            clamped = true;
        } else if y > viewport.height - self.margin_y {
            y = viewport.height - self.margin_y;
            tail = BubbleTail::Bottom;
            clamped = true;
        }

        BubblePlacement { x, y, tail, clamped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Viewport;
    use sector_math::Vec3;

    fn camera_looking_at(target: Vec3) -> Camera {
        let mut camera = Camera::new(Viewport::new(1600.0, 900.0));
        camera.set(target + Vec3::new(0.0, 0.0, 10.0), target);
        camera
    }

    #[test]
    fn test_centered_speaker_is_not_clamped() {
        let actor = Actor::new("Loke", Vec3::new(0.0, -2.0, 0.0));
        let camera = camera_looking_at(Vec3::ZERO);
        let placement = BubbleLayout::default().place(&camera, &actor);

        assert!(!placement.clamped);
        assert_eq!(placement.tail, BubbleTail::Bottom);
        assert!((placement.x - 800.0).abs() < 0.5);
        assert!((placement.y - 450.0).abs() < 0.5);
    }

    #[test]
    fn test_door_defaults_to_left_tail() {
        let door = Actor::door("Bunker Door", Vec3::new(0.0, -2.4, 0.0));
        let camera = camera_looking_at(Vec3::ZERO);
        let placement = BubbleLayout::default().place(&camera, &door);

        assert!(!placement.clamped);
        assert_eq!(placement.tail, BubbleTail::Left);
    }

    #[test]
    fn test_offscreen_right_clamps_with_right_tail() {
        let actor = Actor::new("Loke", Vec3::new(30.0, -2.0, 0.0));
        let camera = camera_looking_at(Vec3::ZERO);
        let placement = BubbleLayout::default().place(&camera, &actor);

        assert!(placement.clamped);
        assert_eq!(placement.tail, BubbleTail::Right);
        assert_eq!(placement.x, 1400.0);
    }

    #[test]
    fn test_offscreen_left_clamps_with_left_tail() {
        let actor = Actor::new("Loke", Vec3::new(-30.0, -2.0, 0.0));
        let camera = camera_looking_at(Vec3::ZERO);
        let placement = BubbleLayout::default().place(&camera, &actor);

        assert_eq!(placement.tail, BubbleTail::Left);
        assert_eq!(placement.x, 200.0);
    }

    #[test]
    fn test_corner_prefers_vertical_tail() {
        // Above and to the right of the frame
        let actor = Actor::new("Loke", Vec3::new(30.0, 20.0, 0.0));
        let camera = camera_looking_at(Vec3::ZERO);
        let placement = BubbleLayout::default().place(&camera, &actor);

        assert_eq!(placement.tail, BubbleTail::Top);
        assert_eq!(placement.x, 1400.0);
        assert_eq!(placement.y, 150.0);
    }

    #[test]
    fn test_behind_camera_pins_to_bottom() {
        let actor = Actor::new("Loke", Vec3::new(0.0, 0.0, 20.0));
        let camera = camera_looking_at(Vec3::ZERO);
        let placement = BubbleLayout::default().place(&camera, &actor);

        assert!(placement.clamped);
        assert_eq!(placement.tail, BubbleTail::Bottom);
        assert_eq!(placement.y, 750.0);
    }
}
