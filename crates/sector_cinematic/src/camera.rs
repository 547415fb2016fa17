//! Scene camera

use sector_math::{radians, Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// Fixed camera placement used instead of the orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraShot {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Perspective camera with a smoothed look target
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Point the camera looks at
    pub look_target: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub viewport: Viewport,
}

impl Camera {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 10.0),
            look_target: Vec3::ZERO,
            fov_y: radians(50.0),
            near: 0.1,
            far: 1000.0,
            viewport,
        }
    }

    /// Place the camera at `position` looking at `target`
    pub fn set(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.look_target = target;
    }

    /// Move position and look target a fraction of the way toward a shot
    pub fn approach(&mut self, position: Vec3, look_at: Vec3, factor: f32) {
        self.position = self.position.lerp(position, factor);
        self.look_target = self.look_target.lerp(look_at, factor);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.position, self.look_target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.viewport.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Clip-space position of a world point
    pub fn project_clip(&self, point: Vec3) -> Vec4 {
        self.view_projection().transform_homogeneous(point)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
