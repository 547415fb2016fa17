//! # sector_math - Mission Math Primitives
//!
//! Small, copyable vector and matrix types used by the trigger engine, the
//! cinematic camera rig and the mission loop.
//!
//! Ground-plane quantities (trigger positions, obstacle centres) use [`Vec2`]
//! where `y` holds the world Z coordinate.

pub mod matrix;
pub mod vector;

pub use matrix::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

pub mod prelude {
    pub use crate::matrix::Mat4;
    pub use crate::vector::{Vec2, Vec3, Vec4};
    pub use crate::radians;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radians() {
        assert!((radians(180.0) - consts::PI).abs() < consts::EPSILON);
    }
}
