//! Trigger zone shapes

use sector_math::Vec2;
use serde::{Deserialize, Serialize};

/// Ground-plane trigger shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerZone {
    /// Rectangle, optionally rotated about its centre
    Rect {
        /// Half-extents (width/2, depth/2)
        half_extents: Vec2,
        /// Rotation in radians
        rotation: f32,
    },
    /// Circle
    Circle {
        /// Radius
        radius: f32,
    },
}

impl TriggerZone {
    /// Create a rectangular zone
    pub fn rect(width: f32, depth: f32, rotation: f32) -> Self {
        Self::Rect {
            half_extents: Vec2::new(width / 2.0, depth / 2.0),
            rotation,
        }
    }

    /// Create a circular zone
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    /// Check if an offset from the zone centre is inside
    pub fn contains_offset(&self, offset: Vec2) -> bool {
        match self {
            Self::Rect {
                half_extents,
                rotation,
            } => {
                let local = if *rotation != 0.0 {
                    offset.rotate(-*rotation)
                } else {
                    offset
                };
                local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y
            }
            // Strict: a point exactly on the rim is outside
            Self::Circle { radius } => offset.length_squared() < radius * radius,
        }
    }

    /// Check if a world point is inside the zone centred at `center`
    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        self.contains_offset(point - center)
    }
}
