//! Player movement on the ground plane

use sector_core::Millis;
use sector_math::Vec2;
use serde::{Deserialize, Serialize};

/// Circular obstacle the player cannot walk through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self { position, radius }
    }
}

/// Movement request for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    /// Desired direction, any length; zero means standing still
    pub direction: Vec2,
    /// Sprint if stamina allows
    pub sprint: bool,
}

impl MoveInput {
    pub fn walk(direction: Vec2) -> Self {
        Self {
            direction,
            sprint: false,
        }
    }

    pub fn run(direction: Vec2) -> Self {
        Self {
            direction,
            sprint: true,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.direction.length_squared() > f32::EPSILON
    }
}

/// Step `position` along `direction` at `speed` units per second
pub fn step(position: Vec2, direction: Vec2, speed: f32, delta: Millis) -> Vec2 {
    let seconds = (delta / 1000.0) as f32;
    position + direction.normalize_or_zero() * (speed * seconds)
}

/// Push a circle of `radius` at `position` out of every overlapping obstacle
pub fn resolve_obstacles(position: Vec2, radius: f32, obstacles: &[Obstacle]) -> Vec2 {
    let mut resolved = position;
    for obstacle in obstacles {
        let min_distance = radius + obstacle.radius;
        let offset = resolved - obstacle.position;
        let distance_sq = offset.length_squared();
        if distance_sq >= min_distance * min_distance {
            continue;
        }

        let distance = distance_sq.sqrt();
        let normal = if distance > f32::EPSILON {
            offset / distance
        } else {
            // Dead centre: push out along +X
            Vec2::X
        };
        resolved = obstacle.position + normal * min_distance;
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_normalizes_direction() {
        let moved = step(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0, 1000.0);
        assert!((moved.x - 3.0).abs() < 1e-5);
        assert!((moved.y - 4.0).abs() < 1e-5);

        assert_eq!(step(Vec2::new(1.0, 1.0), Vec2::ZERO, 5.0, 16.0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_push_out_of_obstacle() {
        let obstacles = [Obstacle::new(Vec2::new(0.0, 0.0), 1.0)];
        let resolved = resolve_obstacles(Vec2::new(0.5, 0.0), 0.5, &obstacles);

        assert!((resolved.x - 1.5).abs() < 1e-5);
        assert_eq!(resolved.y, 0.0);
    }

    #[test]
    fn test_clear_path_is_untouched() {
        let obstacles = [Obstacle::new(Vec2::new(10.0, 0.0), 1.0)];
        assert_eq!(resolve_obstacles(Vec2::new(1.0, 2.0), 0.5, &obstacles), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_dead_centre_pushes_along_x() {
        let obstacles = [Obstacle::new(Vec2::new(2.0, 2.0), 1.0)];
        let resolved = resolve_obstacles(Vec2::new(2.0, 2.0), 0.5, &obstacles);
        assert!((resolved.x - 3.5).abs() < 1e-5);
    }
}
