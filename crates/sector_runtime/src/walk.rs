//! Scripted player path
//!
//! Replaces keyboard input in the headless runner: the player walks from
//! waypoint to waypoint and waits at each one.

use sector_core::Millis;
use sector_math::Vec2;
use sector_mission::{MoveInput, SectorDefinition};

/// Distance at which a waypoint counts as reached
const ARRIVAL_RADIUS: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec2,
    /// Time to stand still after arriving
    pub wait: Millis,
    pub sprint: bool,
}

impl Waypoint {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            wait: 0.0,
            sprint: false,
        }
    }

    pub fn with_wait(mut self, wait: Millis) -> Self {
        self.wait = wait;
        self
    }

    pub fn sprinting(mut self) -> Self {
        self.sprint = true;
        self
    }
}

/// Walks a list of waypoints in order
#[derive(Debug, Clone)]
pub struct ScriptedWalk {
    waypoints: Vec<Waypoint>,
    current: usize,
    waiting_until: Option<Millis>,
}

impl ScriptedWalk {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            current: 0,
            waiting_until: None,
        }
    }

    /// Tour every trigger and clue of a sector, then head for the boss
    pub fn through_sector(sector: &SectorDefinition) -> Self {
        let mut waypoints: Vec<Waypoint> = sector
            .triggers
            .iter()
            .map(|trigger| Waypoint::new(trigger.position).with_wait(1500.0))
            .collect();
        waypoints.extend(
            sector
                .clues
                .iter()
                .map(|clue| Waypoint::new(clue.position).with_wait(500.0)),
        );
        if let Some(boss) = &sector.boss {
            waypoints.push(Waypoint::new(boss.position).sprinting());
        }
        Self::new(waypoints)
    }

    /// Input for this frame given where the player stands
    pub fn input(&mut self, position: Vec2, now: Millis) -> MoveInput {
        loop {
            let waypoint = match self.waypoints.get(self.current) {
                Some(waypoint) => *waypoint,
                None => return MoveInput::default(),
            };

            if let Some(until) = self.waiting_until {
                if now < until {
                    return MoveInput::default();
                }
                self.waiting_until = None;
                self.current += 1;
                continue;
            }

            let offset = waypoint.position - position;
            if offset.length() <= ARRIVAL_RADIUS {
                log::debug!("Reached waypoint {} at {:.0}ms", self.current, now);
                self.waiting_until = Some(now + waypoint.wait);
                continue;
            }

            let direction = offset.normalize_or_zero();
            return if waypoint.sprint {
                MoveInput::run(direction)
            } else {
                MoveInput::walk(direction)
            };
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.waypoints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heads_for_first_waypoint() {
        let mut walk = ScriptedWalk::new(vec![Waypoint::new(Vec2::new(10.0, 0.0))]);
        let input = walk.input(Vec2::ZERO, 0.0);
        assert!(input.is_moving());
        assert!((input.direction.x - 1.0).abs() < 1e-5);
        assert!(!input.sprint);
    }

    #[test]
    fn test_waits_then_moves_on() {
        let mut walk = ScriptedWalk::new(vec![
            Waypoint::new(Vec2::ZERO).with_wait(1000.0),
            Waypoint::new(Vec2::new(0.0, 5.0)).sprinting(),
        ]);

        assert!(!walk.input(Vec2::ZERO, 0.0).is_moving());
        assert!(!walk.input(Vec2::ZERO, 999.0).is_moving());

        let input = walk.input(Vec2::ZERO, 1000.0);
        assert!(input.sprint);
        assert!((input.direction.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_finished_walk_stands_still() {
        let mut walk = ScriptedWalk::new(vec![Waypoint::new(Vec2::ZERO)]);
        walk.input(Vec2::ZERO, 0.0);
        assert!(walk.is_finished());
        assert!(!walk.input(Vec2::ZERO, 10.0).is_moving());
    }
}
