//! Headless world simulation
//!
//! Stand-in for the real enemy and projectile systems: enemies walk toward
//! the player and bite when close, the player fires at the nearest enemy in
//! range. Enough to drive kills, damage and the boss fight in a terminal.

use sector_core::Millis;
use sector_math::Vec2;
use sector_mission::{EnemySnapshot, WorldReport, WorldStep};

/// Units per second
const ENEMY_SPEED: f32 = 1.5;
const BOSS_SPEED: f32 = 0.8;
const BITE_RANGE: f32 = 1.0;
const BITE_DAMAGE: f32 = 8.0;
const BITE_COOLDOWN: Millis = 1200.0;
const FIRE_RANGE: f32 = 7.0;
/// Player damage per second against the focused enemy
const FIRE_DPS: f32 = 35.0;
const ENEMY_HP: f32 = 40.0;
const BOSS_HP: f32 = 400.0;

#[derive(Debug, Clone)]
struct Enemy {
    id: u64,
    kind: String,
    position: Vec2,
    hp: f32,
    is_boss: bool,
    next_bite: Millis,
}

/// Enemies in the sector
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    enemies: Vec<Enemy>,
    next_id: u64,
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` enemies in a ring around `center`
    pub fn spawn(&mut self, kind: &str, count: u32, center: Vec2) {
        for i in 0..count {
            let angle = i as f32 / count.max(1) as f32 * sector_math::consts::TAU;
            let offset = Vec2::new(angle.cos(), angle.sin()) * 1.5;
            self.push(kind, center + offset, ENEMY_HP, false);
        }
        log::info!("Spawned {} x {} near ({:.1}, {:.1})", count, kind, center.x, center.y);
    }

    pub fn spawn_boss(&mut self, kind: &str, position: Vec2) {
        self.push(kind, position, BOSS_HP, true);
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    fn push(&mut self, kind: &str, position: Vec2, hp: f32, is_boss: bool) {
        self.next_id += 1;
        self.enemies.push(Enemy {
            id: self.next_id,
            kind: kind.to_string(),
            position,
            hp,
            is_boss,
            next_bite: 0.0,
        });
    }

    /// Advance one frame
    pub fn step(&mut self, step: &WorldStep) -> WorldReport {
        let player = step.player_position.xz();
        let seconds = (step.delta / 1000.0) as f32;
        let mut report = WorldReport::default();

        for enemy in &mut self.enemies {
            let to_player = player - enemy.position;
            let distance = to_player.length();
            if distance > BITE_RANGE {
                let speed = if enemy.is_boss { BOSS_SPEED } else { ENEMY_SPEED };
                let travel = (speed * seconds).min(distance - BITE_RANGE);
                enemy.position = enemy.position + to_player.normalize_or_zero() * travel;
            } else if step.now >= enemy.next_bite {
                enemy.next_bite = step.now + BITE_COOLDOWN;
                let damage = if enemy.is_boss { BITE_DAMAGE * 2.0 } else { BITE_DAMAGE };
                report.damage_to_player += damage;
            }
        }

        let target = self
            .enemies
            .iter_mut()
            .filter(|enemy| enemy.position.distance(player) <= FIRE_RANGE)
            .min_by(|a, b| {
                a.position
                    .distance_squared(player)
                    .total_cmp(&b.position.distance_squared(player))
            });
        if let Some(target) = target {
            let damage = (FIRE_DPS * seconds).min(target.hp);
            target.hp -= damage;
            report.damage_dealt += damage;
        }

        self.enemies.retain(|enemy| {
            if enemy.hp > 0.0 {
                return true;
            }
            report.kills += 1;
            if enemy.is_boss {
                report.boss_defeated = true;
            }
            log::debug!("{} #{} down", enemy.kind, enemy.id);
            false
        });

        report.enemies = self
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind.clone(),
                position: enemy.position,
                hp: enemy.hp,
                is_boss: enemy.is_boss,
            })
            .collect();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sector_math::Vec3;

    fn step_at(now: Millis, player: Vec3) -> WorldStep {
        WorldStep {
            now,
            delta: 100.0,
            player_position: player,
            player_moving: false,
        }
    }

    #[test]
    fn test_enemies_close_in() {
        let mut world = HeadlessWorld::new();
        world.spawn("WALKER", 1, Vec2::new(20.0, 0.0));

        let report = world.step(&step_at(100.0, Vec3::ZERO));
        let enemy = &report.enemies[0];
        assert!(enemy.position.x < 21.5);
        assert_eq!(report.damage_dealt, 0.0);
    }

    #[test]
    fn test_player_kills_enemy_in_range() {
        let mut world = HeadlessWorld::new();
        world.spawn("WALKER", 1, Vec2::new(3.0, 0.0));

        let mut kills = 0;
        let mut now = 0.0;
        while now < 5000.0 {
            now += 100.0;
            kills += world.step(&step_at(now, Vec3::ZERO)).kills;
        }
        assert_eq!(kills, 1);
        assert_eq!(world.enemy_count(), 0);
    }

    #[test]
    fn test_bite_respects_cooldown() {
        let mut world = HeadlessWorld::new();
        world.spawn_boss("TANK", Vec2::new(0.5, 0.0));

        let first = world.step(&step_at(100.0, Vec3::ZERO));
        let second = world.step(&step_at(200.0, Vec3::ZERO));
        assert_eq!(first.damage_to_player, BITE_DAMAGE * 2.0);
        assert_eq!(second.damage_to_player, 0.0);
    }

    #[test]
    fn test_boss_death_reported() {
        let mut world = HeadlessWorld::new();
        world.spawn_boss("TANK", Vec2::new(2.0, 0.0));

        let mut defeated = false;
        let mut now = 0.0;
        while now < 20_000.0 && !defeated {
            now += 100.0;
            defeated = world.step(&step_at(now, Vec3::ZERO)).boss_defeated;
        }
        assert!(defeated);
    }
}
