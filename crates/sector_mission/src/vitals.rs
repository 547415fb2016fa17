//! Player health and stamina

use sector_core::Millis;

/// Result of applying damage to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Still inside the invulnerability window, or already dead
    Ignored,
    /// Damage applied, player alive
    Hit { remaining: f32 },
    /// This hit killed the player
    Killed,
}

/// Player HP and stamina
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerVitals {
    pub hp: f32,
    pub max_hp: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    /// No damage is taken before this time
    pub invulnerable_until: Millis,
    /// Time of the last hit that landed
    pub last_hit_time: Option<Millis>,
}

impl PlayerVitals {
    pub fn new(max_hp: f32, max_stamina: f32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            stamina: max_stamina,
            max_stamina,
            invulnerable_until: 0.0,
            last_hit_time: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn is_invulnerable(&self, now: Millis) -> bool {
        now < self.invulnerable_until
    }

    /// Apply `amount` damage at `now`, opening an invulnerability window of
    /// `window` ms if it lands
    pub fn apply_damage(&mut self, amount: f32, now: Millis, window: Millis) -> DamageOutcome {
        if amount <= 0.0 || self.is_dead() || self.is_invulnerable(now) {
            return DamageOutcome::Ignored;
        }

        self.hp = (self.hp - amount).max(0.0);
        self.last_hit_time = Some(now);
        self.invulnerable_until = now + window;

        if self.is_dead() {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hit { remaining: self.hp }
        }
    }

    /// Drain stamina while sprinting, regenerate otherwise.
    /// Returns whether the player can sprint this tick.
    pub fn update_stamina(&mut self, sprinting: bool, delta: Millis, drain: f32, regen: f32) -> bool {
        let seconds = (delta / 1000.0) as f32;
        if sprinting && self.stamina > 0.0 {
            self.stamina = (self.stamina - drain * seconds).max(0.0);
            true
        } else {
            self.stamina = (self.stamina + regen * seconds).min(self.max_stamina);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invulnerability_window() {
        let mut vitals = PlayerVitals::new(100.0, 100.0);

        assert_eq!(vitals.apply_damage(30.0, 1000.0, 1000.0), DamageOutcome::Hit { remaining: 70.0 });
        assert_eq!(vitals.apply_damage(30.0, 1500.0, 1000.0), DamageOutcome::Ignored);
        assert_eq!(vitals.apply_damage(30.0, 2000.0, 1000.0), DamageOutcome::Hit { remaining: 40.0 });
        assert_eq!(vitals.last_hit_time, Some(2000.0));
    }

    #[test]
    fn test_lethal_hit() {
        let mut vitals = PlayerVitals::new(50.0, 100.0);

        assert_eq!(vitals.apply_damage(80.0, 0.0, 1000.0), DamageOutcome::Killed);
        assert!(vitals.is_dead());
        assert_eq!(vitals.hp, 0.0);
        assert_eq!(vitals.apply_damage(10.0, 5000.0, 1000.0), DamageOutcome::Ignored);
    }

    #[test]
    fn test_stamina_drain_and_regen() {
        let mut vitals = PlayerVitals::new(100.0, 100.0);

        assert!(vitals.update_stamina(true, 1000.0, 25.0, 10.0));
        assert_eq!(vitals.stamina, 75.0);

        assert!(!vitals.update_stamina(false, 1000.0, 25.0, 10.0));
        assert_eq!(vitals.stamina, 85.0);

        vitals.stamina = 0.0;
        assert!(!vitals.update_stamina(true, 1000.0, 25.0, 10.0));
        assert_eq!(vitals.stamina, 10.0);

        vitals.update_stamina(false, 60_000.0, 25.0, 10.0);
        assert_eq!(vitals.stamina, 100.0);
    }
}
