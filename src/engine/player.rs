//! Player facade
//!
//! The engine only needs a handful of things from the player: where they are,
//! a way to hurt them, whether they are busy with a side challenge and a way
//! to grant a temporary speed buff. Everything else about the player (input,
//! camera, animation) lives outside the simulation.

use bevy::prelude::*;

use super::constants::TIMER_EPSILON;

/// Narrow view of the player used by agents and powers.
pub trait PlayerFacade {
    fn position(&self) -> Vec3;
    /// Apply raw damage and return the remaining health.
    fn take_damage(&mut self, amount: f32) -> f32;
    fn is_in_challenge(&self) -> bool;
    /// Multiply movement speed for `duration` seconds. A new buff replaces the old one.
    fn apply_speed_multiplier(&mut self, multiplier: f32, duration: f32);
}

/// Default player state owned by the simulation.
#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    /// Base movement speed in units/second
    pub speed: f32,
    pub speed_multiplier: f32,
    pub speed_buff_remaining: f32,
    pub in_challenge: bool,
    /// Total damage taken this encounter
    pub damage_taken: f32,
}

impl Player {
    pub fn new(position: Vec3, max_health: f32, speed: f32) -> Self {
        Self {
            position,
            health: max_health,
            max_health,
            speed,
            speed_multiplier: 1.0,
            speed_buff_remaining: 0.0,
            in_challenge: false,
            damage_taken: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Current movement speed including any active buff
    pub fn current_speed(&self) -> f32 {
        self.speed * self.speed_multiplier
    }

    /// Advance buff timers.
    pub fn tick(&mut self, dt: f32) {
        if self.speed_buff_remaining > 0.0 {
            self.speed_buff_remaining -= dt;
            if self.speed_buff_remaining <= TIMER_EPSILON {
                self.speed_buff_remaining = 0.0;
                self.speed_multiplier = 1.0;
            }
        }
    }

    /// Move along a planar direction for `dt` seconds at the current speed.
    pub fn move_toward(&mut self, direction: Vec3, dt: f32) {
        let flat = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        self.position += flat * self.current_speed() * dt;
    }
}

impl PlayerFacade for Player {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn take_damage(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 || !self.is_alive() {
            return self.health;
        }
        let applied = amount.min(self.health);
        self.health -= applied;
        self.damage_taken += applied;
        self.health
    }

    fn is_in_challenge(&self) -> bool {
        self.in_challenge
    }

    fn apply_speed_multiplier(&mut self, multiplier: f32, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        self.speed_multiplier = multiplier;
        self.speed_buff_remaining = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut player = Player::new(Vec3::ZERO, 50.0, 5.0);
        assert_eq!(player.take_damage(20.0), 30.0);
        assert_eq!(player.take_damage(100.0), 0.0);
        assert!(!player.is_alive());
        assert_eq!(player.damage_taken, 50.0);
    }

    #[test]
    fn test_speed_buff_expires() {
        let mut player = Player::new(Vec3::ZERO, 100.0, 4.0);
        player.apply_speed_multiplier(1.5, 1.0);
        assert_eq!(player.current_speed(), 6.0);

        for _ in 0..60 {
            player.tick(1.0 / 60.0);
        }
        assert_eq!(player.current_speed(), 4.0);
    }
}
