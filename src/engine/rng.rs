//! Seeded random number generation for deterministic encounters.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Seeded random number generator for deterministic simulation.
///
/// When a seed is provided (e.g., via the headless config), the same seed will
/// always produce the same encounter. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Roll a fixed-probability event.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.random_f32() < probability
    }

    /// Roll a Poisson event with `rate_per_second` over a tick of `dt` seconds.
    ///
    /// The per-tick probability is `1 - e^(-rate * dt)`, so the expected wait
    /// is the same at 30 or 240 ticks per second.
    pub fn chance_per_second(&mut self, rate_per_second: f32, dt: f32) -> bool {
        if rate_per_second <= 0.0 || dt <= 0.0 {
            return false;
        }
        let probability = 1.0 - (-rate_per_second * dt).exp();
        self.chance(probability)
    }

    /// Random point on the ground plane within `radius` of `center`.
    pub fn point_in_radius(&mut self, center: Vec3, radius: f32) -> Vec3 {
        let angle = self.random_f32() * std::f32::consts::TAU;
        // sqrt keeps the distribution uniform over the disc
        let distance = self.random_f32().sqrt() * radius;
        Vec3::new(
            center.x + angle.cos() * distance,
            center.y,
            center.z + angle.sin() * distance,
        )
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
