//! Combat events
//!
//! Input and notification events exchanged between the game shell and the
//! simulation. Input events are consumed once per frame before the
//! simulation steps.

use bevy::prelude::*;

use crate::engine::ledger::AttackTier;
use crate::engine::simulation::EncounterOutcome;

/// Player asks to use a tier of the active power
#[derive(Event, Debug, Clone, Copy)]
pub struct AbilityRequest {
    pub tier: AttackTier,
    /// Aim direction on the ground plane (need not be normalized)
    pub direction: Vec3,
}

/// Player asks to make another loadout slot active
#[derive(Event, Debug, Clone, Copy)]
pub struct PowerSwitchRequest {
    pub slot: usize,
}

/// Side challenge lifecycle
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeEvent {
    Begin,
    /// Challenge won; the active power receives `reward` extra uses
    Complete { reward: u32 },
}

/// Fired once when the encounter reaches an outcome
#[derive(Event, Debug, Clone, Copy)]
pub struct EncounterFinished {
    pub outcome: EncounterOutcome,
    /// Encounter time in seconds
    pub duration: f32,
}
