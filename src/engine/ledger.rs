//! Ability Resource Ledger
//!
//! Cooldown and limited-use bookkeeping for every equipped power. The ledger is
//! the only place cooldown state lives: powers ask it for permission before
//! doing anything and never track their own timers.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::constants::{
    BASIC_DAMAGE_SCALE, COOLDOWN_EPSILON, SPECIAL_DAMAGE_SCALE, ULTIMATE_DAMAGE_SCALE,
};

/// Attack tier of a power.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AttackTier {
    Basic,
    Special,
    Ultimate,
}

impl AttackTier {
    pub const ALL: [AttackTier; 3] = [AttackTier::Basic, AttackTier::Special, AttackTier::Ultimate];

    fn index(self) -> usize {
        match self {
            AttackTier::Basic => 0,
            AttackTier::Special => 1,
            AttackTier::Ultimate => 2,
        }
    }

    /// Multiplier applied to a power's base value for this tier.
    pub fn damage_scale(self) -> f32 {
        match self {
            AttackTier::Basic => BASIC_DAMAGE_SCALE,
            AttackTier::Special => SPECIAL_DAMAGE_SCALE,
            AttackTier::Ultimate => ULTIMATE_DAMAGE_SCALE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AttackTier::Basic => "Basic",
            AttackTier::Special => "Special",
            AttackTier::Ultimate => "Ultimate",
        }
    }
}

/// Cooldown durations for the three tiers of a power, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierCooldowns {
    pub basic: f32,
    pub special: f32,
    pub ultimate: f32,
}

impl TierCooldowns {
    pub fn get(&self, tier: AttackTier) -> f32 {
        match tier {
            AttackTier::Basic => self.basic,
            AttackTier::Special => self.special,
            AttackTier::Ultimate => self.ultimate,
        }
    }
}

/// Per-tier cooldown state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierState {
    pub damage: f32,
    pub cooldown_duration: f32,
    pub cooldown_remaining: f32,
}

/// Resource record for one equipped power.
#[derive(Clone, Debug)]
pub struct AbilityRecord {
    tiers: [TierState; 3],
    uses_remaining: u32,
}

impl AbilityRecord {
    /// Build a record from a base power value. Damage per tier is derived from
    /// the tier scaling so that it can never drift from `power`.
    pub fn new(power: f32, cooldowns: TierCooldowns, uses: u32) -> Self {
        let tier = |t: AttackTier| TierState {
            damage: power * t.damage_scale(),
            cooldown_duration: cooldowns.get(t).max(0.0),
            cooldown_remaining: 0.0,
        };
        Self {
            tiers: [
                tier(AttackTier::Basic),
                tier(AttackTier::Special),
                tier(AttackTier::Ultimate),
            ],
            uses_remaining: uses,
        }
    }

    pub fn tier(&self, tier: AttackTier) -> &TierState {
        &self.tiers[tier.index()]
    }

    pub fn uses_remaining(&self) -> u32 {
        self.uses_remaining
    }

    fn is_ready(&self, tier: AttackTier) -> bool {
        self.uses_remaining > 0 && self.tiers[tier.index()].cooldown_remaining <= 0.0
    }
}

/// Ledger of every equipped power's cooldowns and remaining uses.
#[derive(Resource, Default, Debug)]
pub struct AbilityLedger {
    records: HashMap<String, AbilityRecord>,
}

impl AbilityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) the record for `owner`. Called when a power is equipped.
    pub fn register(&mut self, owner: &str, power: f32, cooldowns: TierCooldowns, uses: u32) {
        debug!("Ledger: registered {} (power {:.1}, {} uses)", owner, power, uses);
        self.records
            .insert(owner.to_string(), AbilityRecord::new(power, cooldowns, uses));
    }

    /// Drop the record for `owner`. Returns false if nothing was registered.
    pub fn unregister(&mut self, owner: &str) -> bool {
        self.records.remove(owner).is_some()
    }

    /// Drop every record (end of encounter).
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn record(&self, owner: &str) -> Option<&AbilityRecord> {
        self.records.get(owner)
    }

    pub fn contains(&self, owner: &str) -> bool {
        self.records.contains_key(owner)
    }

    /// Try to spend one use of `tier`.
    ///
    /// Fails without touching anything if the tier is cooling down, the power
    /// has no uses left, or `owner` is unknown. On success the use is spent and
    /// the tier's cooldown restarts from its full duration.
    pub fn use_attack(&mut self, owner: &str, tier: AttackTier) -> bool {
        let Some(record) = self.records.get_mut(owner) else {
            return false;
        };
        if !record.is_ready(tier) {
            return false;
        }

        record.uses_remaining -= 1;
        let state = &mut record.tiers[tier.index()];
        state.cooldown_remaining = state.cooldown_duration;
        true
    }

    /// Decay every cooldown by `dt`, clamped at zero.
    pub fn tick(&mut self, dt: f32) {
        for record in self.records.values_mut() {
            for state in record.tiers.iter_mut() {
                state.cooldown_remaining = (state.cooldown_remaining - dt).max(0.0);
            }
        }
    }

    /// Grant extra uses (challenge rewards). Returns false for an unknown owner.
    pub fn add_uses(&mut self, owner: &str, amount: u32) -> bool {
        match self.records.get_mut(owner) {
            Some(record) => {
                record.uses_remaining = record.uses_remaining.saturating_add(amount);
                true
            }
            None => false,
        }
    }

    /// Remaining cooldown as a fraction of the full duration, in [0, 1].
    pub fn cooldown_fraction(&self, owner: &str, tier: AttackTier) -> f32 {
        self.records
            .get(owner)
            .map(|record| {
                let state = record.tier(tier);
                (state.cooldown_remaining / state.cooldown_duration.max(COOLDOWN_EPSILON))
                    .clamp(0.0, 1.0)
            })
            .unwrap_or(0.0)
    }

    /// Damage of `tier` for `owner`, or 0 when unknown.
    pub fn damage(&self, owner: &str, tier: AttackTier) -> f32 {
        self.records
            .get(owner)
            .map(|record| record.tier(tier).damage)
            .unwrap_or(0.0)
    }

    pub fn uses_remaining(&self, owner: &str) -> u32 {
        self.records
            .get(owner)
            .map(|record| record.uses_remaining)
            .unwrap_or(0)
    }

    /// Whether `tier` could be used right now.
    pub fn is_ready(&self, owner: &str, tier: AttackTier) -> bool {
        self.records
            .get(owner)
            .is_some_and(|record| record.is_ready(tier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cooldowns() -> TierCooldowns {
        TierCooldowns {
            basic: 1.0,
            special: 4.0,
            ultimate: 12.0,
        }
    }

    #[test]
    fn test_damage_scaling_per_tier() {
        let mut ledger = AbilityLedger::new();
        ledger.register("Flame", 40.0, cooldowns(), 10);
        assert!((ledger.damage("Flame", AttackTier::Basic) - 32.0).abs() < 1e-5);
        assert!((ledger.damage("Flame", AttackTier::Special) - 60.0).abs() < 1e-5);
        assert!((ledger.damage("Flame", AttackTier::Ultimate) - 120.0).abs() < 1e-5);
    }

    #[test]
    fn test_use_attack_starts_cooldown_and_spends_use() {
        let mut ledger = AbilityLedger::new();
        ledger.register("Ice", 20.0, cooldowns(), 5);

        assert!(ledger.use_attack("Ice", AttackTier::Special));
        assert_eq!(ledger.uses_remaining("Ice"), 4);
        assert_eq!(ledger.cooldown_fraction("Ice", AttackTier::Special), 1.0);
        // Other tiers are independent
        assert_eq!(ledger.cooldown_fraction("Ice", AttackTier::Basic), 0.0);
        assert!(ledger.use_attack("Ice", AttackTier::Basic));
    }

    #[test]
    fn test_unknown_owner_is_rejected() {
        let mut ledger = AbilityLedger::new();
        assert!(!ledger.use_attack("Nobody", AttackTier::Basic));
        assert!(!ledger.add_uses("Nobody", 3));
        assert_eq!(ledger.cooldown_fraction("Nobody", AttackTier::Basic), 0.0);
    }

    #[test]
    fn test_zero_cooldown_fraction_does_not_divide_by_zero() {
        let mut ledger = AbilityLedger::new();
        ledger.register(
            "Light",
            10.0,
            TierCooldowns {
                basic: 0.0,
                special: 0.0,
                ultimate: 0.0,
            },
            3,
        );
        assert!(ledger.use_attack("Light", AttackTier::Basic));
        let fraction = ledger.cooldown_fraction("Light", AttackTier::Basic);
        assert!(fraction.is_finite());
        assert_eq!(fraction, 0.0);
        // No cooldown means it can be used again straight away
        assert!(ledger.use_attack("Light", AttackTier::Basic));
    }

    #[test]
    fn test_tick_clamps_at_zero() {
        let mut ledger = AbilityLedger::new();
        ledger.register("Magma", 30.0, cooldowns(), 5);
        ledger.use_attack("Magma", AttackTier::Basic);
        ledger.tick(10.0);
        let state = ledger.record("Magma").unwrap().tier(AttackTier::Basic);
        assert_eq!(state.cooldown_remaining, 0.0);
    }
}
