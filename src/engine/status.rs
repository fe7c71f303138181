//! Damage Types & Status Effects
//!
//! Every elemental hit leaves a short status effect on the agent it lands on.
//! Statuses of the same type never stack: re-application refreshes the timer
//! and keeps the stronger of the two values.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::constants::MAX_STATUS_DURATION;

/// Element of a hit; decides which status effect it applies.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DamageType {
    Flame,
    Ice,
    Bomb,
    Light,
    Magma,
    /// Enemy melee and boss abilities
    Physical,
}

impl DamageType {
    pub fn name(&self) -> &'static str {
        match self {
            DamageType::Flame => "Flame",
            DamageType::Ice => "Ice",
            DamageType::Bomb => "Bomb",
            DamageType::Light => "Light",
            DamageType::Magma => "Magma",
            DamageType::Physical => "Physical",
        }
    }
}

/// Kinds of status effects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum StatusType {
    /// Damage per second, applied straight to health (no damage floor)
    Burn,
    /// Movement speed multiplier (slow_factor)
    Slow,
    /// Pushed away from the hit; cannot move while it lasts
    Knockback,
    /// Cannot attack while it lasts
    Blind,
}

/// A status effect attached to an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusEffect {
    pub status: StatusType,
    pub remaining_time: f32,
    /// Damage per second (Burn only)
    pub tick_damage: f32,
    /// Speed multiplier, 1.0 = unaffected (Slow only)
    pub slow_factor: f32,
}

/// Burn damage per second as a fraction of the hit's nominal damage.
const BURN_DAMAGE_RATIO: f32 = 0.1;
const BURN_DURATION: f32 = 3.0;
const SLOW_FACTOR: f32 = 0.5;
const SLOW_DURATION: f32 = 2.0;
const KNOCKBACK_DURATION: f32 = 0.3;
const BLIND_DURATION: f32 = 1.5;

impl StatusEffect {
    /// Build a status effect; the duration is capped at `MAX_STATUS_DURATION`.
    pub fn new(status: StatusType, duration: f32, tick_damage: f32, slow_factor: f32) -> Self {
        Self {
            status,
            remaining_time: duration.clamp(0.0, MAX_STATUS_DURATION),
            tick_damage,
            slow_factor,
        }
    }

    /// The status a hit of `damage_type` leaves behind, if any.
    pub fn for_damage(damage_type: DamageType, nominal_damage: f32) -> Option<Self> {
        match damage_type {
            DamageType::Flame | DamageType::Magma => Some(Self::new(
                StatusType::Burn,
                BURN_DURATION,
                nominal_damage * BURN_DAMAGE_RATIO,
                1.0,
            )),
            DamageType::Ice => Some(Self::new(StatusType::Slow, SLOW_DURATION, 0.0, SLOW_FACTOR)),
            DamageType::Bomb => Some(Self::new(StatusType::Knockback, KNOCKBACK_DURATION, 0.0, 1.0)),
            DamageType::Light => Some(Self::new(StatusType::Blind, BLIND_DURATION, 0.0, 1.0)),
            DamageType::Physical => None,
        }
    }
}

/// Active status effects on one agent. Agents rarely carry more than a few.
#[derive(Clone, Debug, Default)]
pub struct StatusEffects {
    effects: SmallVec<[StatusEffect; 4]>,
}

impl StatusEffects {
    /// Apply or refresh a status effect.
    pub fn apply(&mut self, incoming: StatusEffect) {
        let capped = StatusEffect::new(
            incoming.status,
            incoming.remaining_time,
            incoming.tick_damage,
            incoming.slow_factor,
        );
        match self.effects.iter_mut().find(|e| e.status == capped.status) {
            Some(existing) => {
                existing.remaining_time = capped.remaining_time;
                existing.tick_damage = existing.tick_damage.max(capped.tick_damage);
                existing.slow_factor = existing.slow_factor.min(capped.slow_factor);
            }
            None => self.effects.push(capped),
        }
    }

    /// Advance timers and return the burn damage accumulated over `dt`.
    ///
    /// Burn damage is counted for the part of `dt` the effect was still active.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let mut burn = 0.0;
        for effect in self.effects.iter_mut() {
            let active = dt.min(effect.remaining_time).max(0.0);
            if effect.status == StatusType::Burn {
                burn += effect.tick_damage * active;
            }
            effect.remaining_time -= dt;
        }
        self.effects.retain(|e| e.remaining_time > 0.0);
        burn
    }

    pub fn has(&self, status: StatusType) -> bool {
        self.effects.iter().any(|e| e.status == status)
    }

    pub fn get(&self, status: StatusType) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.status == status)
    }

    /// Combined movement multiplier; 0 while knocked back.
    pub fn movement_multiplier(&self) -> f32 {
        if self.has(StatusType::Knockback) {
            return 0.0;
        }
        self.get(StatusType::Slow).map(|s| s.slow_factor).unwrap_or(1.0)
    }

    pub fn can_attack(&self) -> bool {
        !self.has(StatusType::Blind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_is_capped() {
        let effect = StatusEffect::new(StatusType::Burn, 10.0, 4.0, 1.0);
        assert_eq!(effect.remaining_time, MAX_STATUS_DURATION);
    }

    #[test]
    fn test_reapplication_refreshes_and_keeps_strongest() {
        let mut statuses = StatusEffects::default();
        statuses.apply(StatusEffect::new(StatusType::Slow, 2.0, 0.0, 0.5));
        statuses.tick(1.5);
        statuses.apply(StatusEffect::new(StatusType::Slow, 1.0, 0.0, 0.8));

        assert_eq!(statuses.len(), 1);
        let slow = statuses.get(StatusType::Slow).unwrap();
        assert_eq!(slow.remaining_time, 1.0);
        assert_eq!(slow.slow_factor, 0.5);

        statuses.apply(StatusEffect::new(StatusType::Burn, 2.0, 3.0, 1.0));
        statuses.apply(StatusEffect::new(StatusType::Burn, 2.0, 5.0, 1.0));
        assert_eq!(statuses.get(StatusType::Burn).unwrap().tick_damage, 5.0);
    }

    #[test]
    fn test_burn_deals_damage_only_while_active() {
        let mut statuses = StatusEffects::default();
        statuses.apply(StatusEffect::new(StatusType::Burn, 1.0, 10.0, 1.0));
        let first = statuses.tick(0.5);
        assert!((first - 5.0).abs() < 1e-4);
        // Only 0.5s of burn remains even though a full second passes
        let second = statuses.tick(1.0);
        assert!((second - 5.0).abs() < 1e-4);
        assert!(statuses.is_empty());
    }

    #[test]
    fn test_damage_type_mapping() {
        let burn = StatusEffect::for_damage(DamageType::Magma, 50.0).unwrap();
        assert_eq!(burn.status, StatusType::Burn);
        assert!((burn.tick_damage - 5.0).abs() < 1e-5);
        assert_eq!(
            StatusEffect::for_damage(DamageType::Ice, 10.0).unwrap().status,
            StatusType::Slow
        );
        assert_eq!(
            StatusEffect::for_damage(DamageType::Bomb, 10.0).unwrap().status,
            StatusType::Knockback
        );
        assert_eq!(
            StatusEffect::for_damage(DamageType::Light, 10.0).unwrap().status,
            StatusType::Blind
        );
        assert!(StatusEffect::for_damage(DamageType::Physical, 10.0).is_none());
    }

    #[test]
    fn test_knockback_freezes_movement_and_blind_blocks_attacks() {
        let mut statuses = StatusEffects::default();
        assert_eq!(statuses.movement_multiplier(), 1.0);
        statuses.apply(StatusEffect::for_damage(DamageType::Bomb, 1.0).unwrap());
        assert_eq!(statuses.movement_multiplier(), 0.0);
        statuses.apply(StatusEffect::for_damage(DamageType::Light, 1.0).unwrap());
        assert!(!statuses.can_attack());
    }
}
