//! Light: lance, radiance and radiant burst.

use super::{AttackContext, Cast, ElementalPower, PowerKind, IMPACT_PARTICLE_LIFETIME};
use crate::engine::effects::TransientEffect;
use crate::engine::game_data::PowerConfig;
use crate::engine::status::DamageType;
use crate::engine::utils::radial_directions;

pub struct LightPower {
    config: PowerConfig,
}

impl LightPower {
    pub fn new(config: PowerConfig) -> Self {
        Self { config }
    }
}

impl ElementalPower for LightPower {
    fn kind(&self) -> PowerKind {
        PowerKind::Light
    }

    fn config(&self) -> &PowerConfig {
        &self.config
    }

    /// Lance: strikes the nearest enemy just ahead of the caster.
    fn execute_basic(&self, ctx: &mut AttackContext, cast: &Cast) {
        let tip = cast.ahead(cast.settings.offset);
        ctx.resolver.check_direct_attack_hits(
            tip,
            cast.settings.radius,
            cast.damage,
            DamageType::Light,
            &cast.label,
        );
        let flash = TransientEffect::particle(tip, cast.settings.lifetime, 0.0, DamageType::Light)
            .with_label(cast.label.clone());
        ctx.spawn(flash, cast.settings, self.config.color);
    }

    /// Radiance: speeds the player up and blinds enemies in a splash ahead.
    /// Nothing is spawned at the cast point itself.
    fn execute_special(&self, ctx: &mut AttackContext, cast: &Cast) {
        ctx.player
            .apply_speed_multiplier(cast.settings.speed_multiplier, cast.settings.duration);

        let splash = cast.ahead(cast.settings.offset);
        ctx.resolver.check_enemies_in_range(
            splash,
            cast.settings.radius,
            cast.damage,
            DamageType::Light,
            &cast.label,
        );
        let glow = TransientEffect::particle(
            splash,
            cast.settings.lifetime.max(IMPACT_PARTICLE_LIFETIME),
            0.0,
            DamageType::Light,
        )
        .with_label(cast.label.clone());
        ctx.spawn(glow, cast.settings, self.config.color);
    }

    /// Radiant burst: a ring of light projectiles around the caster.
    fn execute_ultimate(&self, ctx: &mut AttackContext, cast: &Cast) {
        for direction in radial_directions(cast.direction, cast.settings.count as usize) {
            let ray = cast.projectile(direction, DamageType::Light);
            ctx.spawn(ray, cast.settings, self.config.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use crate::engine::effects::EffectKind;
    use crate::engine::ledger::AttackTier;
    use crate::engine::player::PlayerFacade;
    use crate::engine::status::StatusType;
    use bevy::prelude::*;

    use super::*;

    #[test]
    fn test_radiance_buffs_player_without_effect_at_cast_point() {
        let mut harness = Harness::new();
        let power = harness.equip(PowerKind::Light);
        let settings = power.config().special.clone();
        let enemy = harness.spawn_enemy(Vec3::new(0.0, 0.0, settings.offset));
        let base_speed = harness.player.current_speed();

        assert!(harness.attack(power.as_ref(), AttackTier::Special, Vec3::Z));

        assert!((harness.player.current_speed() - base_speed * settings.speed_multiplier).abs() < 1e-5);
        assert!(harness.agents.get(enemy).unwrap().statuses.has(StatusType::Blind));
        for (_, effect) in harness.effects.iter() {
            assert_ne!(effect.position, harness.player.position());
        }
    }

    #[test]
    fn test_radiant_burst_fires_a_ring() {
        let mut harness = Harness::new();
        let power = harness.equip(PowerKind::Light);
        let count = power.config().ultimate.count as usize;

        assert!(harness.attack(power.as_ref(), AttackTier::Ultimate, Vec3::X));
        assert_eq!(harness.effects.len(), count);

        let sum: Vec3 = harness
            .effects
            .iter()
            .map(|(_, e)| match e.kind {
                EffectKind::Projectile { velocity, .. } => velocity.normalize(),
                _ => Vec3::ZERO,
            })
            .sum();
        // Evenly spread directions cancel out
        assert!(sum.length() < 1e-3);
    }
}
