//! Magma: magma ball, lava pool and eruption.

use super::{AttackContext, Cast, ElementalPower, PowerKind};
use crate::engine::effects::TransientEffect;
use crate::engine::game_data::PowerConfig;
use crate::engine::status::DamageType;
use crate::engine::utils::radial_directions;

pub struct MagmaPower {
    config: PowerConfig,
}

impl MagmaPower {
    pub fn new(config: PowerConfig) -> Self {
        Self { config }
    }
}

impl ElementalPower for MagmaPower {
    fn kind(&self) -> PowerKind {
        PowerKind::Magma
    }

    fn config(&self) -> &PowerConfig {
        &self.config
    }

    fn execute_basic(&self, ctx: &mut AttackContext, cast: &Cast) {
        let ball = cast.projectile(cast.direction, DamageType::Magma);
        ctx.spawn(ball, cast.settings, self.config.color);
    }

    fn execute_special(&self, ctx: &mut AttackContext, cast: &Cast) {
        let pool = TransientEffect::area(
            cast.ahead(cast.settings.offset),
            cast.settings.radius,
            cast.settings.lifetime,
            cast.damage,
            DamageType::Magma,
        )
        .with_label(cast.label.clone());
        ctx.spawn(pool, cast.settings, self.config.color);
    }

    /// Eruption: direct hit on the closest enemy, then a ring of smaller lava
    /// pools around the caster.
    fn execute_ultimate(&self, ctx: &mut AttackContext, cast: &Cast) {
        ctx.resolver.check_direct_attack_hits(
            cast.origin,
            cast.settings.radius,
            cast.damage,
            DamageType::Magma,
            &cast.label,
        );

        let pool_damage = cast.damage / cast.settings.lifetime.max(1.0);
        for direction in radial_directions(cast.direction, cast.settings.count as usize) {
            let pool = TransientEffect::area(
                cast.origin + direction * cast.settings.offset,
                cast.settings.radius * 0.5,
                cast.settings.lifetime,
                pool_damage,
                DamageType::Magma,
            )
            .with_label(cast.label.clone());
            ctx.spawn(pool, cast.settings, self.config.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use crate::engine::effects::EffectKind;
    use crate::engine::ledger::AttackTier;
    use bevy::prelude::*;

    use super::*;

    #[test]
    fn test_eruption_hits_and_leaves_pools() {
        let mut harness = Harness::new();
        let enemy = harness.spawn_enemy(Vec3::new(1.5, 0.0, 0.0));
        let power = harness.equip(PowerKind::Magma);
        let count = power.config().ultimate.count as usize;

        assert!(harness.attack(power.as_ref(), AttackTier::Ultimate, Vec3::Z));

        let agent = harness.agents.get(enemy).unwrap();
        assert!(agent.health < agent.max_health);
        assert_eq!(harness.effects.len(), count);
        assert!(harness
            .effects
            .iter()
            .all(|(_, e)| matches!(e.kind, EffectKind::AreaEffect { .. })));
    }

    #[test]
    fn test_missing_sprite_still_spawns_pool() {
        let mut harness = Harness::new();
        let power = harness.equip(PowerKind::Magma);
        if let Some(sprite) = &power.config().special.sprite {
            harness.visuals.missing_sprites.push(sprite.clone());
        }

        assert!(harness.attack(power.as_ref(), AttackTier::Special, Vec3::Z));
        let (_, pool) = harness.effects.iter().next().unwrap();
        assert!(pool.visual.is_some());
    }
}
