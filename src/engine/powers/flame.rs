//! Flame: fireball, flame wave and inferno.

use super::{AttackContext, Cast, ElementalPower, PowerKind};
use crate::engine::effects::TransientEffect;
use crate::engine::game_data::PowerConfig;
use crate::engine::status::DamageType;

pub struct FlamePower {
    config: PowerConfig,
}

impl FlamePower {
    pub fn new(config: PowerConfig) -> Self {
        Self { config }
    }
}

impl ElementalPower for FlamePower {
    fn kind(&self) -> PowerKind {
        PowerKind::Flame
    }

    fn config(&self) -> &PowerConfig {
        &self.config
    }

    /// Fireball projectile along the aim direction.
    fn execute_basic(&self, ctx: &mut AttackContext, cast: &Cast) {
        let fireball = cast.projectile(cast.direction, DamageType::Flame);
        ctx.spawn(fireball, cast.settings, self.config.color);
    }

    /// Flame wave: burning area ahead of the caster.
    fn execute_special(&self, ctx: &mut AttackContext, cast: &Cast) {
        let wave = TransientEffect::area(
            cast.ahead(cast.settings.offset),
            cast.settings.radius,
            cast.settings.lifetime,
            cast.damage,
            DamageType::Flame,
        )
        .with_label(cast.label.clone());
        ctx.spawn(wave, cast.settings, self.config.color);
    }

    /// Inferno: immediate blast around the caster, then a burning area that
    /// spreads another helping of the tier damage over its lifetime.
    fn execute_ultimate(&self, ctx: &mut AttackContext, cast: &Cast) {
        ctx.resolver.check_enemies_in_range(
            cast.origin,
            cast.settings.radius,
            cast.damage,
            DamageType::Flame,
            &cast.label,
        );
        let afterburn = TransientEffect::area(
            cast.origin,
            cast.settings.radius,
            cast.settings.lifetime,
            cast.damage / cast.settings.lifetime.max(1.0),
            DamageType::Flame,
        )
        .with_label(cast.label.clone());
        ctx.spawn(afterburn, cast.settings, self.config.color);
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
    fn test_basic_spawns_projectile_and_spends_use() {
        let mut harness = Harness::new();
        let power = harness.equip(PowerKind::Flame);
        let uses = harness.ledger.uses_remaining("Flame");

        assert!(harness.attack(power.as_ref(), AttackTier::Basic, Vec3::X));
        assert_eq!(harness.ledger.uses_remaining("Flame"), uses - 1);
        assert_eq!(harness.effects.len(), 1);
        let (_, effect) = harness.effects.iter().next().unwrap();
        assert!(matches!(effect.kind, EffectKind::Projectile { .. }));
        assert_eq!(effect.damage, 32.0);
    }

    #[test]
    fn test_refused_attack_has_no_side_effects() {
        let mut harness = Harness::new();
        let power = harness.equip(PowerKind::Flame);
        assert!(harness.attack(power.as_ref(), AttackTier::Basic, Vec3::X));
        let uses = harness.ledger.uses_remaining("Flame");

        assert!(!harness.attack(power.as_ref(), AttackTier::Basic, Vec3::X));
        assert_eq!(harness.effects.len(), 1);
        assert_eq!(harness.ledger.uses_remaining("Flame"), uses);
        assert_eq!(harness.log.ability_uses("Flame"), 1);
    }

    #[test]
    fn test_inferno_hits_immediately_and_leaves_area() {
        let mut harness = Harness::new();
        let enemy = harness.spawn_enemy(Vec3::new(2.0, 0.0, 0.0));
        let power = harness.equip(PowerKind::Flame);

        assert!(harness.attack(power.as_ref(), AttackTier::Ultimate, Vec3::Z));
        let agent = harness.agents.get(enemy).unwrap();
        assert!(agent.health < agent.max_health);
        assert!(harness
            .effects
            .iter()
            .any(|(_, e)| matches!(e.kind, EffectKind::AreaEffect { .. })));
    }
}
