//! Ice: shard, frost nova and blizzard.

use super::{AttackContext, Cast, ElementalPower, PowerKind};
use crate::engine::effects::TransientEffect;
use crate::engine::game_data::PowerConfig;
use crate::engine::status::DamageType;

/// Upward drift of the frost nova's cosmetic burst.
const NOVA_PARTICLE_DRIFT: f32 = 0.5;

pub struct IcePower {
    config: PowerConfig,
}

impl IcePower {
    pub fn new(config: PowerConfig) -> Self {
        Self { config }
    }
}

impl ElementalPower for IcePower {
    fn kind(&self) -> PowerKind {
        PowerKind::Ice
    }

    fn config(&self) -> &PowerConfig {
        &self.config
    }

    fn execute_basic(&self, ctx: &mut AttackContext, cast: &Cast) {
        let shard = cast.projectile(cast.direction, DamageType::Ice);
        ctx.spawn(shard, cast.settings, self.config.color);
    }

    /// Frost nova: everything around the caster is hit and slowed at once.
    fn execute_special(&self, ctx: &mut AttackContext, cast: &Cast) {
        ctx.resolver.check_enemies_in_range(
            cast.origin,
            cast.settings.radius,
            cast.damage,
            DamageType::Ice,
            &cast.label,
        );
        let burst = TransientEffect::particle(
            cast.origin,
            cast.settings.lifetime,
            NOVA_PARTICLE_DRIFT,
            DamageType::Ice,
        )
        .with_label(cast.label.clone());
        ctx.spawn(burst, cast.settings, self.config.color);
    }

    /// Blizzard: a lasting storm ahead of the caster.
    fn execute_ultimate(&self, ctx: &mut AttackContext, cast: &Cast) {
        let blizzard = TransientEffect::area(
            cast.ahead(cast.settings.offset),
            cast.settings.radius,
            cast.settings.lifetime,
            cast.damage / cast.settings.lifetime.max(1.0),
            DamageType::Ice,
        )
        .with_label(cast.label.clone());
        ctx.spawn(blizzard, cast.settings, self.config.color);
    }
}
