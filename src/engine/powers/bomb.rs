//! Bomb: thrown bomb, mine and carpet bombing.

use super::{AttackContext, Cast, ElementalPower, PowerKind};
use crate::engine::deferred::DeferredTask;
use crate::engine::effects::TransientEffect;
use crate::engine::game_data::PowerConfig;
use crate::engine::status::DamageType;

pub struct BombPower {
    config: PowerConfig,
}

impl BombPower {
    pub fn new(config: PowerConfig) -> Self {
        Self { config }
    }
}

impl ElementalPower for BombPower {
    fn kind(&self) -> PowerKind {
        PowerKind::Bomb
    }

    fn config(&self) -> &PowerConfig {
        &self.config
    }

    fn execute_basic(&self, ctx: &mut AttackContext, cast: &Cast) {
        let bomb = cast.projectile(cast.direction, DamageType::Bomb);
        ctx.spawn(bomb, cast.settings, self.config.color);
    }

    /// Mine: arms after a delay and goes off on the first enemy that walks
    /// into its trigger radius.
    fn execute_special(&self, ctx: &mut AttackContext, cast: &Cast) {
        let mine = TransientEffect::trap(
            cast.ahead(cast.settings.offset),
            cast.settings.arming_time,
            cast.settings.trigger_radius,
            cast.settings.lifetime,
            cast.damage,
            DamageType::Bomb,
        )
        .with_label(cast.label.clone());
        ctx.spawn(mine, cast.settings, self.config.color);
    }

    /// Carpet bombing: a staggered line of explosions along the aim direction.
    fn execute_ultimate(&self, ctx: &mut AttackContext, cast: &Cast) {
        for i in 0..cast.settings.count {
            let step = (i + 1) as f32;
            ctx.resolver.schedule(
                cast.settings.interval * step,
                DeferredTask::Explosion {
                    position: cast.ahead(cast.settings.offset * step),
                    radius: cast.settings.radius,
                    damage: cast.damage,
                    damage_type: DamageType::Bomb,
                    label: cast.label.clone(),
                    visual_lifetime: cast.settings.lifetime,
                },
            );
        }
    }
}
