//! Elemental Powers
//!
//! Each of the five powers is a policy object implementing `ElementalPower`.
//! The trait's default `attack` method holds the protocol every tier follows:
//!
//! 1. Spend the attack in the `AbilityLedger` (cooldown and one use). If the
//!    ledger refuses, the call fails and nothing else happens.
//! 2. Run the power's tier-specific `execute_*` method, which spawns effects
//!    and runs immediate range or direct-hit checks.
//! 3. Log the use and return true.
//!
//! Powers never hold cooldown state themselves; the ledger is the single
//! source of truth.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::effects::{EffectHandle, EffectKind, EffectManager, Faction, TransientEffect};
use super::game_data::{PowerConfig, TierConfig};
use super::ledger::{AbilityLedger, AttackTier};
use super::player::PlayerFacade;
use super::resolver::CombatResolver;
use super::status::DamageType;
use super::utils::planar_direction;
use super::visuals::{VisualDescriptor, VisualShape, VisualSink};

pub mod bomb;
pub mod flame;
pub mod ice;
pub mod light;
pub mod magma;

pub use bomb::BombPower;
pub use flame::FlamePower;
pub use ice::IcePower;
pub use light::LightPower;
pub use magma::MagmaPower;

/// Distance ahead of the caster where projectiles appear.
const PROJECTILE_SPAWN_OFFSET: f32 = 1.0;

/// Lifetime of the cosmetic flash left by instant hits.
pub(crate) const IMPACT_PARTICLE_LIFETIME: f32 = 0.3;

/// The five elemental powers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerKind {
    Flame,
    Ice,
    Bomb,
    Light,
    Magma,
}

impl PowerKind {
    pub const ALL: [PowerKind; 5] = [
        PowerKind::Flame,
        PowerKind::Ice,
        PowerKind::Bomb,
        PowerKind::Light,
        PowerKind::Magma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerKind::Flame => "Flame",
            PowerKind::Ice => "Ice",
            PowerKind::Bomb => "Bomb",
            PowerKind::Light => "Light",
            PowerKind::Magma => "Magma",
        }
    }

    pub fn damage_type(&self) -> DamageType {
        match self {
            PowerKind::Flame => DamageType::Flame,
            PowerKind::Ice => DamageType::Ice,
            PowerKind::Bomb => DamageType::Bomb,
            PowerKind::Light => DamageType::Light,
            PowerKind::Magma => DamageType::Magma,
        }
    }

    /// Parse a power name as written in encounter configs
    pub fn from_name(name: &str) -> Option<Self> {
        PowerKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// Everything a power needs to carry out an attack.
pub struct AttackContext<'a> {
    pub ledger: &'a mut AbilityLedger,
    pub effects: &'a mut EffectManager,
    pub resolver: CombatResolver<'a>,
    pub visuals: &'a mut dyn VisualSink,
    pub player: &'a mut dyn PlayerFacade,
}

impl AttackContext<'_> {
    /// Register an effect together with its visual.
    pub fn spawn(&mut self, effect: TransientEffect, settings: &TierConfig, color: [f32; 3]) -> EffectHandle {
        let descriptor = visual_for(&effect, settings, color);
        self.effects.register(effect, Some(descriptor), self.visuals)
    }
}

/// One resolved attack: where it starts, where it goes and what it deals.
pub struct Cast<'c> {
    pub origin: Vec3,
    /// Flattened and normalized
    pub direction: Vec3,
    /// Tier damage from the ledger
    pub damage: f32,
    pub settings: &'c TierConfig,
    /// Combat log label, e.g. "Flame Special"
    pub label: String,
}

impl Cast<'_> {
    /// Point `distance` units ahead of the caster.
    pub fn ahead(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Projectile fired along `direction` using this tier's speed, lifetime and collider.
    pub fn projectile(&self, direction: Vec3, damage_type: DamageType) -> TransientEffect {
        let mut projectile = TransientEffect::projectile(
            self.origin + direction * PROJECTILE_SPAWN_OFFSET,
            direction * self.settings.speed,
            self.settings.lifetime,
            self.damage,
            damage_type,
            Faction::Player,
        )
        .with_label(self.label.clone());
        if self.settings.radius > 0.0 {
            projectile = projectile.with_collider_radius(self.settings.radius);
        }
        projectile
    }
}

/// Common interface of the five powers.
pub trait ElementalPower: Send + Sync {
    fn kind(&self) -> PowerKind;

    fn config(&self) -> &PowerConfig;

    /// Key of this power's record in the ledger
    fn owner_id(&self) -> &'static str {
        self.kind().name()
    }

    fn execute_basic(&self, ctx: &mut AttackContext, cast: &Cast);
    fn execute_special(&self, ctx: &mut AttackContext, cast: &Cast);
    fn execute_ultimate(&self, ctx: &mut AttackContext, cast: &Cast);

    /// Run `tier` from `origin` toward `direction`. Returns false, with no
    /// side effects, when the ledger refuses the attack.
    fn attack(&self, ctx: &mut AttackContext, tier: AttackTier, origin: Vec3, direction: Vec3) -> bool {
        let owner = self.owner_id();
        if !ctx.ledger.use_attack(owner, tier) {
            return false;
        }

        let config = self.config();
        let cast = Cast {
            origin,
            direction: planar_direction(direction),
            damage: ctx.ledger.damage(owner, tier),
            settings: config.tier(tier),
            label: format!("{} {}", self.kind().name(), tier.name()),
        };
        match tier {
            AttackTier::Basic => self.execute_basic(ctx, &cast),
            AttackTier::Special => self.execute_special(ctx, &cast),
            AttackTier::Ultimate => self.execute_ultimate(ctx, &cast),
        }

        ctx.resolver.log().log_ability(self.kind().name(), tier.name());
        debug!("{} used", cast.label);
        true
    }

    fn basic_attack(&self, ctx: &mut AttackContext, origin: Vec3, direction: Vec3) -> bool {
        self.attack(ctx, AttackTier::Basic, origin, direction)
    }

    fn special_attack(&self, ctx: &mut AttackContext, origin: Vec3, direction: Vec3) -> bool {
        self.attack(ctx, AttackTier::Special, origin, direction)
    }

    fn ultimate_attack(&self, ctx: &mut AttackContext, origin: Vec3, direction: Vec3) -> bool {
        self.attack(ctx, AttackTier::Ultimate, origin, direction)
    }
}

/// Build the policy object for `kind` from its configuration.
pub fn build_power(kind: PowerKind, config: PowerConfig) -> Box<dyn ElementalPower> {
    match kind {
        PowerKind::Flame => Box::new(FlamePower::new(config)),
        PowerKind::Ice => Box::new(IcePower::new(config)),
        PowerKind::Bomb => Box::new(BombPower::new(config)),
        PowerKind::Light => Box::new(LightPower::new(config)),
        PowerKind::Magma => Box::new(MagmaPower::new(config)),
    }
}

/// Visual request for an effect: the configured sprite if any, otherwise a
/// simple shape matching the effect's footprint.
pub fn visual_for(effect: &TransientEffect, settings: &TierConfig, color: [f32; 3]) -> VisualDescriptor {
    let shape = match &settings.sprite {
        Some(sprite) => VisualShape::Sprite(sprite.clone()),
        None => match &effect.kind {
            EffectKind::Projectile { collider_radius, .. } => VisualShape::Sphere {
                radius: *collider_radius,
            },
            EffectKind::AreaEffect { radius, .. } => VisualShape::Disc { radius: *radius },
            EffectKind::Particle { .. } => VisualShape::Sphere { radius: 0.3 },
            EffectKind::Trap { trigger_radius, .. } => VisualShape::Disc {
                radius: trigger_radius * 0.3,
            },
        },
    };
    VisualDescriptor::new(shape, effect.position, color)
}
