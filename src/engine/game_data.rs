//! Data-Driven Power & Agent Configuration
//!
//! Power tiers and agent profiles are defined in RON files instead of being
//! hardcoded:
//! - `assets/config/powers.ron`: base power, uses, color and per-tier settings
//!   for each of the five powers
//! - `assets/config/agents.ron`: enemy and mini boss profiles
//!
//! A copy of both files is compiled into the crate (`GameData::bundled`) so the
//! engine also works when run from another directory.
//!
//! ## Usage
//! ```ignore
//! let data = load_game_data()?;
//! let flame = data.power(PowerKind::Flame).unwrap();
//! println!("Flame basic cooldown: {}", flame.basic.cooldown);
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::agents::boss::BossAbility;
use super::ledger::{AttackTier, TierCooldowns};
use super::powers::PowerKind;

const POWERS_PATH: &str = "assets/config/powers.ron";
const AGENTS_PATH: &str = "assets/config/agents.ron";

const BUNDLED_POWERS: &str = include_str!("../../assets/config/powers.ron");
const BUNDLED_AGENTS: &str = include_str!("../../assets/config/agents.ron");

fn default_one() -> f32 {
    1.0
}

/// Settings for one tier of a power.
///
/// Each power only reads the fields its attack uses; the rest keep their
/// defaults in the config file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TierConfig {
    /// Cooldown after use in seconds
    pub cooldown: f32,
    /// Projectile speed in units/second
    #[serde(default)]
    pub speed: f32,
    /// Area, splash or explosion radius
    #[serde(default)]
    pub radius: f32,
    /// Lifetime of the spawned effect in seconds
    #[serde(default)]
    pub lifetime: f32,
    /// Distance ahead of the caster where the attack lands
    #[serde(default)]
    pub offset: f32,
    /// Number of projectiles, pools or explosions
    #[serde(default)]
    pub count: u32,
    /// Delay between chained explosions in seconds
    #[serde(default)]
    pub interval: f32,
    /// Time before a trap arms
    #[serde(default)]
    pub arming_time: f32,
    /// Distance at which an armed trap goes off
    #[serde(default)]
    pub trigger_radius: f32,
    /// Duration of a self-buff in seconds
    #[serde(default)]
    pub duration: f32,
    /// Player speed multiplier while a self-buff lasts
    #[serde(default = "default_one")]
    pub speed_multiplier: f32,
    /// Sprite to request from the renderer (falls back to a simple shape)
    #[serde(default)]
    pub sprite: Option<String>,
}

/// Complete configuration of one power.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PowerConfig {
    /// Display name of the power
    pub name: String,
    /// Base value the tier damage is derived from
    pub power: f32,
    /// Uses available when equipped
    pub uses: u32,
    /// Base RGB color (0.0-1.0 range), cosmetic
    pub color: [f32; 3],
    pub basic: TierConfig,
    pub special: TierConfig,
    pub ultimate: TierConfig,
}

impl PowerConfig {
    pub fn tier(&self, tier: AttackTier) -> &TierConfig {
        match tier {
            AttackTier::Basic => &self.basic,
            AttackTier::Special => &self.special,
            AttackTier::Ultimate => &self.ultimate,
        }
    }

    pub fn cooldowns(&self) -> TierCooldowns {
        TierCooldowns {
            basic: self.basic.cooldown,
            special: self.special.cooldown,
            ultimate: self.ultimate.cooldown,
        }
    }
}

/// Tuning profile of an enemy or the mini boss.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    pub max_health: f32,
    /// Damage dealt to the player per attack
    pub attack_power: f32,
    pub attack_range: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Chase speed in units/second
    pub speed: f32,
    pub patrol_speed: f32,
    /// Patrol targets are picked within this radius of the spawn point
    pub patrol_radius: f32,
    /// Idle and patrolling agents start chasing inside this distance
    pub detection_range: f32,
    /// Expected transitions from Idle to Patrol per second
    pub idle_leave_rate: f32,
    /// Probability of going idle after reaching a patrol target
    pub idle_fallback_chance: f32,
    pub collider_radius: f32,
    /// Seconds between special abilities (mini boss only)
    #[serde(default)]
    pub ability_recharge_time: f32,
    /// Round-robin special abilities (mini boss only)
    #[serde(default)]
    pub abilities: Vec<BossAbility>,
}

/// Root structure for the powers.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct PowersConfig {
    pub powers: HashMap<PowerKind, PowerConfig>,
}

/// Root structure for the agents.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentsConfig {
    pub enemy: AgentProfile,
    pub boss: AgentProfile,
}

/// All tuning data for an encounter.
#[derive(Resource, Clone, Debug)]
pub struct GameData {
    powers: HashMap<PowerKind, PowerConfig>,
    pub enemy: AgentProfile,
    pub boss: AgentProfile,
}

impl GameData {
    /// Build from parsed config files, validating every entry.
    pub fn new(powers: PowersConfig, agents: AgentsConfig) -> Result<Self, String> {
        let data = Self {
            powers: powers.powers,
            enemy: agents.enemy,
            boss: agents.boss,
        };
        data.validate()?;
        Ok(data)
    }

    /// Parse both configs from RON source text.
    pub fn from_ron_str(powers: &str, agents: &str) -> Result<Self, String> {
        let powers: PowersConfig =
            ron::from_str(powers).map_err(|e| format!("Failed to parse powers config: {}", e))?;
        let agents: AgentsConfig =
            ron::from_str(agents).map_err(|e| format!("Failed to parse agents config: {}", e))?;
        Self::new(powers, agents)
    }

    /// The copy of the config files compiled into the crate.
    pub fn bundled() -> Result<Self, String> {
        Self::from_ron_str(BUNDLED_POWERS, BUNDLED_AGENTS)
    }

    /// Get the configuration for a power
    pub fn power(&self, kind: PowerKind) -> Option<&PowerConfig> {
        self.powers.get(&kind)
    }

    /// Check that every power is defined and that all values are usable
    pub fn validate(&self) -> Result<(), String> {
        let missing: Vec<PowerKind> = PowerKind::ALL
            .into_iter()
            .filter(|kind| !self.powers.contains_key(kind))
            .collect();
        if !missing.is_empty() {
            return Err(format!("Missing power definitions: {:?}", missing));
        }

        for (kind, config) in &self.powers {
            if config.power <= 0.0 {
                return Err(format!("{:?}: power must be positive", kind));
            }
            for tier in AttackTier::ALL {
                let tier_config = config.tier(tier);
                if tier_config.cooldown < 0.0 {
                    return Err(format!("{:?} {}: cooldown must not be negative", kind, tier.name()));
                }
                if tier_config.lifetime < 0.0 || tier_config.radius < 0.0 {
                    return Err(format!(
                        "{:?} {}: lifetime and radius must not be negative",
                        kind,
                        tier.name()
                    ));
                }
                if tier_config.arming_time > tier_config.lifetime && tier_config.trigger_radius > 0.0 {
                    return Err(format!(
                        "{:?} {}: trap arms after its lifetime has ended",
                        kind,
                        tier.name()
                    ));
                }
            }
        }

        Self::validate_profile(&self.enemy)?;
        Self::validate_profile(&self.boss)?;
        if self.boss.abilities.is_empty() || self.boss.ability_recharge_time <= 0.0 {
            return Err(format!(
                "{}: the boss needs at least one ability and a positive recharge time",
                self.boss.name
            ));
        }
        Ok(())
    }

    fn validate_profile(profile: &AgentProfile) -> Result<(), String> {
        if profile.max_health <= 0.0 {
            return Err(format!("{}: max_health must be positive", profile.name));
        }
        if profile.attack_range <= 0.0 || profile.collider_radius <= 0.0 {
            return Err(format!(
                "{}: attack_range and collider_radius must be positive",
                profile.name
            ));
        }
        if !(0.0..=1.0).contains(&profile.idle_fallback_chance) {
            return Err(format!(
                "{}: idle_fallback_chance must be within 0..=1",
                profile.name
            ));
        }
        Ok(())
    }
}

/// Load game data from `assets/config/`
pub fn load_game_data() -> Result<GameData, String> {
    load_game_data_from(Path::new(POWERS_PATH), Path::new(AGENTS_PATH))
}

/// Load game data from explicit file paths
pub fn load_game_data_from(powers_path: &Path, agents_path: &Path) -> Result<GameData, String> {
    let powers = std::fs::read_to_string(powers_path)
        .map_err(|e| format!("Failed to read {}: {}", powers_path.display(), e))?;
    let agents = std::fs::read_to_string(agents_path)
        .map_err(|e| format!("Failed to read {}: {}", agents_path.display(), e))?;

    let data = GameData::from_ron_str(&powers, &agents)?;
    info!(
        "Loaded {} power definitions from {}",
        data.powers.len(),
        powers_path.display()
    );
    Ok(data)
}

/// Loads `GameData` from `assets/config/` when the app is built.
pub struct GameDataPlugin;

impl Plugin for GameDataPlugin {
    fn build(&self, app: &mut App) {
        match load_game_data() {
            Ok(data) => {
                app.insert_resource(data);
            }
            Err(e) => {
                // Tuning data must be valid before any encounter starts
                panic!("Failed to load game data: {}", e);
            }
        }
    }
}
