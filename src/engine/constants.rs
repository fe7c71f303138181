//! Combat Constants
//!
//! Centralized location for magic numbers used throughout the combat engine.
//! Tunable per-power and per-agent values live in `assets/config/*.ron`; the
//! values here are rules of the simulation itself.

// ============================================================================
// Damage Scaling
// ============================================================================

/// Basic tier damage multiplier applied to a power's base value.
pub const BASIC_DAMAGE_SCALE: f32 = 0.8;

/// Special tier damage multiplier applied to a power's base value.
pub const SPECIAL_DAMAGE_SCALE: f32 = 1.5;

/// Ultimate tier damage multiplier applied to a power's base value.
pub const ULTIMATE_DAMAGE_SCALE: f32 = 3.0;

/// Minimum fraction of current health a regular enemy loses per hit.
pub const ENEMY_DAMAGE_FLOOR: f32 = 0.25;

/// Minimum fraction of current health a boss loses per hit.
pub const BOSS_DAMAGE_FLOOR: f32 = 0.10;

// ============================================================================
// Timers
// ============================================================================

/// Denominator used in cooldown fractions when a tier has no cooldown.
pub const COOLDOWN_EPSILON: f32 = 1e-4;

/// Tolerance for accumulated timers, so 120 ticks of 1/60s reach 2.0s.
pub const TIMER_EPSILON: f32 = 1e-4;

/// Time the player must stay inside an agent's attack range before it may strike.
pub const ATTACK_DELAY: f32 = 2.0;

/// Every status effect is capped at this many seconds.
pub const MAX_STATUS_DURATION: f32 = 2.0;

/// Delay between an enemy's death and its removal from the world.
pub const ENEMY_REMOVAL_DELAY: f32 = 1.0;

/// Delay between the boss's death and its removal from the world.
pub const BOSS_REMOVAL_DELAY: f32 = 2.0;

/// How long an agent shows its hit flash.
pub const HIT_FLASH_DURATION: f32 = 0.1;

// ============================================================================
// Ranges & Colliders
// ============================================================================

/// Distance at which a patrolling agent counts as having reached its target.
pub const PATROL_ARRIVAL_DISTANCE: f32 = 0.5;

/// A regular enemy gives up the chase beyond this distance.
pub const DISENGAGE_DISTANCE: f32 = 15.0;

/// Default projectile collider radius.
pub const PROJECTILE_COLLIDER_RADIUS: f32 = 0.5;

/// Player collider radius, used for enemy projectiles.
pub const PLAYER_COLLIDER_RADIUS: f32 = 0.6;

/// Distance a knockback pushes an agent away from the hit centre.
pub const KNOCKBACK_DISTANCE: f32 = 2.0;

// ============================================================================
// Mini Boss Abilities
// ============================================================================

/// Ground Slam hits the player inside this radius.
pub const GROUND_SLAM_RADIUS: f32 = 5.0;

/// Ground Slam damage as a multiple of the boss's attack power.
pub const GROUND_SLAM_MULTIPLIER: f32 = 1.5;

/// Number of projectiles in a Fire Volley.
pub const FIRE_VOLLEY_COUNT: usize = 3;

/// Angle between neighbouring Fire Volley projectiles (radians).
pub const FIRE_VOLLEY_SPREAD: f32 = 0.26;

pub const FIRE_VOLLEY_SPEED: f32 = 12.0;

pub const FIRE_VOLLEY_LIFETIME: f32 = 2.0;

/// Fire Volley damage per projectile as a fraction of the boss's attack power.
pub const FIRE_VOLLEY_DAMAGE_RATIO: f32 = 0.5;

/// Maximum distance covered by a Charge.
pub const CHARGE_DISTANCE: f32 = 6.0;

// ============================================================================
// Player & Loadout
// ============================================================================

/// Name the player is logged under.
pub const PLAYER_ID: &str = "Player";

pub const PLAYER_MAX_HEALTH: f32 = 200.0;

/// Player movement speed in units/second.
pub const PLAYER_SPEED: f32 = 6.0;

/// Maximum number of powers the player can have equipped at once.
pub const MAX_LOADOUT: usize = 5;
