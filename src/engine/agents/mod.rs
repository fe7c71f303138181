//! Agent State Machine
//!
//! Enemies and the mini boss share one `Agent` type and one per-tick update.
//! Each tick, while the agent is active:
//!
//! 0. Status effects tick (burn damage, expiry)
//! 1. The proximity timer grows while the player stays inside attack range
//!    (paused during a side challenge) and resets once they leave
//! 2. Once the timer reaches `ATTACK_DELAY` the agent switches to Attack and
//!    strikes immediately if its cooldown allows
//! 3. The current state runs (see `enemy.rs` for the shared states and
//!    `boss.rs` for the mini boss's Special)
//! 4. The attack cooldown counts down
//!
//! Death is terminal: `take_damage` flips `is_active` off and moves the agent
//! to `Dead`. The registry schedules the physical removal afterwards.

use bevy::prelude::*;

use super::constants::{ATTACK_DELAY, PLAYER_ID, TIMER_EPSILON};
use super::effects::TransientEffect;
use super::game_data::AgentProfile;
use super::player::PlayerFacade;
use super::rng::GameRng;
use super::status::StatusEffects;
use super::utils::{planar_distance, step_toward};
use super::visuals::VisualHandle;
use crate::combat::log::{CombatLog, CombatLogEventType};

pub mod boss;
pub mod enemy;
pub mod registry;

pub use boss::{BossAbility, BossBrain};
pub use registry::AgentRegistry;

/// Stable identifier of an agent within one encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

/// AI states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    Patrol,
    Chase,
    Attack,
    /// Mini boss only: executing a special ability
    Special,
    Dead,
}

/// Regular enemy or mini boss.
#[derive(Clone, Debug)]
pub enum AgentKind {
    Enemy,
    MiniBoss(BossBrain),
}

/// Everything an agent may touch during its update.
pub struct AgentContext<'a> {
    pub player: &'a mut dyn PlayerFacade,
    pub rng: &'a mut GameRng,
    pub log: &'a mut CombatLog,
    /// Effects requested this tick (boss volleys); registered by the caller
    pub spawned: &'a mut Vec<TransientEffect>,
}

/// An enemy or the mini boss.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    /// Name used in the combat log
    pub name: String,
    pub kind: AgentKind,
    pub profile: AgentProfile,
    pub health: f32,
    pub max_health: f32,
    pub position: Vec3,
    /// Patrol targets are picked around this point
    pub spawn_point: Vec3,
    pub state: AgentState,
    pub patrol_target: Option<Vec3>,
    pub attack_range: f32,
    pub attack_cooldown_remaining: f32,
    /// Time the player has continuously spent inside attack range
    pub proximity_timer: f32,
    /// Whether the player was inside attack range last tick (edge detection)
    pub player_in_range: bool,
    pub is_active: bool,
    pub statuses: StatusEffects,
    pub collider_radius: f32,
    pub visual: Option<VisualHandle>,
    pub hit_flash: bool,
    pub attacks_performed: u32,
    pub damage_taken: f32,
    /// Who dealt the most recent damage (killer tracking)
    pub last_damage_source: Option<String>,
    /// Set once the registry has queued the removal
    pub removal_scheduled: bool,
}

impl Agent {
    fn new(id: AgentId, name: String, kind: AgentKind, profile: AgentProfile, position: Vec3) -> Self {
        Self {
            id,
            name,
            kind,
            health: profile.max_health,
            max_health: profile.max_health,
            position,
            spawn_point: position,
            state: AgentState::Idle,
            patrol_target: None,
            attack_range: profile.attack_range,
            attack_cooldown_remaining: 0.0,
            proximity_timer: 0.0,
            player_in_range: false,
            is_active: true,
            statuses: StatusEffects::default(),
            collider_radius: profile.collider_radius,
            visual: None,
            hit_flash: false,
            attacks_performed: 0,
            damage_taken: 0.0,
            last_damage_source: None,
            removal_scheduled: false,
            profile,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, AgentKind::MiniBoss(_))
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply damage and return the amount actually taken.
    ///
    /// Inactive agents take nothing. Reaching zero health deactivates the agent
    /// and moves it to `Dead`, exactly once.
    pub fn take_damage(&mut self, amount: f32, source: &str) -> f32 {
        if !self.is_active || amount <= 0.0 {
            return 0.0;
        }
        let applied = amount.min(self.health);
        self.health -= applied;
        self.damage_taken += applied;
        self.last_damage_source = Some(source.to_string());

        if self.health <= 0.0 {
            self.health = 0.0;
            self.is_active = false;
            self.state = AgentState::Dead;
            self.proximity_timer = 0.0;
            info!("{} has been defeated by {}", self.name, source);
        }
        applied
    }

    /// Whether the player has stayed in range long enough to be attacked.
    pub fn proximity_gate_open(&self) -> bool {
        self.proximity_timer + TIMER_EPSILON >= ATTACK_DELAY
    }

    pub(crate) fn set_state(&mut self, next: AgentState, log: &mut CombatLog) {
        if self.state == next || self.state == AgentState::Dead {
            return;
        }
        debug!("{}: {:?} -> {:?}", self.name, self.state, next);
        log.log(
            CombatLogEventType::StateChange,
            format!("{}: {:?} -> {:?}", self.name, self.state, next),
        );
        self.state = next;
    }

    /// Move toward `target` at `speed`, scaled by slows and frozen by knockback.
    pub(crate) fn move_toward(&mut self, target: Vec3, speed: f32, dt: f32) {
        let step = speed * self.statuses.movement_multiplier() * dt;
        if step > 0.0 {
            self.position = step_toward(self.position, target, step);
        }
    }

    /// Advance the agent by one tick.
    pub fn update(&mut self, dt: f32, ctx: &mut AgentContext) {
        if !self.is_active {
            return;
        }

        // 0. Status effects
        let burn = self.statuses.tick(dt);
        if burn > 0.0 {
            let applied = self.take_damage(burn, PLAYER_ID);
            ctx.log.log_periodic_damage(PLAYER_ID, "Burn", applied);
            if !self.is_active {
                return;
            }
        }

        // 1. Proximity timer
        let player_position = ctx.player.position();
        let distance = planar_distance(self.position, player_position);
        self.update_proximity(distance, dt, ctx);

        // 2. Proximity gate forces an attack
        if self.proximity_gate_open() && self.state != AgentState::Attack {
            self.set_state(AgentState::Attack, ctx.log);
            if self.attack_cooldown_remaining <= 0.0 {
                self.perform_attack(ctx);
            }
        }

        // Boss ability timer may override the current state
        self.check_special(distance, dt, ctx.log);

        // 3. Per-state update
        match self.state {
            AgentState::Idle => self.update_idle(distance, dt, ctx),
            AgentState::Patrol => self.update_patrol(distance, dt, ctx),
            AgentState::Chase => self.update_chase(distance, player_position, dt, ctx),
            AgentState::Attack => self.update_attack(distance, ctx),
            AgentState::Special => self.update_special(player_position, ctx),
            AgentState::Dead => {}
        }

        // 4. Attack cooldown
        self.attack_cooldown_remaining = (self.attack_cooldown_remaining - dt).max(0.0);
    }

    fn update_proximity(&mut self, distance: f32, dt: f32, ctx: &mut AgentContext) {
        if distance <= self.attack_range {
            if !self.player_in_range {
                self.player_in_range = true;
                debug!("Player entered {}'s attack range", self.name);
            }
            if !ctx.player.is_in_challenge() {
                self.proximity_timer += dt;
            }
        } else {
            if self.player_in_range {
                self.player_in_range = false;
                debug!("Player left {}'s attack range", self.name);
            }
            self.proximity_timer = 0.0;
        }
    }
}
