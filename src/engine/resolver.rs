//! Combat Resolver
//!
//! Connects effects and direct attacks to the agents they hit. A resolver is
//! a short-lived borrow of the agent registry, the deferred queue and the
//! combat log; the simulation builds one whenever something may deal damage.
//!
//! ## Damage floor
//! A hit never takes less than a fixed share of the target's *current*
//! health: `effective = max(nominal, health * pct)` with `pct` 0.25 for
//! enemies and 0.10 for the boss. Area effects apply the floor to their
//! per-second value and scale the result by the tick length. Burn skips the
//! floor entirely.

use bevy::prelude::*;

use super::agents::{Agent, AgentId, AgentRegistry};
use super::constants::{
    BOSS_DAMAGE_FLOOR, ENEMY_DAMAGE_FLOOR, HIT_FLASH_DURATION, KNOCKBACK_DISTANCE, PLAYER_ID,
};
use super::deferred::{DeferredTask, DeferredTasks};
use super::status::{DamageType, StatusEffect, StatusType};
use super::utils::{planar_direction, planar_distance};
use crate::combat::log::{CombatLog, CombatLogEventType};

/// Apply the percentage damage floor.
pub fn effective_damage(nominal: f32, current_health: f32, is_boss: bool) -> f32 {
    if nominal <= 0.0 {
        return 0.0;
    }
    let floor = if is_boss {
        BOSS_DAMAGE_FLOOR
    } else {
        ENEMY_DAMAGE_FLOOR
    };
    nominal.max(current_health * floor)
}

/// Borrowed view used to resolve hits for one batch of effects.
pub struct CombatResolver<'a> {
    agents: &'a mut AgentRegistry,
    deferred: &'a mut DeferredTasks,
    log: &'a mut CombatLog,
}

impl<'a> CombatResolver<'a> {
    pub fn new(
        agents: &'a mut AgentRegistry,
        deferred: &'a mut DeferredTasks,
        log: &'a mut CombatLog,
    ) -> Self {
        Self {
            agents,
            deferred,
            log,
        }
    }

    pub fn agents(&self) -> &AgentRegistry {
        &*self.agents
    }

    pub fn log(&mut self) -> &mut CombatLog {
        &mut *self.log
    }

    /// Queue delayed secondary behaviour (chained explosions).
    pub fn schedule(&mut self, delay: f32, task: DeferredTask) {
        self.deferred.schedule(delay, task);
    }

    fn targets_within(&self, position: Vec3, radius: f32) -> Vec<AgentId> {
        self.agents
            .active()
            .filter(|agent| planar_distance(agent.position, position) <= radius)
            .map(|agent| agent.id)
            .collect()
    }

    /// Hit every active agent within `radius` of `position`.
    ///
    /// Returns the ids of the agents that were hit.
    pub fn check_enemies_in_range(
        &mut self,
        position: Vec3,
        radius: f32,
        damage: f32,
        damage_type: DamageType,
        label: &str,
    ) -> Vec<AgentId> {
        let targets = self.targets_within(position, radius);
        for id in &targets {
            self.apply_hit(*id, damage, damage_type, position, label);
        }
        targets
    }

    /// Hit the nearest active agent whose body is within `range` of `position`.
    pub fn check_direct_attack_hits(
        &mut self,
        position: Vec3,
        range: f32,
        damage: f32,
        damage_type: DamageType,
        label: &str,
    ) -> bool {
        let nearest = self
            .agents
            .active()
            .map(|agent| (agent.id, planar_distance(agent.position, position) - agent.collider_radius))
            .filter(|(_, gap)| *gap <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id);

        match nearest {
            Some(id) => self.apply_hit(id, damage, damage_type, position, label).is_some(),
            None => false,
        }
    }

    /// First active agent a projectile at `position` collides with, if any.
    ///
    /// The hit lands when the planar distance is below the sum of both colliders.
    pub fn check_projectile_hit(
        &mut self,
        position: Vec3,
        collider_radius: f32,
        damage: f32,
        damage_type: DamageType,
        label: &str,
    ) -> Option<AgentId> {
        let target = self
            .agents
            .active()
            .find(|agent| planar_distance(agent.position, position) < collider_radius + agent.collider_radius)
            .map(|agent| agent.id)?;
        self.apply_hit(target, damage, damage_type, position, label)?;
        Some(target)
    }

    /// Per-tick damage from an area effect; no hit flash, no knockback.
    ///
    /// Returns the number of agents damaged.
    pub fn apply_area_damage(
        &mut self,
        position: Vec3,
        radius: f32,
        damage_per_second: f32,
        dt: f32,
        damage_type: DamageType,
        label: &str,
    ) -> usize {
        let targets = self.targets_within(position, radius);
        let mut damaged = 0;
        for id in targets {
            let Some(agent) = self.agents.get_mut(id) else {
                continue;
            };
            if let Some(status) = StatusEffect::for_damage(damage_type, damage_per_second) {
                if status.status != StatusType::Knockback {
                    agent.statuses.apply(status);
                }
            }
            let amount = effective_damage(damage_per_second, agent.health, agent.is_boss()) * dt;
            let applied = agent.take_damage(amount, PLAYER_ID);
            if applied > 0.0 {
                self.log.log_periodic_damage(PLAYER_ID, label, applied);
                damaged += 1;
            }
        }
        damaged
    }

    /// Resolve one discrete hit on `agent`: status effect, floored damage and
    /// hit flash. Returns the damage taken, or `None` for inactive targets.
    pub fn apply_hit(
        &mut self,
        agent: AgentId,
        damage: f32,
        damage_type: DamageType,
        origin: Vec3,
        label: &str,
    ) -> Option<f32> {
        let target = self.agents.get_mut(agent).filter(|a| a.is_active)?;

        if let Some(status) = StatusEffect::for_damage(damage_type, damage) {
            apply_status(target, status, origin, self.log);
        }

        let effective = effective_damage(damage, target.health, target.is_boss());
        let applied = target.take_damage(effective, PLAYER_ID);
        let killing_blow = !target.is_active;
        target.hit_flash = true;
        let name = target.name.clone();

        self.log.log_damage(
            PLAYER_ID.to_string(),
            name.clone(),
            label.to_string(),
            applied,
            killing_blow,
            format!("{}'s {} hits {} for {:.0}", PLAYER_ID, label, name, applied),
        );
        self.deferred
            .schedule(HIT_FLASH_DURATION, DeferredTask::RevertFlash { agent });
        Some(applied)
    }
}

fn apply_status(target: &mut Agent, status: StatusEffect, origin: Vec3, log: &mut CombatLog) {
    if status.status == StatusType::Knockback {
        let away = planar_direction(target.position - origin);
        target.position += away * KNOCKBACK_DISTANCE;
    }
    target.statuses.apply(status);
    log.log(
        CombatLogEventType::StatusApplied,
        format!("{} is affected by {:?}", target.name, status.status),
    );
}
