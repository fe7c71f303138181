//! Ground behaviour shared by enemies and the mini boss: idle, patrol, chase
//! and melee attack.

use bevy::prelude::*;

use super::{Agent, AgentContext, AgentId, AgentKind, AgentState};
use crate::engine::constants::{DISENGAGE_DISTANCE, PATROL_ARRIVAL_DISTANCE, PLAYER_ID};
use crate::engine::game_data::AgentProfile;
use crate::engine::utils::planar_distance;

impl Agent {
    /// Create a regular enemy at `position`, starting Idle.
    pub fn enemy(id: AgentId, name: String, profile: AgentProfile, position: Vec3) -> Self {
        Self::new(id, name, AgentKind::Enemy, profile, position)
    }

    fn pick_patrol_target(&mut self, ctx: &mut AgentContext) -> Vec3 {
        let target = ctx
            .rng
            .point_in_radius(self.spawn_point, self.profile.patrol_radius);
        self.patrol_target = Some(target);
        target
    }

    pub(super) fn update_idle(&mut self, distance: f32, dt: f32, ctx: &mut AgentContext) {
        if distance <= self.profile.detection_range {
            self.set_state(AgentState::Chase, ctx.log);
            return;
        }
        if ctx.rng.chance_per_second(self.profile.idle_leave_rate, dt) {
            self.pick_patrol_target(ctx);
            self.set_state(AgentState::Patrol, ctx.log);
        }
    }

    pub(super) fn update_patrol(&mut self, distance: f32, dt: f32, ctx: &mut AgentContext) {
        if distance <= self.profile.detection_range {
            self.set_state(AgentState::Chase, ctx.log);
            return;
        }

        let target = match self.patrol_target {
            Some(target) => target,
            None => self.pick_patrol_target(ctx),
        };
        self.move_toward(target, self.profile.patrol_speed, dt);

        if planar_distance(self.position, target) < PATROL_ARRIVAL_DISTANCE {
            if ctx.rng.chance(self.profile.idle_fallback_chance) {
                self.patrol_target = None;
                self.set_state(AgentState::Idle, ctx.log);
            } else {
                self.pick_patrol_target(ctx);
            }
        }
    }

    pub(super) fn update_chase(
        &mut self,
        distance: f32,
        player_position: Vec3,
        dt: f32,
        ctx: &mut AgentContext,
    ) {
        // The mini boss never gives up the chase
        if !self.is_boss() && distance > DISENGAGE_DISTANCE {
            self.pick_patrol_target(ctx);
            self.set_state(AgentState::Patrol, ctx.log);
            return;
        }
        if distance <= self.attack_range {
            self.set_state(AgentState::Attack, ctx.log);
            return;
        }
        self.move_toward(player_position, self.profile.speed, dt);
    }

    pub(super) fn update_attack(&mut self, distance: f32, ctx: &mut AgentContext) {
        if distance > self.attack_range {
            self.set_state(AgentState::Chase, ctx.log);
            return;
        }
        if self.attack_cooldown_remaining <= 0.0 && self.proximity_gate_open() {
            self.perform_attack(ctx);
        }
    }

    /// Strike the player. Blinded agents cannot attack.
    pub(super) fn perform_attack(&mut self, ctx: &mut AgentContext) -> bool {
        if !self.statuses.can_attack() {
            return false;
        }
        let damage = self.profile.attack_power;
        let remaining = ctx.player.take_damage(damage);
        self.attacks_performed += 1;
        self.attack_cooldown_remaining = self.profile.attack_cooldown;

        ctx.log.log_damage(
            self.name.clone(),
            PLAYER_ID.to_string(),
            "Melee".to_string(),
            damage,
            remaining <= 0.0,
            format!("{} hits {} for {:.0}", self.name, PLAYER_ID, damage),
        );
        true
    }
}
