//! Mini Boss
//!
//! The mini boss runs the same ground behaviour as a regular enemy with two
//! differences: it never disengages, and every `ability_recharge_time`
//! seconds (while the player is within detection range) it enters `Special`
//! and fires the next ability of its round-robin list.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Agent, AgentContext, AgentId, AgentKind, AgentState};
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::engine::constants::{
    CHARGE_DISTANCE, FIRE_VOLLEY_COUNT, FIRE_VOLLEY_DAMAGE_RATIO, FIRE_VOLLEY_LIFETIME,
    FIRE_VOLLEY_SPEED, FIRE_VOLLEY_SPREAD, GROUND_SLAM_MULTIPLIER, GROUND_SLAM_RADIUS, PLAYER_ID,
    TIMER_EPSILON,
};
use crate::engine::effects::{Faction, TransientEffect};
use crate::engine::game_data::AgentProfile;
use crate::engine::status::DamageType;
use crate::engine::utils::{planar_direction, planar_distance, step_toward};

/// Special abilities of the mini boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossAbility {
    /// Shockwave that hits the player if they stand close
    GroundSlam,
    /// Spread of fire projectiles aimed at the player
    FireVolley,
    /// Dash toward the player, striking on arrival
    Charge,
}

impl BossAbility {
    pub fn name(&self) -> &'static str {
        match self {
            BossAbility::GroundSlam => "Ground Slam",
            BossAbility::FireVolley => "Fire Volley",
            BossAbility::Charge => "Charge",
        }
    }
}

/// Ability rotation state.
#[derive(Clone, Debug)]
pub struct BossBrain {
    pub abilities: Vec<BossAbility>,
    pub next_ability: usize,
    /// Time since the last special ability
    pub ability_timer: f32,
    pub recharge_time: f32,
    pub abilities_used: u32,
}

impl BossBrain {
    pub fn new(abilities: Vec<BossAbility>, recharge_time: f32) -> Self {
        Self {
            abilities,
            next_ability: 0,
            ability_timer: 0.0,
            recharge_time,
            abilities_used: 0,
        }
    }

    pub fn is_charged(&self) -> bool {
        self.ability_timer + TIMER_EPSILON >= self.recharge_time
    }

    /// Take the current ability and advance the rotation.
    fn rotate(&mut self) -> Option<BossAbility> {
        if self.abilities.is_empty() {
            return None;
        }
        let ability = self.abilities[self.next_ability % self.abilities.len()];
        self.next_ability = (self.next_ability + 1) % self.abilities.len();
        self.ability_timer = 0.0;
        Some(ability)
    }
}

impl Agent {
    /// Create the mini boss at `position`, starting Idle.
    pub fn mini_boss(id: AgentId, name: String, profile: AgentProfile, position: Vec3) -> Self {
        let brain = BossBrain::new(profile.abilities.clone(), profile.ability_recharge_time);
        Self::new(id, name, AgentKind::MiniBoss(brain), profile, position)
    }

    pub fn boss_brain(&self) -> Option<&BossBrain> {
        match &self.kind {
            AgentKind::MiniBoss(brain) => Some(brain),
            AgentKind::Enemy => None,
        }
    }

    /// Charge the ability timer and enter `Special` once it is full and the
    /// player is within detection range. No-op for regular enemies.
    pub(super) fn check_special(
        &mut self,
        distance: f32,
        dt: f32,
        log: &mut CombatLog,
    ) {
        let detection_range = self.profile.detection_range;
        let ready = match &mut self.kind {
            AgentKind::MiniBoss(brain) => {
                brain.ability_timer += dt;
                brain.is_charged() && distance <= detection_range
            }
            AgentKind::Enemy => false,
        };
        if ready && self.state != AgentState::Special {
            self.set_state(AgentState::Special, log);
        }
    }

    pub(super) fn update_special(&mut self, player_position: Vec3, ctx: &mut AgentContext) {
        let ability = match &mut self.kind {
            AgentKind::MiniBoss(brain) => brain.rotate(),
            AgentKind::Enemy => None,
        };

        if let Some(ability) = ability {
            if self.statuses.can_attack() {
                self.execute_ability(ability, player_position, ctx);
            } else {
                ctx.log.log(
                    CombatLogEventType::AbilityUsed,
                    format!("{}'s {} fizzles (blinded)", self.name, ability.name()),
                );
            }
        }

        // Charge may have moved the boss
        let distance = planar_distance(self.position, player_position);
        let next = if distance <= self.profile.detection_range {
            AgentState::Chase
        } else {
            AgentState::Idle
        };
        self.set_state(next, ctx.log);
    }

    fn execute_ability(&mut self, ability: BossAbility, player_position: Vec3, ctx: &mut AgentContext) {
        info!("{} uses {}", self.name, ability.name());
        ctx.log.log(
            CombatLogEventType::AbilityUsed,
            format!("{} uses {}", self.name, ability.name()),
        );
        if let AgentKind::MiniBoss(brain) = &mut self.kind {
            brain.abilities_used += 1;
        }

        match ability {
            BossAbility::GroundSlam => {
                if planar_distance(self.position, player_position) <= GROUND_SLAM_RADIUS {
                    self.strike_player(
                        ability,
                        self.profile.attack_power * GROUND_SLAM_MULTIPLIER,
                        ctx,
                    );
                }
            }
            BossAbility::FireVolley => {
                let aim = planar_direction(player_position - self.position);
                let damage = self.profile.attack_power * FIRE_VOLLEY_DAMAGE_RATIO;
                let half = (FIRE_VOLLEY_COUNT as f32 - 1.0) / 2.0;
                for i in 0..FIRE_VOLLEY_COUNT {
                    let angle = (i as f32 - half) * FIRE_VOLLEY_SPREAD;
                    let direction = Quat::from_rotation_y(angle) * aim;
                    let projectile = TransientEffect::projectile(
                        self.position + direction * self.collider_radius,
                        direction * FIRE_VOLLEY_SPEED,
                        FIRE_VOLLEY_LIFETIME,
                        damage,
                        DamageType::Physical,
                        Faction::Enemy,
                    )
                    .with_label(format!("{} {}", self.name, ability.name()));
                    ctx.spawned.push(projectile);
                }
            }
            BossAbility::Charge => {
                if self.statuses.movement_multiplier() > 0.0 {
                    // Stop at the edge of attack range rather than on top of the player
                    let stop = (planar_distance(self.position, player_position) - self.attack_range * 0.5)
                        .clamp(0.0, CHARGE_DISTANCE);
                    self.position = step_toward(self.position, player_position, stop);
                }
                if planar_distance(self.position, player_position) <= self.attack_range {
                    self.strike_player(ability, self.profile.attack_power, ctx);
                }
            }
        }
    }

    fn strike_player(&mut self, ability: BossAbility, damage: f32, ctx: &mut AgentContext) {
        let remaining = ctx.player.take_damage(damage);
        self.attacks_performed += 1;
        ctx.log.log_damage(
            self.name.clone(),
            PLAYER_ID.to_string(),
            ability.name().to_string(),
            damage,
            remaining <= 0.0,
            format!("{}'s {} hits {} for {:.0}", self.name, ability.name(), PLAYER_ID, damage),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_data::GameData;
    use crate::engine::player::Player;
    use crate::engine::rng::GameRng;

    fn boss_at(position: Vec3) -> Agent {
        let profile = GameData::bundled().unwrap().boss;
        Agent::mini_boss(AgentId(99), "Mini Boss".into(), profile, position)
    }

    #[test]
    fn test_abilities_rotate_round_robin() {
        let mut brain = BossBrain::new(
            vec![BossAbility::GroundSlam, BossAbility::FireVolley, BossAbility::Charge],
            5.0,
        );
        let used: Vec<_> = (0..4).filter_map(|_| brain.rotate()).collect();
        assert_eq!(
            used,
            vec![
                BossAbility::GroundSlam,
                BossAbility::FireVolley,
                BossAbility::Charge,
                BossAbility::GroundSlam
            ]
        );
    }

    #[test]
    fn test_boss_uses_special_after_recharge() {
        let mut boss = boss_at(Vec3::new(3.0, 0.0, 0.0));
        let recharge = boss.boss_brain().unwrap().recharge_time;
        let mut player = Player::new(Vec3::ZERO, 1000.0, 5.0);
        let mut rng = GameRng::from_seed(3);
        let mut log = CombatLog::default();
        let mut spawned = Vec::new();
        let mut ctx = AgentContext {
            player: &mut player,
            rng: &mut rng,
            log: &mut log,
            spawned: &mut spawned,
        };

        let ticks = (recharge * 60.0) as usize + 1;
        for _ in 0..ticks {
            boss.update(1.0 / 60.0, &mut ctx);
        }

        let brain = boss.boss_brain().unwrap();
        assert_eq!(brain.abilities_used, 1);
        assert_eq!(brain.next_ability, 1);
        assert_ne!(boss.state, AgentState::Special);
        // Ground Slam lands: the player stands 3 units away
        assert!(player.health < 1000.0);
    }

    #[test]
    fn test_fire_volley_spawns_enemy_projectiles() {
        let mut boss = boss_at(Vec3::new(6.0, 0.0, 0.0));
        if let AgentKind::MiniBoss(brain) = &mut boss.kind {
            brain.next_ability = 1;
            brain.ability_timer = brain.recharge_time;
        }
        let mut player = Player::new(Vec3::ZERO, 1000.0, 5.0);
        let mut rng = GameRng::from_seed(3);
        let mut log = CombatLog::default();
        let mut spawned = Vec::new();
        let mut ctx = AgentContext {
            player: &mut player,
            rng: &mut rng,
            log: &mut log,
            spawned: &mut spawned,
        };
        boss.update(1.0 / 60.0, &mut ctx);

        assert_eq!(spawned.len(), FIRE_VOLLEY_COUNT);
        assert!(spawned.iter().all(|e| e.source == Faction::Enemy));
    }

    #[test]
    fn test_boss_never_disengages() {
        let mut boss = boss_at(Vec3::ZERO);
        boss.state = AgentState::Chase;
        let mut player = Player::new(Vec3::new(60.0, 0.0, 0.0), 100.0, 5.0);
        let mut rng = GameRng::from_seed(3);
        let mut log = CombatLog::default();
        let mut spawned = Vec::new();
        let mut ctx = AgentContext {
            player: &mut player,
            rng: &mut rng,
            log: &mut log,
            spawned: &mut spawned,
        };
        for _ in 0..10 {
            boss.update(1.0 / 60.0, &mut ctx);
        }
        assert_eq!(boss.state, AgentState::Chase);
    }
}
