//! Agent registry
//!
//! Flat list of every agent in the encounter. The resolver queries it for
//! targets, the simulation updates it once per tick, and dead agents stay in
//! it (inactive) until their removal task fires.

use bevy::prelude::*;

use super::{Agent, AgentId, AgentState};
use crate::combat::log::CombatLog;
use crate::engine::constants::{BOSS_REMOVAL_DELAY, ENEMY_REMOVAL_DELAY};
use crate::engine::deferred::{DeferredTask, DeferredTasks};
use crate::engine::game_data::AgentProfile;

#[derive(Default, Debug)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
    next_id: u32,
    enemies_spawned: u32,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> AgentId {
        self.next_id += 1;
        AgentId(self.next_id)
    }

    /// Add a regular enemy; names are numbered in spawn order.
    pub fn spawn_enemy(&mut self, profile: AgentProfile, position: Vec3) -> AgentId {
        let id = self.allocate_id();
        self.enemies_spawned += 1;
        let name = format!("{} {}", profile.name, self.enemies_spawned);
        debug!("Spawning {} at {:?}", name, position);
        self.agents.push(Agent::enemy(id, name, profile, position));
        id
    }

    pub fn spawn_boss(&mut self, profile: AgentProfile, position: Vec3) -> AgentId {
        let id = self.allocate_id();
        let name = profile.name.clone();
        debug!("Spawning {} at {:?}", name, position);
        self.agents.push(Agent::mini_boss(id, name, profile, position));
        id
    }

    /// Insert a fully built agent (tests, custom encounters).
    pub fn insert(&mut self, agent: Agent) -> AgentId {
        let id = agent.id;
        self.next_id = self.next_id.max(id.0);
        self.agents.push(agent);
        id
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    /// Agents that can still be targeted.
    pub fn active(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Physically remove an agent, returning it so the caller can release its visual.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let index = self.agents.iter().position(|a| a.id == id)?;
        Some(self.agents.remove(index))
    }

    /// Log newly dead agents and queue their removal after the grace delay.
    ///
    /// Returns the ids that died since the last sweep.
    pub fn sweep_deaths(&mut self, deferred: &mut DeferredTasks, log: &mut CombatLog) -> Vec<AgentId> {
        let mut newly_dead = Vec::new();
        for agent in self.agents.iter_mut() {
            if agent.state != AgentState::Dead || agent.removal_scheduled {
                continue;
            }
            agent.removal_scheduled = true;
            let delay = if agent.is_boss() {
                BOSS_REMOVAL_DELAY
            } else {
                ENEMY_REMOVAL_DELAY
            };
            deferred.schedule(delay, DeferredTask::RemoveAgent { agent: agent.id });

            let message = match &agent.last_damage_source {
                Some(killer) => format!("{} has been slain by {}", agent.name, killer),
                None => format!("{} has died", agent.name),
            };
            log.log_death(agent.name.clone(), agent.last_damage_source.clone(), message);
            newly_dead.push(agent.id);
        }
        newly_dead
    }

    pub fn clear(&mut self) {
        self.agents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::constants::PLAYER_ID;
    use crate::engine::game_data::GameData;

    #[test]
    fn test_removal_is_scheduled_once_with_grace_delay() {
        let data = GameData::bundled().unwrap();
        let mut registry = AgentRegistry::new();
        let enemy = registry.spawn_enemy(data.enemy.clone(), Vec3::ZERO);
        let boss = registry.spawn_boss(data.boss.clone(), Vec3::X * 10.0);
        let mut deferred = DeferredTasks::new();
        let mut log = CombatLog::default();

        registry.get_mut(enemy).unwrap().take_damage(1000.0, PLAYER_ID);
        registry.get_mut(boss).unwrap().take_damage(1000.0, PLAYER_ID);
        assert_eq!(registry.sweep_deaths(&mut deferred, &mut log).len(), 2);
        assert!(registry.sweep_deaths(&mut deferred, &mut log).is_empty());
        assert_eq!(registry.active_count(), 0);
        assert_eq!(log.killing_blows(PLAYER_ID), 2);

        let after_one_second = deferred.advance(1.0);
        assert_eq!(after_one_second, vec![DeferredTask::RemoveAgent { agent: enemy }]);
        let after_two_seconds = deferred.advance(1.0);
        assert_eq!(after_two_seconds, vec![DeferredTask::RemoveAgent { agent: boss }]);
    }

    #[test]
    fn test_enemy_names_are_numbered() {
        let data = GameData::bundled().unwrap();
        let mut registry = AgentRegistry::new();
        let a = registry.spawn_enemy(data.enemy.clone(), Vec3::ZERO);
        let b = registry.spawn_enemy(data.enemy.clone(), Vec3::ZERO);
        assert_eq!(registry.get(a).unwrap().name, format!("{} 1", data.enemy.name));
        assert_eq!(registry.get(b).unwrap().name, format!("{} 2", data.enemy.name));
    }
}
