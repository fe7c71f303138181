//! Simulation Tick
//!
//! `Simulation` owns the whole encounter: ledger, effects, agents, player,
//! deferred tasks and the combat log. One call to `step(dt)` advances
//! everything by one frame, in this order:
//!
//! 1. Deferred tasks that are due (removals, flash reverts, explosions)
//! 2. Ledger cooldowns and player buffs
//! 3. Effect lifecycle (movement, expiry, trap checks)
//! 4. Effect collisions (projectile hits, area damage, enemy projectiles)
//! 5. Agent state machines
//! 6. Death sweep and encounter outcome
//!
//! Player input arrives between steps through `invoke`, `switch_power` and
//! the challenge methods.

use bevy::prelude::*;
use serde::Serialize;

use super::agents::{AgentContext, AgentId, AgentRegistry};
use super::constants::{
    MAX_LOADOUT, PLAYER_COLLIDER_RADIUS, PLAYER_ID, PLAYER_MAX_HEALTH, PLAYER_SPEED,
};
use super::deferred::{DeferredTask, DeferredTasks};
use super::effects::{EffectKind, EffectManager, Faction, TransientEffect};
use super::game_data::GameData;
use super::ledger::{AbilityLedger, AttackTier};
use super::player::{Player, PlayerFacade};
use super::powers::{build_power, AttackContext, ElementalPower, PowerKind};
use super::resolver::CombatResolver;
use super::rng::GameRng;
use super::utils::planar_distance;
use super::visuals::{release, spawn_with_fallback, NullVisuals, VisualDescriptor, VisualShape, VisualSink};
use crate::combat::log::{CombatLog, CombatLogEventType};

const ENEMY_COLOR: [f32; 3] = [0.8, 0.2, 0.2];
const BOSS_COLOR: [f32; 3] = [0.5, 0.1, 0.05];
const VOLLEY_COLOR: [f32; 3] = [1.0, 0.3, 0.0];
const EXPLOSION_COLOR: [f32; 3] = [1.0, 0.7, 0.2];

/// How an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EncounterOutcome {
    /// Every agent was defeated and removed
    Victory,
    /// The player died
    Defeat,
    /// Time ran out
    Draw,
}

impl EncounterOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            EncounterOutcome::Victory => "Victory",
            EncounterOutcome::Defeat => "Defeat",
            EncounterOutcome::Draw => "Draw",
        }
    }
}

/// The complete combat simulation of one encounter.
#[derive(Resource)]
pub struct Simulation {
    pub data: GameData,
    pub ledger: AbilityLedger,
    pub effects: EffectManager,
    pub agents: AgentRegistry,
    pub deferred: DeferredTasks,
    pub player: Player,
    pub log: CombatLog,
    pub rng: GameRng,
    visuals: Box<dyn VisualSink>,
    loadout: Vec<Box<dyn ElementalPower>>,
    active_slot: Option<usize>,
    agents_spawned: usize,
    elapsed: f32,
    outcome: Option<EncounterOutcome>,
}

impl Simulation {
    pub fn new(data: GameData, rng: GameRng, visuals: Box<dyn VisualSink>) -> Self {
        Self {
            data,
            ledger: AbilityLedger::new(),
            effects: EffectManager::new(),
            agents: AgentRegistry::new(),
            deferred: DeferredTasks::new(),
            player: Player::new(Vec3::ZERO, PLAYER_MAX_HEALTH, PLAYER_SPEED),
            log: CombatLog::default(),
            rng,
            visuals,
            loadout: Vec::new(),
            active_slot: None,
            agents_spawned: 0,
            elapsed: 0.0,
            outcome: None,
        }
    }

    /// Simulation without a renderer.
    pub fn headless(data: GameData, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::from_entropy(),
        };
        Self::new(data, rng, Box::new(NullVisuals::default()))
    }

    // ------------------------------------------------------------------
    // Encounter setup
    // ------------------------------------------------------------------

    pub fn spawn_enemy(&mut self, position: Vec3) -> AgentId {
        let id = self.agents.spawn_enemy(self.data.enemy.clone(), position);
        self.attach_agent_visual(id, ENEMY_COLOR, 0.5);
        id
    }

    pub fn spawn_boss(&mut self, position: Vec3) -> AgentId {
        let id = self.agents.spawn_boss(self.data.boss.clone(), position);
        self.attach_agent_visual(id, BOSS_COLOR, 1.0);
        id
    }

    fn attach_agent_visual(&mut self, id: AgentId, color: [f32; 3], radius: f32) {
        self.agents_spawned += 1;
        if let Some(agent) = self.agents.get_mut(id) {
            let descriptor = VisualDescriptor::new(
                VisualShape::Capsule {
                    radius,
                    height: radius * 3.6,
                },
                agent.position,
                color,
            );
            agent.visual = spawn_with_fallback(self.visuals.as_mut(), &descriptor);
        }
    }

    /// Add a power to the loadout and register its ledger record.
    ///
    /// Fails when the loadout is full or the power is already equipped. The
    /// first equipped power becomes active.
    pub fn equip(&mut self, kind: PowerKind) -> bool {
        if self.loadout.len() >= MAX_LOADOUT || self.loadout.iter().any(|p| p.kind() == kind) {
            return false;
        }
        let Some(config) = self.data.power(kind).cloned() else {
            warn!("No configuration for {:?}", kind);
            return false;
        };

        self.ledger
            .register(kind.name(), config.power, config.cooldowns(), config.uses);
        self.loadout.push(build_power(kind, config));
        if self.active_slot.is_none() {
            self.active_slot = Some(self.loadout.len() - 1);
        }
        self.log.log(
            CombatLogEventType::EncounterEvent,
            format!("{} equipped {}", PLAYER_ID, kind.name()),
        );
        true
    }

    /// Remove a power from the loadout and drop its ledger record.
    pub fn unequip(&mut self, kind: PowerKind) -> bool {
        let Some(slot) = self.loadout.iter().position(|p| p.kind() == kind) else {
            return false;
        };
        self.loadout.remove(slot);
        self.ledger.unregister(kind.name());

        self.active_slot = match self.active_slot {
            Some(active) if active == slot => {
                self.effects.cleanup_all(self.visuals.as_mut());
                if self.loadout.is_empty() {
                    None
                } else {
                    Some(0)
                }
            }
            Some(active) if active > slot => Some(active - 1),
            other => other,
        };
        true
    }

    pub fn loadout(&self) -> Vec<PowerKind> {
        self.loadout.iter().map(|p| p.kind()).collect()
    }

    pub fn active_power(&self) -> Option<PowerKind> {
        self.active_slot
            .and_then(|slot| self.loadout.get(slot))
            .map(|p| p.kind())
    }

    /// Make the power in `slot` active. Every active effect is cleaned up first.
    pub fn switch_power(&mut self, slot: usize) -> bool {
        if slot >= self.loadout.len() || self.active_slot == Some(slot) {
            return false;
        }
        self.effects.cleanup_all(self.visuals.as_mut());
        self.active_slot = Some(slot);
        let name = self.loadout[slot].kind().name();
        debug!("Switched to {}", name);
        self.log.log(
            CombatLogEventType::EncounterEvent,
            format!("{} switched to {}", PLAYER_ID, name),
        );
        true
    }

    // ------------------------------------------------------------------
    // Player input
    // ------------------------------------------------------------------

    /// Use `tier` of the active power toward `direction`.
    pub fn invoke(&mut self, tier: AttackTier, direction: Vec3) -> bool {
        if self.outcome.is_some() || !self.player.is_alive() {
            return false;
        }
        let Some(power) = self.active_slot.and_then(|slot| self.loadout.get(slot)) else {
            return false;
        };

        let origin = self.player.position;
        let mut ctx = AttackContext {
            ledger: &mut self.ledger,
            effects: &mut self.effects,
            resolver: CombatResolver::new(&mut self.agents, &mut self.deferred, &mut self.log),
            visuals: self.visuals.as_mut(),
            player: &mut self.player,
        };
        power.attack(&mut ctx, tier, origin, direction)
    }

    /// Start a side challenge. Agents stop building up attack pressure meanwhile.
    pub fn begin_challenge(&mut self) -> bool {
        if self.player.in_challenge {
            return false;
        }
        self.player.in_challenge = true;
        self.log.log(
            CombatLogEventType::EncounterEvent,
            format!("{} started a challenge", PLAYER_ID),
        );
        true
    }

    /// Finish the running challenge and grant `reward` extra uses to the active power.
    ///
    /// Returns false when no challenge is running, or when there is no active
    /// power to receive the reward (the challenge still ends).
    pub fn complete_challenge(&mut self, reward: u32) -> bool {
        if !self.player.in_challenge {
            return false;
        }
        self.player.in_challenge = false;
        let Some(kind) = self.active_power() else {
            warn!("Challenge completed with no active power; {} uses lost", reward);
            return false;
        };
        self.ledger.add_uses(kind.name(), reward);
        self.log.log(
            CombatLogEventType::EncounterEvent,
            format!("Challenge complete: {} gains {} uses", kind.name(), reward),
        );
        true
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the encounter by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 || self.outcome.is_some() {
            return;
        }
        self.elapsed += dt;
        self.log.match_time = self.elapsed;

        for task in self.deferred.advance(dt) {
            self.run_task(task);
        }

        self.ledger.tick(dt);
        self.player.tick(dt);

        {
            let mut resolver = CombatResolver::new(&mut self.agents, &mut self.deferred, &mut self.log);
            self.effects.update(dt, &mut resolver, self.visuals.as_mut());
        }
        self.resolve_effect_collisions(dt);

        let mut spawned: Vec<TransientEffect> = Vec::new();
        {
            let mut ctx = AgentContext {
                player: &mut self.player,
                rng: &mut self.rng,
                log: &mut self.log,
                spawned: &mut spawned,
            };
            for agent in self.agents.iter_mut() {
                agent.update(dt, &mut ctx);
            }
        }
        for effect in spawned {
            let descriptor = VisualDescriptor::new(
                VisualShape::Sphere { radius: 0.4 },
                effect.position,
                VOLLEY_COLOR,
            );
            self.effects
                .register(effect, Some(descriptor), self.visuals.as_mut());
        }

        self.agents.sweep_deaths(&mut self.deferred, &mut self.log);
        self.check_outcome();
    }

    fn run_task(&mut self, task: DeferredTask) {
        match task {
            DeferredTask::RemoveAgent { agent } => {
                if let Some(removed) = self.agents.remove(agent) {
                    if let Some(visual) = removed.visual {
                        release(self.visuals.as_mut(), visual);
                    }
                    self.log.log(
                        CombatLogEventType::Removal,
                        format!("{} removed", removed.name),
                    );
                }
            }
            DeferredTask::RevertFlash { agent } => {
                if let Some(agent) = self.agents.get_mut(agent) {
                    agent.hit_flash = false;
                }
            }
            DeferredTask::Explosion {
                position,
                radius,
                damage,
                damage_type,
                label,
                visual_lifetime,
            } => {
                CombatResolver::new(&mut self.agents, &mut self.deferred, &mut self.log)
                    .check_enemies_in_range(position, radius, damage, damage_type, &label);
                let blast = TransientEffect::particle(position, visual_lifetime, 0.0, damage_type)
                    .with_label(label);
                let descriptor =
                    VisualDescriptor::new(VisualShape::Sphere { radius }, position, EXPLOSION_COLOR);
                self.effects
                    .register(blast, Some(descriptor), self.visuals.as_mut());
            }
        }
    }

    /// Projectile hits, area damage and enemy projectiles against the player.
    fn resolve_effect_collisions(&mut self, dt: f32) {
        let mut spent = Vec::new();
        {
            let mut resolver = CombatResolver::new(&mut self.agents, &mut self.deferred, &mut self.log);
            for (handle, effect) in self.effects.iter() {
                match (&effect.kind, effect.source) {
                    (EffectKind::Projectile { collider_radius, .. }, Faction::Player) => {
                        let hit = resolver.check_projectile_hit(
                            effect.position,
                            *collider_radius,
                            effect.damage,
                            effect.damage_type,
                            &effect.label,
                        );
                        if hit.is_some() {
                            spent.push(handle);
                        }
                    }
                    (EffectKind::Projectile { collider_radius, .. }, Faction::Enemy) => {
                        let reach = collider_radius + PLAYER_COLLIDER_RADIUS;
                        if self.player.is_alive()
                            && planar_distance(effect.position, self.player.position) < reach
                        {
                            let remaining = self.player.take_damage(effect.damage);
                            resolver.log().log_damage(
                                effect.label.clone(),
                                PLAYER_ID.to_string(),
                                effect.label.clone(),
                                effect.damage,
                                remaining <= 0.0,
                                format!("{} hits {} for {:.0}", effect.label, PLAYER_ID, effect.damage),
                            );
                            spent.push(handle);
                        }
                    }
                    (EffectKind::AreaEffect { radius, .. }, Faction::Player) => {
                        resolver.apply_area_damage(
                            effect.position,
                            *radius,
                            effect.damage,
                            dt,
                            effect.damage_type,
                            &effect.label,
                        );
                    }
                    _ => {}
                }
            }
        }
        for handle in spent {
            self.effects.remove(handle, self.visuals.as_mut());
        }
    }

    fn check_outcome(&mut self) {
        let outcome = if !self.player.is_alive() {
            Some(EncounterOutcome::Defeat)
        } else if self.agents_spawned > 0 && self.agents.is_empty() {
            Some(EncounterOutcome::Victory)
        } else {
            None
        };
        if let Some(outcome) = outcome {
            self.finish(outcome);
        }
    }

    fn finish(&mut self, outcome: EncounterOutcome) {
        if self.outcome.is_some() {
            return;
        }
        info!("Encounter ended after {:.1}s: {}", self.elapsed, outcome.name());
        self.log.log(
            CombatLogEventType::EncounterEvent,
            format!("Encounter ended: {}", outcome.name()),
        );
        self.outcome = Some(outcome);
        // Stepping stops here, so nothing would retire the remaining effects
        self.teardown();
    }

    /// End the encounter as a draw (time limit reached).
    pub fn declare_draw(&mut self) {
        self.finish(EncounterOutcome::Draw);
    }

    pub fn outcome(&self) -> Option<EncounterOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Encounter time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Release every effect and agent visual and drop pending tasks.
    ///
    /// Runs automatically when the encounter ends.
    pub fn teardown(&mut self) {
        self.effects.cleanup_all(self.visuals.as_mut());
        for agent in self.agents.iter_mut() {
            if let Some(visual) = agent.visual.take() {
                release(self.visuals.as_mut(), visual);
            }
        }
        self.deferred.clear();
    }
}
