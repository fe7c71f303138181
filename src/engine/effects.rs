//! Effect Lifecycle Manager
//!
//! Owns every transient effect (projectiles, area effects, particles, traps) in
//! a generational arena and advances them once per tick. Effects are plain data:
//! the variant decides how `update` moves them, so there is no per-effect
//! behaviour object to keep alive.
//!
//! ## Lifecycle
//! 1. `register` stores the effect and asks the renderer for its visual
//! 2. `update` advances every effect, newest first, and retires the expired ones
//! 3. `remove` retires an effect early (collisions); stale handles are ignored
//! 4. `cleanup_all` retires everything at once (power switch, teardown)
//!
//! Retiring an effect always removes and disposes its visual, exactly once.

use bevy::prelude::*;

use super::constants::{PROJECTILE_COLLIDER_RADIUS, TIMER_EPSILON};
use super::resolver::CombatResolver;
use super::status::DamageType;
use super::visuals::{release, spawn_with_fallback, VisualDescriptor, VisualHandle, VisualSink};

/// Who an effect belongs to. Player effects hit agents, enemy effects hit the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

/// Variant-specific state of an effect.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    Projectile {
        velocity: Vec3,
        collider_radius: f32,
    },
    AreaEffect {
        radius: f32,
        /// Cosmetic, fades with remaining lifetime
        opacity: f32,
    },
    Particle {
        /// Upward drift in units/second, cosmetic
        drift: f32,
    },
    Trap {
        arming_time: f32,
        trigger_radius: f32,
        armed: bool,
        /// Removed after the first tick it hits something
        single_use: bool,
        /// Set once the trap has hit something
        triggered: bool,
    },
}

/// A time-limited simulation object independent of any agent.
#[derive(Clone, Debug)]
pub struct TransientEffect {
    pub position: Vec3,
    /// Time since spawn
    pub elapsed: f32,
    pub total_lifetime: f32,
    pub damage: f32,
    pub damage_type: DamageType,
    pub source: Faction,
    /// Name used in the combat log ("Flame Basic", "Fire Volley")
    pub label: String,
    pub visual: Option<VisualHandle>,
    pub kind: EffectKind,
}

impl TransientEffect {
    fn new(
        kind: EffectKind,
        position: Vec3,
        lifetime: f32,
        damage: f32,
        damage_type: DamageType,
        source: Faction,
    ) -> Self {
        Self {
            position,
            elapsed: 0.0,
            total_lifetime: lifetime,
            damage,
            damage_type,
            source,
            label: damage_type.name().to_string(),
            visual: None,
            kind,
        }
    }

    pub fn projectile(
        position: Vec3,
        velocity: Vec3,
        lifetime: f32,
        damage: f32,
        damage_type: DamageType,
        source: Faction,
    ) -> Self {
        Self::new(
            EffectKind::Projectile {
                velocity,
                collider_radius: PROJECTILE_COLLIDER_RADIUS,
            },
            position,
            lifetime,
            damage,
            damage_type,
            source,
        )
    }

    pub fn area(position: Vec3, radius: f32, lifetime: f32, damage: f32, damage_type: DamageType) -> Self {
        Self::new(
            EffectKind::AreaEffect {
                radius,
                opacity: 1.0,
            },
            position,
            lifetime,
            damage,
            damage_type,
            Faction::Player,
        )
    }

    /// Purely cosmetic effect; never deals damage.
    pub fn particle(position: Vec3, lifetime: f32, drift: f32, damage_type: DamageType) -> Self {
        Self::new(
            EffectKind::Particle { drift },
            position,
            lifetime,
            0.0,
            damage_type,
            Faction::Player,
        )
    }

    pub fn trap(
        position: Vec3,
        arming_time: f32,
        trigger_radius: f32,
        lifetime: f32,
        damage: f32,
        damage_type: DamageType,
    ) -> Self {
        Self::new(
            EffectKind::Trap {
                arming_time,
                trigger_radius,
                armed: false,
                single_use: true,
                triggered: false,
            },
            position,
            lifetime,
            damage,
            damage_type,
            Faction::Player,
        )
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_collider_radius(mut self, radius: f32) -> Self {
        if let EffectKind::Projectile { collider_radius, .. } = &mut self.kind {
            *collider_radius = radius;
        }
        self
    }

    /// Keep a trap armed for its whole lifetime instead of spending it on the first hit.
    pub fn persistent(mut self) -> Self {
        if let EffectKind::Trap { single_use, .. } = &mut self.kind {
            *single_use = false;
        }
        self
    }

    pub fn remaining_lifetime(&self) -> f32 {
        (self.total_lifetime - self.elapsed).max(0.0)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed + TIMER_EPSILON >= self.total_lifetime
    }

    /// Whether the effect should stay in the registry after this tick.
    fn is_alive(&self) -> bool {
        if let EffectKind::Trap {
            single_use: true,
            triggered: true,
            ..
        } = self.kind
        {
            return false;
        }
        !self.is_expired()
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.kind, EffectKind::Trap { armed: true, .. })
    }
}

/// Generational handle into the effect arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectHandle {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    effect: Option<TransientEffect>,
}

/// Registry of active transient effects.
#[derive(Default)]
pub struct EffectManager {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live handles in insertion order
    order: Vec<EffectHandle>,
    /// Total effects retired since creation
    retired: usize,
}

impl EffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, spawning its visual. A missing sprite falls back to a
    /// simple shape; if no visual can be spawned at all the effect still runs.
    pub fn register(
        &mut self,
        mut effect: TransientEffect,
        descriptor: Option<VisualDescriptor>,
        visuals: &mut dyn VisualSink,
    ) -> EffectHandle {
        if let Some(descriptor) = descriptor {
            effect.visual = spawn_with_fallback(visuals, &descriptor);
        }

        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.effect = Some(effect);
                EffectHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    effect: Some(effect),
                });
                EffectHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.order.push(handle);
        handle
    }

    pub fn get(&self, handle: EffectHandle) -> Option<&TransientEffect> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.effect.as_ref())
    }

    pub fn get_mut(&mut self, handle: EffectHandle) -> Option<&mut TransientEffect> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.effect.as_mut())
    }

    pub fn contains(&self, handle: EffectHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of active effects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of effects retired so far
    pub fn retired_count(&self) -> usize {
        self.retired
    }

    /// Active effects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (EffectHandle, &TransientEffect)> {
        self.order
            .iter()
            .filter_map(move |handle| self.get(*handle).map(|effect| (*handle, effect)))
    }

    /// Live handles in insertion order
    pub fn handles(&self) -> Vec<EffectHandle> {
        self.order.clone()
    }

    fn take(&mut self, handle: EffectHandle) -> Option<TransientEffect> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let effect = slot.effect.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(effect)
    }

    fn retire(&mut self, handle: EffectHandle, visuals: &mut dyn VisualSink) -> bool {
        match self.take(handle) {
            Some(effect) => {
                if let Some(visual) = effect.visual {
                    release(visuals, visual);
                }
                self.retired += 1;
                true
            }
            None => false,
        }
    }

    /// Retire an effect early. Returns false if it was already gone.
    pub fn remove(&mut self, handle: EffectHandle, visuals: &mut dyn VisualSink) -> bool {
        let Some(position) = self.order.iter().position(|h| *h == handle) else {
            return false;
        };
        self.order.remove(position);
        self.retire(handle, visuals)
    }

    /// Advance every effect by `dt` and retire the ones that are no longer alive.
    ///
    /// Iterates newest first so removing the current entry never skips one that
    /// has not been visited yet. Armed traps run their range check through
    /// `resolver` on every tick.
    pub fn update(&mut self, dt: f32, resolver: &mut CombatResolver, visuals: &mut dyn VisualSink) {
        let mut i = self.order.len();
        while i > 0 {
            i -= 1;
            let handle = self.order[i];
            let alive = match self.get_mut(handle) {
                Some(effect) => {
                    advance(effect, dt, resolver);
                    effect.is_alive()
                }
                None => false,
            };
            if !alive {
                self.order.remove(i);
                self.retire(handle, visuals);
            }
        }
    }

    /// Retire every active effect immediately.
    pub fn cleanup_all(&mut self, visuals: &mut dyn VisualSink) {
        let handles = std::mem::take(&mut self.order);
        let count = handles.len();
        for handle in handles {
            self.retire(handle, visuals);
        }
        if count > 0 {
            debug!("Cleaned up {} active effects", count);
        }
    }
}

/// Per-variant advance rule.
fn advance(effect: &mut TransientEffect, dt: f32, resolver: &mut CombatResolver) {
    effect.elapsed += dt;
    let expired = effect.is_expired();
    let remaining_fraction = if effect.total_lifetime > 0.0 {
        (effect.remaining_lifetime() / effect.total_lifetime).clamp(0.0, 1.0)
    } else {
        0.0
    };

    match &mut effect.kind {
        EffectKind::Projectile { velocity, .. } => {
            effect.position += *velocity * dt;
        }
        EffectKind::AreaEffect { opacity, .. } => {
            *opacity = remaining_fraction;
        }
        EffectKind::Particle { drift } => {
            effect.position.y += *drift * dt;
        }
        EffectKind::Trap {
            arming_time,
            trigger_radius,
            armed,
            triggered,
            ..
        } => {
            if !*armed && effect.elapsed + TIMER_EPSILON >= *arming_time {
                *armed = true;
                debug!("{} armed at {:?}", effect.label, effect.position);
            }
            if *armed && !expired {
                let hits = resolver.check_enemies_in_range(
                    effect.position,
                    *trigger_radius,
                    effect.damage,
                    effect.damage_type,
                    &effect.label,
                );
                if !hits.is_empty() {
                    *triggered = true;
                }
            }
        }
    }
}
