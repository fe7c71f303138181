//! Integration tests for the effect lifecycle manager
//!
//! These tests verify that:
//! - Effects expire at their lifetime and their visuals are disposed exactly once
//! - Stale handles never touch a newer effect in the same slot
//! - Traps only deal damage once armed and expire on schedule

use bevy::prelude::*;
use elemental_isle::combat::log::CombatLog;
use elemental_isle::engine::agents::AgentRegistry;
use elemental_isle::engine::deferred::DeferredTasks;
use elemental_isle::engine::effects::{EffectHandle, EffectKind, EffectManager, Faction, TransientEffect};
use elemental_isle::engine::game_data::GameData;
use elemental_isle::engine::resolver::CombatResolver;
use elemental_isle::engine::status::DamageType;
use elemental_isle::engine::visuals::{RecordingVisuals, VisualDescriptor, VisualShape};

const TICK: f32 = 1.0 / 60.0;

/// Everything `EffectManager::update` needs
struct Arena {
    effects: EffectManager,
    agents: AgentRegistry,
    deferred: DeferredTasks,
    log: CombatLog,
    visuals: RecordingVisuals,
}

impl Arena {
    fn new() -> Self {
        Self {
            effects: EffectManager::new(),
            agents: AgentRegistry::new(),
            deferred: DeferredTasks::new(),
            log: CombatLog::default(),
            visuals: RecordingVisuals::new(),
        }
    }

    fn spawn(&mut self, effect: TransientEffect) -> EffectHandle {
        let descriptor = VisualDescriptor::new(
            VisualShape::Sphere { radius: 0.3 },
            effect.position,
            [1.0, 1.0, 1.0],
        );
        self.effects.register(effect, Some(descriptor), &mut self.visuals)
    }

    fn update(&mut self, dt: f32) {
        let mut resolver = CombatResolver::new(&mut self.agents, &mut self.deferred, &mut self.log);
        self.effects.update(dt, &mut resolver, &mut self.visuals);
    }
}

// =============================================================================
// Lifetime
// =============================================================================

#[test]
fn test_all_effects_retire_and_dispose_exactly_once() {
    let mut arena = Arena::new();
    for i in 0..10 {
        let position = Vec3::new(i as f32, 0.0, 0.0);
        arena.spawn(TransientEffect::particle(position, 0.5, 1.0, DamageType::Flame));
    }
    assert_eq!(arena.effects.len(), 10);
    assert_eq!(arena.visuals.live_count(), 10);

    for _ in 0..29 {
        arena.update(TICK);
    }
    assert_eq!(arena.effects.len(), 10, "nothing expires before 0.5s");

    for _ in 0..2 {
        arena.update(TICK);
    }
    assert!(arena.effects.is_empty());
    assert_eq!(arena.effects.retired_count(), 10);
    assert_eq!(arena.visuals.live_count(), 0);
    for (handle, _) in &arena.visuals.spawned {
        assert_eq!(arena.visuals.dispose_count(*handle), 1);
    }

    // Further updates and a cleanup must not dispose anything again
    arena.update(TICK);
    arena.effects.cleanup_all(&mut arena.visuals);
    for (handle, _) in &arena.visuals.spawned {
        assert_eq!(arena.visuals.dispose_count(*handle), 1);
    }
}

#[test]
fn test_mixed_lifetimes_retire_independently() {
    let mut arena = Arena::new();
    let short = arena.spawn(TransientEffect::area(Vec3::ZERO, 2.0, 0.25, 0.0, DamageType::Ice));
    let long = arena.spawn(TransientEffect::area(Vec3::X, 2.0, 1.0, 0.0, DamageType::Ice));

    for _ in 0..20 {
        arena.update(TICK);
    }
    assert!(!arena.effects.contains(short));
    assert!(arena.effects.contains(long));

    match &arena.effects.get(long).unwrap().kind {
        EffectKind::AreaEffect { opacity, .. } => assert!(*opacity < 1.0 && *opacity > 0.0),
        other => panic!("unexpected kind {:?}", other),
    }
}

#[test]
fn test_projectile_moves_along_velocity() {
    let mut arena = Arena::new();
    let handle = arena.spawn(TransientEffect::projectile(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, 10.0),
        2.0,
        5.0,
        DamageType::Flame,
        Faction::Player,
    ));
    arena.update(0.5);
    let position = arena.effects.get(handle).unwrap().position;
    assert!((position.z - 5.0).abs() < 1e-5);
}

// =============================================================================
// Handles
// =============================================================================

#[test]
fn test_stale_handle_does_not_affect_reused_slot() {
    let mut arena = Arena::new();
    let first = arena.spawn(TransientEffect::particle(Vec3::ZERO, 1.0, 0.0, DamageType::Light));
    assert!(arena.effects.remove(first, &mut arena.visuals));
    assert!(!arena.effects.remove(first, &mut arena.visuals), "second removal is a no-op");

    let second = arena.spawn(TransientEffect::particle(Vec3::ZERO, 1.0, 0.0, DamageType::Light));
    assert_ne!(first, second);
    assert!(!arena.effects.remove(first, &mut arena.visuals));
    assert!(arena.effects.contains(second));
    assert_eq!(arena.effects.len(), 1);
}

#[test]
fn test_cleanup_all_retires_everything() {
    let mut arena = Arena::new();
    for _ in 0..4 {
        arena.spawn(TransientEffect::area(Vec3::ZERO, 1.0, 10.0, 1.0, DamageType::Magma));
    }
    arena.effects.cleanup_all(&mut arena.visuals);
    assert!(arena.effects.is_empty());
    assert_eq!(arena.visuals.live_count(), 0);
    assert_eq!(arena.visuals.removed.len(), 4);
}

// =============================================================================
// Traps
// =============================================================================

#[test]
fn test_trap_arms_damages_and_expires() {
    let data = GameData::bundled().unwrap();
    let mut arena = Arena::new();
    let enemy = arena.agents.spawn_enemy(data.enemy.clone(), Vec3::new(1.0, 0.0, 0.0));
    let max_health = arena.agents.get(enemy).unwrap().max_health;

    let trap = arena.spawn(
        TransientEffect::trap(Vec3::ZERO, 0.5, 2.0, 3.0, 5.0, DamageType::Physical).persistent(),
    );

    // Not armed yet: no damage
    for _ in 0..20 {
        arena.update(TICK);
    }
    assert!(!arena.effects.get(trap).unwrap().is_armed());
    assert_eq!(arena.agents.get(enemy).unwrap().health, max_health);

    // Armed: damages every tick while the enemy stands in it
    for _ in 0..15 {
        arena.update(TICK);
    }
    assert!(arena.effects.get(trap).unwrap().is_armed());
    assert!(arena.agents.get(enemy).unwrap().health < max_health);

    // Move the enemy away and let the trap run out
    arena.agents.get_mut(enemy).unwrap().position = Vec3::new(50.0, 0.0, 0.0);
    for _ in 0..150 {
        arena.update(TICK);
    }
    assert!(!arena.effects.contains(trap));
    assert_eq!(arena.visuals.live_count(), 0);
}
