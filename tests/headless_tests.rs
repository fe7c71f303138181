//! Integration tests for headless encounter execution
//!
//! These tests verify that:
//! - Headless encounters run to completion
//! - Encounter results are accessible programmatically
//! - Seeded RNG produces deterministic results

use elemental_isle::engine::game_data::GameData;
use elemental_isle::engine::simulation::EncounterOutcome;
use elemental_isle::headless::{
    build_simulation, simulate_encounter, AgentResult, EncounterConfig, EncounterResult,
};

/// Helper to create a basic encounter config
fn create_config(loadout: Vec<&str>, enemy_count: usize, seed: Option<u64>) -> EncounterConfig {
    EncounterConfig {
        loadout: loadout.into_iter().map(String::from).collect(),
        enemy_count,
        spawn_radius: 12.0,
        include_boss: false,
        challenge_reward: 5,
        output_path: None,
        max_duration_secs: 90.0, // Short duration for tests
        tick_rate: 60.0,
        random_seed: seed,
    }
}

// =============================================================================
// Full encounters
// =============================================================================

#[test]
fn test_single_enemy_encounter_is_won() {
    let config = create_config(vec!["Flame", "Ice"], 1, Some(12345));
    let result = simulate_encounter(config, GameData::bundled().unwrap()).unwrap();

    assert_eq!(result.outcome, EncounterOutcome::Victory);
    assert!(result.duration > 0.0 && result.duration < 90.0);
    assert!(result.player_final_health > 0.0);
    assert_eq!(result.agents.len(), 1);
    assert_eq!(result.agents_defeated(), 1);
    assert!(result.abilities_used > 0);
    assert_eq!(result.random_seed, Some(12345));
}

#[test]
fn test_seeded_encounters_are_deterministic() {
    let run = || {
        let config = create_config(vec!["Bomb", "Light"], 2, Some(42));
        simulate_encounter(config, GameData::bundled().unwrap()).unwrap()
    };
    let first = run();
    let second = run();

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.duration, second.duration);
    assert_eq!(first.player_final_health, second.player_final_health);
    assert_eq!(first.abilities_used, second.abilities_used);
}

#[test]
fn test_encounter_times_out_as_draw() {
    let mut config = create_config(vec!["Ice"], 1, Some(3));
    // The player never gets close enough to land anything in one second
    config.spawn_radius = 40.0;
    config.max_duration_secs = 1.0;

    let result = simulate_encounter(config, GameData::bundled().unwrap()).unwrap();
    assert_eq!(result.outcome, EncounterOutcome::Draw);
    assert!(result.duration >= 1.0);
    assert_eq!(result.agents_defeated(), 0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = create_config(vec!["Flame", "Flame"], 1, None);
    assert!(simulate_encounter(config, GameData::bundled().unwrap()).is_err());
}

// =============================================================================
// Setup
// =============================================================================

#[test]
fn test_build_simulation_places_roster() {
    let mut config = create_config(vec!["Flame", "Ice", "Bomb"], 4, Some(1));
    config.include_boss = true;
    let simulation = build_simulation(&config, GameData::bundled().unwrap()).unwrap();

    assert_eq!(simulation.agents.len(), 5);
    assert_eq!(simulation.agents.iter().filter(|a| a.is_boss()).count(), 1);
    assert_eq!(simulation.loadout().len(), 3);
    for agent in simulation.agents.iter().filter(|a| !a.is_boss()) {
        assert!((agent.position.length() - 12.0).abs() < 1e-3);
    }
}

#[test]
fn test_config_with_seed() {
    let config = create_config(vec!["Flame", "Magma"], 3, Some(42));

    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.loadout.len(), 2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_without_seed() {
    let config = create_config(vec!["Light"], 1, None);

    assert!(config.random_seed.is_none());
}

#[test]
fn test_result_fields() {
    let result = EncounterResult {
        outcome: EncounterOutcome::Defeat,
        duration: 30.0,
        player_final_health: 0.0,
        agents: vec![
            AgentResult {
                name: "Island Raider 1".to_string(),
                is_boss: false,
                max_health: 100.0,
                final_health: 0.0,
                survived: false,
                attacks_performed: 4,
                damage_taken: 100.0,
            },
            AgentResult {
                name: "Magma Golem".to_string(),
                is_boss: true,
                max_health: 600.0,
                final_health: 420.0,
                survived: true,
                attacks_performed: 9,
                damage_taken: 180.0,
            },
        ],
        abilities_used: 12,
        random_seed: Some(12345),
    };

    assert_eq!(result.agents_defeated(), 1);
    assert_eq!(result.outcome.name(), "Defeat");
    assert_eq!(result.random_seed, Some(12345));
}
