//! Unit tests for combat log query and aggregation methods
//!
//! These tests verify that the CombatLog correctly:
//! - Aggregates discrete and periodic damage by ability
//! - Counts killing blows and power uses
//! - Saves the encounter summary and entries as JSON

use elemental_isle::combat::log::{
    AgentMetadata, CombatLog, CombatLogEventType, EncounterMetadata, StructuredEventData,
};
use regex::Regex;

fn create_test_log() -> CombatLog {
    CombatLog::default()
}

fn hit(log: &mut CombatLog, source: &str, target: &str, ability: &str, amount: f32, killing: bool) {
    log.log_damage(
        source.to_string(),
        target.to_string(),
        ability.to_string(),
        amount,
        killing,
        "Test message".to_string(),
    );
}

// =============================================================================
// Damage Aggregation Tests
// =============================================================================

#[test]
fn test_damage_by_ability_empty_log() {
    let log = create_test_log();
    let damage = log.damage_by_ability("Player");
    assert!(damage.is_empty(), "Empty log should return empty damage map");
}

#[test]
fn test_damage_by_ability_single_source() {
    let mut log = create_test_log();
    hit(&mut log, "Player", "Island Raider 1", "Flame Basic", 32.0, false);
    hit(&mut log, "Player", "Island Raider 1", "Flame Basic", 32.0, false);
    hit(&mut log, "Player", "Island Raider 2", "Bomb Special", 45.0, false);

    let damage = log.damage_by_ability("Player");

    assert_eq!(damage.len(), 2, "Should have 2 different abilities");
    assert_eq!(damage.get("Flame Basic"), Some(&64.0));
    assert_eq!(damage.get("Bomb Special"), Some(&45.0));
}

#[test]
fn test_damage_by_ability_ignores_other_sources() {
    let mut log = create_test_log();
    hit(&mut log, "Player", "Island Raider 1", "Ice Basic", 28.0, false);
    hit(&mut log, "Island Raider 1", "Player", "Strike", 8.0, false);

    let damage = log.damage_by_ability("Island Raider 1");
    assert_eq!(damage.len(), 1);
    assert_eq!(damage.get("Strike"), Some(&8.0));
}

#[test]
fn test_periodic_damage_is_merged_without_entries() {
    let mut log = create_test_log();
    for _ in 0..60 {
        log.log_periodic_damage("Player", "Magma Special", 0.5);
    }
    hit(&mut log, "Player", "Magma Golem", "Magma Special", 10.0, false);

    assert_eq!(log.entries.len(), 1, "per-tick damage does not create entries");
    let total = log.damage_by_ability("Player")["Magma Special"];
    assert!((total - 40.0).abs() < 1e-3, "got {}", total);
}

#[test]
fn test_damage_taken_counts_discrete_hits() {
    let mut log = create_test_log();
    hit(&mut log, "Island Raider 1", "Player", "Strike", 8.0, false);
    hit(&mut log, "Magma Golem", "Player", "Ground Slam", 27.0, false);
    hit(&mut log, "Player", "Magma Golem", "Light Basic", 28.0, false);

    assert_eq!(log.damage_taken_by("Player"), 35.0);
    assert_eq!(log.damage_taken_by("Magma Golem"), 28.0);
    assert_eq!(log.damage_taken_by("Nobody"), 0.0);
}

// =============================================================================
// Kills and Uses
// =============================================================================

#[test]
fn test_killing_blows() {
    let mut log = create_test_log();
    log.log_death(
        "Island Raider 1".to_string(),
        Some("Player".to_string()),
        "Island Raider 1 dies".to_string(),
    );
    log.log_death(
        "Island Raider 2".to_string(),
        Some("Player".to_string()),
        "Island Raider 2 dies".to_string(),
    );
    log.log_death("Player".to_string(), Some("Magma Golem".to_string()), "Player dies".to_string());

    assert_eq!(log.killing_blows("Player"), 2);
    assert_eq!(log.killing_blows("Magma Golem"), 1);
    assert_eq!(log.killing_blows("Island Raider 1"), 0);
}

#[test]
fn test_ability_uses_and_messages() {
    let mut log = create_test_log();
    log.log_ability("Flame", "Basic");
    log.log_ability("Flame", "Ultimate");
    log.log_ability("Ice", "Special");

    assert_eq!(log.ability_uses("Flame"), 2);
    assert_eq!(log.ability_uses("Ice"), 1);
    assert_eq!(log.ability_uses("Bomb"), 0);

    let pattern = Regex::new(r"^Player uses (Flame|Ice) (Basic|Special|Ultimate)$").unwrap();
    for entry in log.filter_by_type(CombatLogEventType::AbilityUsed) {
        assert!(pattern.is_match(&entry.message), "unexpected message {}", entry.message);
        assert!(matches!(entry.data, Some(StructuredEventData::Ability { .. })));
    }
}

#[test]
fn test_entries_carry_encounter_time() {
    let mut log = create_test_log();
    log.log(CombatLogEventType::EncounterEvent, "Encounter started".to_string());
    log.match_time = 2.5;
    log.log_ability("Light", "Basic");

    let recent = log.recent(1);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].timestamp, 2.5);

    log.clear();
    assert!(log.entries.is_empty());
    assert_eq!(log.match_time, 0.0);
}

// =============================================================================
// Saving
// =============================================================================

#[test]
fn test_save_to_file_writes_metadata_and_entries() {
    let mut log = create_test_log();
    log.log_ability("Bomb", "Ultimate");
    hit(&mut log, "Player", "Island Raider 1", "Bomb Ultimate", 45.0, true);
    log.log_periodic_damage("Player", "Flame Burn", 3.2);

    let metadata = EncounterMetadata {
        outcome: "Victory".to_string(),
        duration_secs: 12.5,
        player_final_health: 180.0,
        random_seed: Some(7),
        agents: vec![AgentMetadata {
            name: "Island Raider 1".to_string(),
            is_boss: false,
            max_health: 100.0,
            final_health: 0.0,
            survived: false,
            attacks_performed: 1,
        }],
    };

    let path = std::env::temp_dir().join(format!("elemental_isle_log_{}.json", std::process::id()));
    let written = log
        .save_to_file(&metadata, Some(path.to_str().unwrap()))
        .unwrap();

    let contents = std::fs::read_to_string(&written).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json["metadata"]["outcome"], "Victory");
    assert_eq!(json["metadata"]["random_seed"], 7);
    assert_eq!(json["metadata"]["agents"][0]["name"], "Island Raider 1");
    assert_eq!(json["entries"].as_array().unwrap().len(), 2);
    assert_eq!(json["periodic_damage"][0]["ability"], "Flame Burn");

    std::fs::remove_file(&written).unwrap();
}

#[test]
fn test_save_to_unwritable_path_fails() {
    let log = create_test_log();
    let metadata = EncounterMetadata {
        outcome: "Draw".to_string(),
        duration_secs: 0.0,
        player_final_health: 200.0,
        random_seed: None,
        agents: vec![],
    };
    let result = log.save_to_file(&metadata, Some("/nonexistent-dir/elemental/log.json"));
    assert!(result.is_err());
}
