//! JSON configuration parsing for headless mode
//!
//! Parses JSON encounter configurations: the player's loadout and the enemies
//! to spawn around them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::constants::MAX_LOADOUT;
use crate::engine::powers::PowerKind;

/// Headless encounter configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    /// Equipped powers in slot order (1-5 power names)
    pub loadout: Vec<String>,
    /// Regular enemies spawned on a ring around the player (default: 3)
    #[serde(default = "default_enemy_count")]
    pub enemy_count: usize,
    /// Radius of the spawn ring (default: 12)
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f32,
    /// Whether the mini boss joins the encounter
    #[serde(default)]
    pub include_boss: bool,
    /// Extra uses granted by each completed side challenge (default: 5)
    #[serde(default = "default_challenge_reward")]
    pub challenge_reward: u32,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Maximum encounter duration in seconds (default: 180)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Simulation ticks per second (default: 60)
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,
    /// Random seed for deterministic encounter reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_enemy_count() -> usize {
    3
}

fn default_spawn_radius() -> f32 {
    12.0
}

fn default_challenge_reward() -> u32 {
    5
}

fn default_max_duration() -> f32 {
    180.0
}

fn default_tick_rate() -> f32 {
    60.0
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            loadout: vec!["Flame".to_string()],
            enemy_count: default_enemy_count(),
            spawn_radius: default_spawn_radius(),
            include_boss: false,
            challenge_reward: default_challenge_reward(),
            output_path: None,
            max_duration_secs: default_max_duration(),
            tick_rate: default_tick_rate(),
            random_seed: None,
        }
    }
}

impl EncounterConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: EncounterConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.loadout.is_empty() || self.loadout.len() > MAX_LOADOUT {
            return Err(format!("loadout must have 1-{} powers", MAX_LOADOUT));
        }
        let kinds = self.powers()?;
        for (i, kind) in kinds.iter().enumerate() {
            if kinds[..i].contains(kind) {
                return Err(format!("{} appears twice in the loadout", kind.name()));
            }
        }

        if self.enemy_count == 0 && !self.include_boss {
            return Err("encounter needs at least one enemy or the boss".to_string());
        }
        if !self.spawn_radius.is_finite() || self.spawn_radius <= 0.0 {
            return Err("spawn_radius must be a positive number".to_string());
        }
        if !self.max_duration_secs.is_finite() || self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be a positive number".to_string());
        }
        // Bevy clamps frame deltas to 0.25s
        if !self.tick_rate.is_finite() || self.tick_rate < 4.0 {
            return Err("tick_rate must be a number of at least 4".to_string());
        }

        Ok(())
    }

    /// Parse the loadout names into powers
    pub fn powers(&self) -> Result<Vec<PowerKind>, String> {
        self.loadout
            .iter()
            .map(|name| {
                PowerKind::from_name(name).ok_or_else(|| {
                    format!(
                        "Unknown power: '{}'. Valid powers: Flame, Ice, Bomb, Light, Magma",
                        name
                    )
                })
            })
            .collect()
    }

    /// Length of one simulation tick in seconds
    pub fn tick_length(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config: EncounterConfig = serde_json::from_str(r#"{ "loadout": ["Ice", "bomb"] }"#).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.enemy_count, 3);
        assert_eq!(config.powers().unwrap(), vec![PowerKind::Ice, PowerKind::Bomb]);
    }

    #[test]
    fn test_invalid_loadouts_are_rejected() {
        let mut config = EncounterConfig {
            loadout: vec!["Wind".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("Unknown power"));

        config.loadout = vec!["Flame".to_string(), "flame".to_string()];
        assert!(config.validate().unwrap_err().contains("twice"));

        config.loadout = Vec::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_encounter_is_rejected() {
        let config = EncounterConfig {
            enemy_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        for bad in [f32::NAN, f32::INFINITY] {
            let config = EncounterConfig {
                spawn_radius: bad,
                ..Default::default()
            };
            assert!(config.validate().unwrap_err().contains("spawn_radius"));

            let config = EncounterConfig {
                tick_rate: bad,
                ..Default::default()
            };
            assert!(config.validate().unwrap_err().contains("tick_rate"));
        }
    }
}
