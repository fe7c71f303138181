//! Combat logging
//!
//! Records all combat events for display and post-encounter analysis.

use serde::Serialize;
use std::collections::HashMap;

/// Name used for a participant in the log ("Player", "Enemy 3", "Mini Boss").
pub type CombatantId = String;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in encounter time (seconds since start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Machine-readable payload for queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StructuredEventData>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// Damage dealt to an agent or the player
    Damage,
    /// Status effect applied or refreshed
    StatusApplied,
    /// Power tier used successfully
    AbilityUsed,
    /// Agent AI state transition
    StateChange,
    /// Agent or player died
    Death,
    /// Dead agent physically removed after its grace delay
    Removal,
    /// Encounter event (start, power switch, challenge, end)
    EncounterEvent,
}

/// Structured payload attached to log entries.
#[derive(Debug, Clone, Serialize)]
pub enum StructuredEventData {
    Damage {
        source: CombatantId,
        target: CombatantId,
        ability: String,
        amount: f32,
        is_killing_blow: bool,
    },
    Death {
        victim: CombatantId,
        killer: Option<CombatantId>,
    },
    Ability {
        power: String,
        tier: String,
    },
}

/// Final state of one agent, saved alongside the log.
#[derive(Debug, Clone, Serialize)]
pub struct AgentMetadata {
    pub name: CombatantId,
    pub is_boss: bool,
    pub max_health: f32,
    pub final_health: f32,
    pub survived: bool,
    pub attacks_performed: u32,
}

/// Encounter summary saved alongside the log.
#[derive(Debug, Clone, Serialize)]
pub struct EncounterMetadata {
    pub outcome: String,
    pub duration_secs: f32,
    pub player_final_health: f32,
    pub random_seed: Option<u64>,
    pub agents: Vec<AgentMetadata>,
}

/// The combat log storing all events
#[derive(Debug, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current encounter time
    pub match_time: f32,
    /// Damage from per-tick sources (area effects, burns), keyed by (source, ability)
    periodic_damage: HashMap<(CombatantId, String), f32>,
}

#[derive(Serialize)]
struct SavedLog<'a> {
    metadata: &'a EncounterMetadata,
    periodic_damage: Vec<PeriodicTotal<'a>>,
    entries: &'a [CombatLogEntry],
}

#[derive(Serialize)]
struct PeriodicTotal<'a> {
    source: &'a str,
    ability: &'a str,
    amount: f32,
}

impl CombatLog {
    /// Clear the log for a new encounter
    pub fn clear(&mut self) {
        self.entries.clear();
        self.periodic_damage.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.push(event_type, message, None);
    }

    fn push(
        &mut self,
        event_type: CombatLogEventType,
        message: String,
        data: Option<StructuredEventData>,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            data,
        });
    }

    /// Log a discrete hit
    pub fn log_damage(
        &mut self,
        source: CombatantId,
        target: CombatantId,
        ability: String,
        amount: f32,
        is_killing_blow: bool,
        message: String,
    ) {
        self.push(
            CombatLogEventType::Damage,
            message,
            Some(StructuredEventData::Damage {
                source,
                target,
                ability,
                amount,
                is_killing_blow,
            }),
        );
    }

    /// Accumulate damage from a per-tick source without creating an entry per frame.
    pub fn log_periodic_damage(&mut self, source: &str, ability: &str, amount: f32) {
        *self
            .periodic_damage
            .entry((source.to_string(), ability.to_string()))
            .or_insert(0.0) += amount;
    }

    /// Log a death with killer tracking
    pub fn log_death(&mut self, victim: CombatantId, killer: Option<CombatantId>, message: String) {
        self.push(
            CombatLogEventType::Death,
            message,
            Some(StructuredEventData::Death { victim, killer }),
        );
    }

    /// Log a successful power use
    pub fn log_ability(&mut self, power: &str, tier: &str) {
        self.push(
            CombatLogEventType::AbilityUsed,
            format!("Player uses {} {}", power, tier),
            Some(StructuredEventData::Ability {
                power: power.to_string(),
                tier: tier.to_string(),
            }),
        );
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Total damage dealt by `source`, per ability (discrete hits and periodic damage)
    pub fn damage_by_ability(&self, source: &str) -> HashMap<String, f32> {
        let mut totals: HashMap<String, f32> = HashMap::new();
        for entry in &self.entries {
            if let Some(StructuredEventData::Damage {
                source: s,
                ability,
                amount,
                ..
            }) = &entry.data
            {
                if s == source {
                    *totals.entry(ability.clone()).or_insert(0.0) += amount;
                }
            }
        }
        for ((s, ability), amount) in &self.periodic_damage {
            if s == source {
                *totals.entry(ability.clone()).or_insert(0.0) += amount;
            }
        }
        totals
    }

    /// Total discrete damage taken by `target`
    pub fn damage_taken_by(&self, target: &str) -> f32 {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.data {
                Some(StructuredEventData::Damage {
                    target: t, amount, ..
                }) if t == target => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Number of deaths credited to `killer`
    pub fn killing_blows(&self, killer: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| {
                matches!(
                    &entry.data,
                    Some(StructuredEventData::Death { killer: Some(k), .. }) if k == killer
                )
            })
            .count()
    }

    /// Number of successful uses of `power`
    pub fn ability_uses(&self, power: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| {
                matches!(
                    &entry.data,
                    Some(StructuredEventData::Ability { power: p, .. }) if p == power
                )
            })
            .count()
    }

    /// Save the log and encounter summary as JSON.
    ///
    /// Returns the path written. Without an explicit path a timestamped file is
    /// created in `encounter_logs/`.
    pub fn save_to_file(
        &self,
        metadata: &EncounterMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let path = match output_path {
            Some(path) => path.to_string(),
            None => {
                std::fs::create_dir_all("encounter_logs")
                    .map_err(|e| format!("Failed to create encounter_logs: {}", e))?;
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("encounter_logs/encounter_{}.json", stamp)
            }
        };

        let mut periodic: Vec<PeriodicTotal> = self
            .periodic_damage
            .iter()
            .map(|((source, ability), amount)| PeriodicTotal {
                source,
                ability,
                amount: *amount,
            })
            .collect();
        periodic.sort_by(|a, b| (a.source, a.ability).cmp(&(b.source, b.ability)));

        let saved = SavedLog {
            metadata,
            periodic_damage: periodic,
            entries: &self.entries,
        };
        let contents = serde_json::to_string_pretty(&saved)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))?;
        std::fs::write(&path, contents).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        Ok(path)
    }
}
