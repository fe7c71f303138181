//! Elemental Isle - Combat Simulation Engine
//!
//! Real-time combat for an island action game: a player wields five
//! elemental powers against enemies and a mini boss.
//!
//! This library exposes the engine, its Bevy integration and the headless
//! runner for testing and reuse.

pub mod cli;
pub mod combat;
pub mod engine;
pub mod headless;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::CombatPlugin;
pub use engine::{AttackTier, EncounterOutcome, GameData, PowerKind, Simulation};
pub use headless::EncounterConfig;
