//! Headless mode for automated testing
//!
//! This module runs island encounters without any graphical output. A
//! scripted autopilot plays the player's side.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless encounter
//! cargo run --release -- --config encounter.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "loadout": ["Flame", "Ice", "Bomb"],
//!   "enemy_count": 4,
//!   "include_boss": true,
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod autopilot;
pub mod config;
pub mod runner;

pub use config::EncounterConfig;
pub use runner::{
    build_simulation, run_headless_encounter, simulate_encounter, AgentResult, EncounterResult,
};
