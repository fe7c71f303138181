//! Combat engine
//!
//! Plain-Rust simulation of one encounter on the island: the player's
//! elemental powers, the effects they leave behind, and the enemies and mini
//! boss that fight back. Nothing here depends on a renderer; visuals go
//! through the `VisualSink` trait and the Bevy layer in `combat` only drives
//! `Simulation::step` once per frame.

pub mod agents;
pub mod constants;
pub mod deferred;
pub mod effects;
pub mod game_data;
pub mod ledger;
pub mod player;
pub mod powers;
pub mod resolver;
pub mod rng;
pub mod simulation;
pub mod status;
pub mod utils;
pub mod visuals;

pub use agents::{Agent, AgentId, AgentRegistry, AgentState};
pub use effects::{EffectHandle, EffectKind, EffectManager, Faction, TransientEffect};
pub use game_data::{load_game_data, GameData};
pub use ledger::{AbilityLedger, AttackTier};
pub use player::{Player, PlayerFacade};
pub use powers::{ElementalPower, PowerKind};
pub use resolver::{effective_damage, CombatResolver};
pub use rng::GameRng;
pub use simulation::{EncounterOutcome, Simulation};
pub use status::{DamageType, StatusType};
pub use visuals::{NullVisuals, RecordingVisuals, VisualSink};
