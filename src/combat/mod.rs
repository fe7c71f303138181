//! Combat system
//!
//! Bevy integration for the combat engine:
//! - Input events (attacks, power switches, challenges)
//! - The per-frame simulation step, scaled by `SimulationSpeed`
//! - Encounter outcome notification
//! - Combat logging
//!
//! The plugin drives a `Simulation` resource that the caller inserts; every
//! system is skipped while none exists.

use bevy::prelude::*;

pub mod events;
pub mod log;
pub mod systems;

use crate::engine::simulation::Simulation;
use events::*;
use systems::*;

/// Per-frame ordering of the combat systems
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSystemPhase {
    /// Drain player input events
    Input,
    /// `Simulation::step`
    Simulation,
    /// Outcome detection and notification
    Outcome,
}

/// Plugin for the combat system
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<AbilityRequest>()
            .add_event::<PowerSwitchRequest>()
            .add_event::<ChallengeEvent>()
            .add_event::<EncounterFinished>()
            // Resources
            .init_resource::<SimulationSpeed>();

        configure_combat_system_ordering(app);

        app.add_systems(
            Update,
            (
                (apply_power_switches, apply_challenge_events, apply_ability_requests)
                    .chain()
                    .in_set(CombatSystemPhase::Input),
                step_simulation.in_set(CombatSystemPhase::Simulation),
                announce_encounter_end.in_set(CombatSystemPhase::Outcome),
            )
                .run_if(resource_exists::<Simulation>),
        );
    }
}

/// Chain the combat phases inside `Update`
pub fn configure_combat_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CombatSystemPhase::Input,
            CombatSystemPhase::Simulation,
            CombatSystemPhase::Outcome,
        )
            .chain(),
    );
}

/// Controls the speed of the combat simulation
#[derive(Resource)]
pub struct SimulationSpeed {
    /// Speed multiplier (0.0 = paused, 1.0 = normal, 2.0 = double)
    pub multiplier: f32,
}

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl SimulationSpeed {
    pub fn pause(&mut self) {
        self.multiplier = 0.0;
    }

    pub fn normal_speed(&mut self) {
        self.multiplier = 1.0;
    }

    pub fn double_speed(&mut self) {
        self.multiplier = 2.0;
    }

    pub fn is_paused(&self) -> bool {
        self.multiplier == 0.0
    }
}
