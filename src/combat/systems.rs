//! Combat systems
//!
//! ECS systems that feed player input into the `Simulation` resource and
//! step it once per frame.

use bevy::prelude::*;

use super::events::*;
use super::SimulationSpeed;
use crate::engine::simulation::Simulation;

/// Switch the active power. Runs before ability requests so a switch and an
/// attack sent in the same frame use the new power.
pub fn apply_power_switches(
    mut requests: EventReader<PowerSwitchRequest>,
    mut simulation: ResMut<Simulation>,
) {
    for request in requests.read() {
        if !simulation.switch_power(request.slot) {
            debug!("Ignoring switch to slot {}", request.slot);
        }
    }
}

pub fn apply_challenge_events(
    mut events: EventReader<ChallengeEvent>,
    mut simulation: ResMut<Simulation>,
) {
    for event in events.read() {
        let accepted = match *event {
            ChallengeEvent::Begin => simulation.begin_challenge(),
            ChallengeEvent::Complete { reward } => simulation.complete_challenge(reward),
        };
        if !accepted {
            debug!("Ignoring {:?}", event);
        }
    }
}

/// Invoke requested attacks. Refused attacks (cooldown, no uses) are dropped.
pub fn apply_ability_requests(
    mut requests: EventReader<AbilityRequest>,
    mut simulation: ResMut<Simulation>,
) {
    for request in requests.read() {
        if !simulation.invoke(request.tier, request.direction) {
            debug!("{} attack refused", request.tier.name());
        }
    }
}

/// Advance the simulation by the frame delta scaled by `SimulationSpeed`.
pub fn step_simulation(
    time: Res<Time>,
    speed: Res<SimulationSpeed>,
    mut simulation: ResMut<Simulation>,
) {
    if speed.is_paused() {
        return;
    }
    let dt = time.delta_secs() * speed.multiplier;
    simulation.step(dt);
}

/// Send `EncounterFinished` the first frame an outcome is known
pub fn announce_encounter_end(
    simulation: Res<Simulation>,
    mut announced: Local<bool>,
    mut finished: EventWriter<EncounterFinished>,
) {
    if *announced {
        return;
    }
    if let Some(outcome) = simulation.outcome() {
        *announced = true;
        finished.send(EncounterFinished {
            outcome,
            duration: simulation.elapsed(),
        });
    }
}
