//! Scripted player for headless encounters
//!
//! Keeps the nearest enemy at a fixed distance, fires the strongest ready
//! tier of the active power at it, and manages the loadout: when the active
//! power runs dry it switches to one that still has uses, and once every
//! power is exhausted it plays a side challenge to earn more.

use bevy::prelude::*;

use crate::combat::events::{AbilityRequest, ChallengeEvent, PowerSwitchRequest};
use crate::combat::SimulationSpeed;
use crate::engine::ledger::AttackTier;
use crate::engine::simulation::Simulation;
use crate::engine::utils::{planar_direction, planar_distance};

/// Distance band the autopilot tolerates around `preferred_range`.
const RANGE_SLACK: f32 = 1.0;

#[derive(Resource, Debug, Clone)]
pub struct Autopilot {
    /// Distance kept from the current target
    pub preferred_range: f32,
    /// Targets further than this are approached but not attacked
    pub engage_range: f32,
    /// Uses granted by each completed challenge
    pub challenge_reward: u32,
    challenge_running: bool,
}

impl Autopilot {
    pub fn new(challenge_reward: u32) -> Self {
        Self {
            preferred_range: 5.0,
            engage_range: 12.0,
            challenge_reward,
            challenge_running: false,
        }
    }
}

/// Tiers in the order the autopilot tries them
const TIER_PRIORITY: [AttackTier; 3] = [AttackTier::Ultimate, AttackTier::Special, AttackTier::Basic];

pub fn autopilot_player(
    time: Res<Time>,
    speed: Res<SimulationSpeed>,
    mut autopilot: ResMut<Autopilot>,
    mut simulation: ResMut<Simulation>,
    mut attacks: EventWriter<AbilityRequest>,
    mut switches: EventWriter<PowerSwitchRequest>,
    mut challenges: EventWriter<ChallengeEvent>,
) {
    if simulation.is_finished() || !simulation.player.is_alive() {
        return;
    }

    // Challenges resolve one frame after they start
    if autopilot.challenge_running {
        autopilot.challenge_running = false;
        challenges.send(ChallengeEvent::Complete {
            reward: autopilot.challenge_reward,
        });
        return;
    }

    let position = simulation.player.position;
    let Some(target) = simulation
        .agents
        .active()
        .map(|agent| agent.position)
        .min_by(|a, b| planar_distance(*a, position).total_cmp(&planar_distance(*b, position)))
    else {
        return;
    };
    let distance = planar_distance(target, position);
    let toward = planar_direction(target - position);

    let dt = time.delta_secs() * speed.multiplier;
    if distance > autopilot.preferred_range + RANGE_SLACK {
        simulation.player.move_toward(toward, dt);
    } else if distance < autopilot.preferred_range - RANGE_SLACK {
        simulation.player.move_toward(-toward, dt);
    }

    let Some(active) = simulation.active_power() else {
        return;
    };
    if simulation.ledger.uses_remaining(active.name()) == 0 {
        let refill = simulation
            .loadout()
            .iter()
            .position(|kind| simulation.ledger.uses_remaining(kind.name()) > 0);
        match refill {
            Some(slot) => {
                switches.send(PowerSwitchRequest { slot });
            }
            None => {
                autopilot.challenge_running = true;
                challenges.send(ChallengeEvent::Begin);
            }
        }
        return;
    }

    if distance > autopilot.engage_range {
        return;
    }
    let ready = TIER_PRIORITY
        .into_iter()
        .find(|tier| simulation.ledger.is_ready(active.name(), *tier));
    if let Some(tier) = ready {
        attacks.send(AbilityRequest {
            tier,
            direction: toward,
        });
    }
}
