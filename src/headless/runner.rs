//! Headless encounter execution
//!
//! Runs encounters without any graphical output, suitable for automated testing.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::combat::log::{AgentMetadata, CombatLogEventType, EncounterMetadata};
use crate::combat::{CombatPlugin, CombatSystemPhase};
use crate::engine::agents::{Agent, AgentId};
use crate::engine::game_data::{GameData, GameDataPlugin};
use crate::engine::simulation::{EncounterOutcome, Simulation};
use crate::engine::utils::radial_directions;

use super::autopilot::{autopilot_player, Autopilot};
use super::config::EncounterConfig;

/// Result of a completed headless encounter
///
/// This struct provides programmatic access to encounter results for testing and analysis.
#[derive(Debug, Clone, Serialize)]
pub struct EncounterResult {
    pub outcome: EncounterOutcome,
    /// Encounter duration in seconds
    pub duration: f32,
    pub player_final_health: f32,
    /// Every agent that took part, in spawn order
    pub agents: Vec<AgentResult>,
    /// Successful power uses
    pub abilities_used: usize,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

impl EncounterResult {
    pub fn agents_defeated(&self) -> usize {
        self.agents.iter().filter(|a| !a.survived).count()
    }
}

/// Statistics for a single agent after the encounter
#[derive(Debug, Clone, Serialize)]
pub struct AgentResult {
    pub name: String,
    pub is_boss: bool,
    pub max_health: f32,
    /// Health remaining at encounter end (0 if dead)
    pub final_health: f32,
    pub survived: bool,
    pub attacks_performed: u32,
    pub damage_taken: f32,
}

impl AgentResult {
    fn from_agent(agent: &Agent) -> Self {
        Self {
            name: agent.name.clone(),
            is_boss: agent.is_boss(),
            max_health: agent.max_health,
            final_health: agent.health,
            survived: agent.is_alive(),
            attacks_performed: agent.attacks_performed,
            damage_taken: agent.damage_taken,
        }
    }
}

/// Resource to track headless encounter state
#[derive(Resource)]
pub struct HeadlessEncounterState {
    pub config: EncounterConfig,
    /// Latest known state of every agent, kept after removal
    pub roster: BTreeMap<AgentId, AgentResult>,
    /// Whether the encounter has completed
    pub encounter_complete: bool,
    /// Write the combat log even without an explicit output path
    pub always_save_log: bool,
    /// Encounter result (populated when the encounter completes)
    pub result: Option<EncounterResult>,
}

/// Plugin for headless encounter execution. Expects a `GameData` resource.
pub struct HeadlessPlugin {
    pub config: EncounterConfig,
    pub always_save_log: bool,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        if let Err(e) = self.config.validate() {
            panic!("Invalid encounter configuration: {}", e);
        }

        // Simulation time advances by exactly one tick per frame
        let tick = Duration::from_secs_f32(self.config.tick_length());

        app.insert_resource(TimeUpdateStrategy::ManualDuration(tick))
            .insert_resource(HeadlessEncounterState {
                config: self.config.clone(),
                roster: BTreeMap::new(),
                encounter_complete: false,
                always_save_log: self.always_save_log,
                result: None,
            })
            .insert_resource(Autopilot::new(self.config.challenge_reward))
            .add_plugins(CombatPlugin);

        app.add_systems(Startup, headless_setup_encounter)
            .add_systems(
                Update,
                autopilot_player
                    .before(CombatSystemPhase::Input)
                    .run_if(resource_exists::<Simulation>),
            )
            .add_systems(
                Update,
                (headless_track_agents, headless_check_encounter_end)
                    .chain()
                    .after(CombatSystemPhase::Simulation)
                    .run_if(resource_exists::<Simulation>),
            )
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

/// Build the simulation described by `config`: loadout equipped, enemies on
/// a ring around the player, the boss behind them.
pub fn build_simulation(config: &EncounterConfig, data: GameData) -> Result<Simulation, String> {
    config.validate()?;

    let mut simulation = Simulation::headless(data, config.random_seed);
    simulation.log.log(
        CombatLogEventType::EncounterEvent,
        "Encounter started (headless mode)!".to_string(),
    );

    for kind in config.powers()? {
        if !simulation.equip(kind) {
            return Err(format!("Could not equip {}", kind.name()));
        }
    }
    for direction in radial_directions(Vec3::Z, config.enemy_count) {
        simulation.spawn_enemy(direction * config.spawn_radius);
    }
    if config.include_boss {
        simulation.spawn_boss(Vec3::NEG_Z * config.spawn_radius * 1.5);
    }
    Ok(simulation)
}

/// Setup system for headless encounter
fn headless_setup_encounter(
    mut commands: Commands,
    data: Res<GameData>,
    state: Res<HeadlessEncounterState>,
) {
    match state.config.random_seed {
        Some(seed) => info!("Using deterministic RNG with seed: {}", seed),
        None => info!("Using non-deterministic RNG (no seed provided)"),
    }

    match build_simulation(&state.config, data.clone()) {
        Ok(simulation) => {
            info!(
                "Headless encounter setup complete: {} enemies{}, loadout {:?}",
                state.config.enemy_count,
                if state.config.include_boss { " + boss" } else { "" },
                simulation.loadout()
            );
            commands.insert_resource(simulation);
        }
        Err(e) => {
            // Config was validated when the plugin was built
            error!("Failed to set up encounter: {}", e);
        }
    }
}

/// Remember every agent's latest state; dead agents disappear from the
/// registry after their grace delay.
fn headless_track_agents(simulation: Res<Simulation>, mut state: ResMut<HeadlessEncounterState>) {
    for agent in simulation.agents.iter() {
        state.roster.insert(agent.id, AgentResult::from_agent(agent));
    }
}

/// Check for a timeout and finish the encounter once an outcome is known
fn headless_check_encounter_end(
    mut simulation: ResMut<Simulation>,
    mut state: ResMut<HeadlessEncounterState>,
) {
    if state.encounter_complete {
        return;
    }

    if !simulation.is_finished() && simulation.elapsed() >= state.config.max_duration_secs {
        info!(
            "Encounter timed out after {:.1}s - declaring DRAW",
            simulation.elapsed()
        );
        simulation.declare_draw();
    }

    let Some(outcome) = simulation.outcome() else {
        return;
    };

    let result = build_encounter_result(&simulation, outcome, &state);
    if state.always_save_log || state.config.output_path.is_some() {
        save_headless_encounter_log(&simulation, &result, state.config.output_path.as_deref());
    }
    state.result = Some(result);
    state.encounter_complete = true;
}

/// Build the EncounterResult from the final simulation state
fn build_encounter_result(
    simulation: &Simulation,
    outcome: EncounterOutcome,
    state: &HeadlessEncounterState,
) -> EncounterResult {
    EncounterResult {
        outcome,
        duration: simulation.elapsed(),
        player_final_health: simulation.player.health,
        agents: state.roster.values().cloned().collect(),
        abilities_used: simulation
            .log
            .filter_by_type(CombatLogEventType::AbilityUsed)
            .len(),
        random_seed: simulation.rng.seed,
    }
}

/// Save the combat log to a file
fn save_headless_encounter_log(
    simulation: &Simulation,
    result: &EncounterResult,
    output_path: Option<&str>,
) {
    let metadata = EncounterMetadata {
        outcome: result.outcome.name().to_string(),
        duration_secs: result.duration,
        player_final_health: result.player_final_health,
        random_seed: result.random_seed,
        agents: result
            .agents
            .iter()
            .map(|agent| AgentMetadata {
                name: agent.name.clone(),
                is_boss: agent.is_boss,
                max_health: agent.max_health,
                final_health: agent.final_health,
                survived: agent.survived,
                attacks_performed: agent.attacks_performed,
            })
            .collect(),
    };

    match simulation.log.save_to_file(&metadata, output_path) {
        Ok(filename) => {
            println!("Encounter complete. Log saved to: {}", filename);
        }
        Err(e) => {
            eprintln!("Failed to save combat log: {}", e);
        }
    }
}

/// Exit the app when the encounter is complete
fn headless_exit_on_complete(state: Res<HeadlessEncounterState>, mut exit: EventWriter<AppExit>) {
    if state.encounter_complete {
        exit.send(AppExit::Success);
    }
}

/// Run an encounter to completion inside this thread and return its result.
///
/// Frames are driven manually, so this takes as long as the simulation work
/// itself. The log is only written when `config.output_path` is set.
pub fn simulate_encounter(config: EncounterConfig, data: GameData) -> Result<EncounterResult, String> {
    config.validate()?;
    // Startup frame, the zero-length first tick, then the encounter itself
    let max_frames = (config.max_duration_secs * config.tick_rate).ceil() as usize + 3;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(data)
        .add_plugins(HeadlessPlugin {
            config,
            always_save_log: false,
        });

    for _ in 0..max_frames {
        app.update();
        if app.world().resource::<HeadlessEncounterState>().encounter_complete {
            break;
        }
    }

    app.world()
        .resource::<HeadlessEncounterState>()
        .result
        .clone()
        .ok_or_else(|| "Encounter did not finish".to_string())
}

/// Run a headless encounter with the given configuration
pub fn run_headless_encounter(config: EncounterConfig) -> Result<(), String> {
    config.validate()?;

    println!("Starting headless encounter simulation...");
    println!("  Loadout: {:?}", config.loadout);
    println!(
        "  Enemies: {}{}",
        config.enemy_count,
        if config.include_boss { " + boss" } else { "" }
    );
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    App::new()
        // Minimal plugins - no window, no rendering. Frames run back to back;
        // simulation time comes from TimeUpdateStrategy.
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
        .add_plugins(LogPlugin::default())
        // Load power and agent tuning from assets/config
        .add_plugins(GameDataPlugin)
        // Our headless encounter plugin
        .add_plugins(HeadlessPlugin {
            config,
            always_save_log: true,
        })
        .run();

    Ok(())
}
