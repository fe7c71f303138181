//! Command-line interface for Elemental Isle
//!
//! Runs a headless encounter from a JSON config, with optional overrides.

use clap::Parser;
use std::path::PathBuf;

use crate::headless::EncounterConfig;

/// Elemental island combat simulator
#[derive(Parser, Debug)]
#[command(name = "elemental-isle")]
#[command(about = "Headless combat simulator for an elemental island action game")]
#[command(version)]
pub struct Args {
    /// JSON encounter config (defaults to a Flame-only loadout against three enemies)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Output path for the combat log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum encounter duration in seconds
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed for a reproducible encounter
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

impl Args {
    /// Load the config file (if any) and apply command-line overrides
    pub fn encounter_config(&self) -> Result<EncounterConfig, String> {
        let mut config = match &self.config {
            Some(path) => EncounterConfig::load_from_file(path)?,
            None => EncounterConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output_path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(max_duration) = self.max_duration {
            config.max_duration_secs = max_duration;
        }
        if let Some(seed) = self.seed {
            config.random_seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}
