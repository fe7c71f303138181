//! Elemental Isle - headless combat simulator
//!
//! Runs one island encounter driven by a scripted player and writes the
//! combat log as JSON.

use elemental_isle::cli;
use elemental_isle::headless::run_headless_encounter;

fn main() {
    let args = cli::parse_args();

    let result = args.encounter_config().and_then(run_headless_encounter);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
