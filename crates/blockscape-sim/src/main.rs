//! Headless Blockscape run.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p blockscape-sim -- --duration 30 --seed 7`.

mod game_loop;
mod pilot;
mod simulation;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use blockscape_config::{CliArgs, Config, default_config_dir};

use crate::simulation::Simulation;

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    if let Some(path) =
        blockscape_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config))
    {
        info!("Logging to {}", path.display());
    }

    info!(
        "Blockscape seed {}, render distance {}, {:.1}s",
        config.world.seed, config.render.render_distance, config.simulation.duration_seconds
    );

    let mut sim = Simulation::new(&config);
    let summary = sim.run(config.simulation.duration_seconds);

    info!(
        "Ran {} steps ({:.2}s): broke {}, placed {}, drops {}/{} collected, {} fluid ticks converted {} cells",
        summary.steps,
        summary.sim_time,
        summary.blocks_broken,
        summary.blocks_placed,
        summary.drops_collected,
        summary.drops_spawned,
        summary.fluid_ticks,
        summary.fluid_cells_converted
    );
    info!(
        "Meshed {} chunks ({} cached), {} overrides, {} active fluid cells, fall damage {}, void respawns {}",
        summary.chunks_meshed,
        sim.meshes().len(),
        summary.overrides,
        sim.world().active_fluid_count(),
        summary.fall_damage,
        summary.void_respawns
    );
    let p = summary.player_position;
    info!(
        "Player ended at ({:.2}, {:.2}, {:.2}), grounded {}",
        p.x, p.y, p.z, sim.player().body.grounded
    );
    if let Some(f) = summary.follower_position {
        info!(
            "Follower ended at ({:.2}, {:.2}, {:.2}), {} respawns",
            f.x, f.y, f.z, summary.follower_respawns
        );
    }
}
