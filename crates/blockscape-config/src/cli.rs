//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, GameMode};

/// Blockscape command-line arguments.
///
/// Flags take precedence over the values in `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "blockscape", about = "Headless voxel sandbox simulation")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Meshing radius in chunks.
    #[arg(long)]
    pub render_distance: Option<u32>,

    /// Simulated seconds to run.
    #[arg(long)]
    pub duration: Option<f32>,

    /// Log filter directive, such as `debug` or `blockscape_world=trace`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Play by creative rules.
    #[arg(long)]
    pub creative: bool,

    /// Do not spawn the follower.
    #[arg(long)]
    pub no_follower: bool,

    /// Directory holding `config.ron` and `logs/`.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Overwrites the fields given on the command line.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(distance) = args.render_distance {
            self.render.render_distance = distance;
        }
        if let Some(duration) = args.duration {
            self.simulation.duration_seconds = duration;
        }
        if let Some(level) = &args.log_level {
            self.debug.log_level.clone_from(level);
        }
        if args.creative {
            self.simulation.game_mode = GameMode::Creative;
        }
        if args.no_follower {
            self.simulation.follower_enabled = false;
        }
    }
}
