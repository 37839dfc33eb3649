//! Settings for the voxel sandbox.
//!
//! Settings persist to disk as a RON file next to the user's other
//! configuration, can be overridden from the command line, and tolerate
//! missing or unknown fields so older and newer files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, GameMode, PhysicsConfig, RenderConfig,
    SimulationConfig, WorldConfig, default_config_dir,
};
pub use error::ConfigError;
