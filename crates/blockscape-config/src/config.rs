//! Sandbox settings, their defaults, and `config.ron` persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Default config directory: `<platform config dir>/blockscape`.
///
/// Returns `None` on platforms without a known config directory.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blockscape"))
}

/// Top-level sandbox configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World generation settings.
    pub world: WorldConfig,
    /// Chunk meshing range.
    pub render: RenderConfig,
    /// Player movement tuning and timestep.
    pub physics: PhysicsConfig,
    /// Headless simulation settings.
    pub simulation: SimulationConfig,
    /// Log filtering.
    pub debug: DebugConfig,
}

/// World generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for every noise layer and per-column random value.
    pub seed: u64,
    /// Empty cells at or below this height over low terrain fill with water.
    pub water_level: i32,
}

/// Chunk meshing range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Radius, in chunks, of the area kept meshed around the player.
    pub render_distance: u32,
}

/// Physics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in cells per second squared.
    pub gravity: f32,
    pub walk_speed: f32,
    pub fly_speed: f32,
    /// Initial upward velocity of a jump.
    pub jump_speed: f32,
    /// Length of one simulation step in seconds.
    pub fixed_timestep: f32,
    /// Frame times are clamped to this many seconds before stepping.
    pub max_frame_delta: f32,
}

/// Survival or creative play rules.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameMode {
    /// Timed mining, drops, and fall damage.
    #[default]
    Survival,
    /// Instant mining, no drops, no fall damage.
    Creative,
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds between fluid propagation ticks.
    pub fluid_tick_interval: f32,
    /// Simulated seconds the headless run lasts.
    pub duration_seconds: f32,
    /// Spawn a follower that chases the player.
    pub follower_enabled: bool,
    pub game_mode: GameMode,
}

/// Log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Fallback `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            water_level: 6,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { render_distance: 8 }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 18.0,
            walk_speed: 5.0,
            fly_speed: 10.0,
            jump_speed: 7.0,
            fixed_timestep: 1.0 / 60.0,
            max_frame_delta: 0.1,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fluid_tick_interval: 0.2,
            duration_seconds: 10.0,
            follower_enabled: true,
            game_mode: GameMode::Survival,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Reads `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Read settings from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default settings to {}", config_path.display());
            Ok(config)
        }
    }

    /// Writes this config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::write(config_dir))?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::write(&config_path))?;
        Ok(())
    }

    /// Re-reads `config.ron`. Returns `Some` only when the file differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;

        if &new_config != self {
            log::info!("Settings changed on disk");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::read(path))?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(2))
                .unwrap();
        assert!(ron_str.contains("seed: 1337"));
        assert!(ron_str.contains("render_distance: 8"));
        assert!(ron_str.contains("game_mode: Survival"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.simulation.game_mode = GameMode::Creative;
        let text = ron::to_string(&config).unwrap();
        let parsed: Config = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(world: (seed: 42), render: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.water_level, 6);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true, world: (biome_scale: 2.0))";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = scratch_dir();
        let mut config = Config::default();
        config.world.seed = 99;
        config.physics.gravity = 9.81;
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = scratch_dir();
        let nested = dir.path().join("nested");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = scratch_dir();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.render.render_distance = 12;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.render.render_distance), Some(12));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = scratch_dir();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = scratch_dir();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_invalid_ron_is_parse_error() {
        let dir = scratch_dir();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// Blockscape settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
