//! 3D noise cave carving with surface, shoreline, and tree-root crusts.
//!
//! A cell below the surface becomes a cave when the sum of a coarse cave
//! field and a weighted fine detail field crosses a threshold. Carving is
//! suppressed near the surface so terrain never gets paper-thin roofs, near
//! water so lakes don't drain, and under tree roots so trees never float.

use serde::{Deserialize, Serialize};

use crate::noise_source::NoiseLayer;

const CAVE_SALT: u64 = 0xCAFE_BABE;
const DETAIL_SALT: u64 = 0x0DE7_A11;

/// Configuration for cave carving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Frequency of the coarse cave field. Default: 0.025.
    pub frequency: f64,
    /// Frequency of the fine detail field. Default: 0.1.
    pub detail_frequency: f64,
    /// Weight of the detail field added to the cave field. Default: 0.1.
    pub detail_weight: f64,
    /// Cells whose combined noise exceeds this value are carved. Default: 0.35.
    pub threshold: f64,
    /// Layers directly below the surface that are never carved. Default: 3.
    pub surface_crust: i32,
    /// Crust thickness for columns whose surface sits within 2 of the water level. Default: 5.
    pub shore_crust: i32,
    /// Crust thickness below a tree root. Default: 8.
    pub root_crust: i32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            frequency: 0.025,
            detail_frequency: 0.1,
            detail_weight: 0.1,
            threshold: 0.35,
            surface_crust: 3,
            shore_crust: 5,
            root_crust: 8,
        }
    }
}

/// Decides which subsurface cells are hollowed out.
#[derive(Clone, Debug)]
pub struct CaveCarver {
    cave: NoiseLayer,
    detail: NoiseLayer,
    config: CaveConfig,
}

impl CaveCarver {
    /// Create a new cave carver for the given world seed.
    pub fn new(seed: u64, config: CaveConfig) -> Self {
        Self {
            cave: NoiseLayer::new(seed, CAVE_SALT, config.frequency),
            detail: NoiseLayer::new(seed, DETAIL_SALT, config.detail_frequency),
            config,
        }
    }

    /// Returns the cave configuration.
    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Returns `true` if carving is permitted at layer `y` of a column.
    ///
    /// `surface` is the column's top terrain layer, `water_level` the global
    /// liquid fill height, and `has_root` whether a tree grows from this column.
    pub fn allows_cave(&self, y: i32, surface: i32, water_level: i32, has_root: bool) -> bool {
        if surface <= water_level + 2 && y > surface - self.config.shore_crust {
            return false;
        }
        if has_root && y > surface - self.config.root_crust {
            return false;
        }
        y <= surface - self.config.surface_crust
    }

    /// Raw noise test, ignoring crusts.
    pub fn noise_carves(&self, x: i32, y: i32, z: i32) -> bool {
        let (fx, fy, fz) = (x as f64, y as f64, z as f64);
        let value = self.cave.sample3(fx, fy, fz)
            + self.detail.sample3(fx, fy, fz) * self.config.detail_weight;
        value > self.config.threshold
    }

    /// Determine if the cell should be carved as a cave.
    pub fn is_cave(
        &self,
        x: i32,
        y: i32,
        z: i32,
        surface: i32,
        water_level: i32,
        has_root: bool,
    ) -> bool {
        self.allows_cave(y, surface, water_level, has_root) && self.noise_carves(x, y, z)
    }
}
