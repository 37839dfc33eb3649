//! Surface height and biome sampling.

use serde::{Deserialize, Serialize};

use crate::noise_source::NoiseLayer;

/// Layer salts that keep height and biome noise independent.
const HEIGHT_SALT: u64 = 0;
const BIOME_SALT: u64 = 999;

/// Parameters for the 2D surface-height and biome fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapParams {
    /// Frequency of the height noise. Default: 0.03.
    pub frequency: f64,
    /// Height contributed by noise in `[-1, 1]` is `(n + 1) * amplitude`. Default: 10.
    pub amplitude: f64,
    /// Frequency of the biome noise, coarser than height. Default: 0.005.
    pub biome_frequency: f64,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            frequency: 0.03,
            amplitude: 10.0,
            biome_frequency: 0.005,
        }
    }
}

/// Samples integer surface heights and biome values per column.
#[derive(Clone, Debug)]
pub struct HeightmapSampler {
    height: NoiseLayer,
    biome: NoiseLayer,
    params: HeightmapParams,
}

impl HeightmapSampler {
    /// Create a new sampler for the given world seed.
    pub fn new(seed: u64, params: HeightmapParams) -> Self {
        Self {
            height: NoiseLayer::new(seed, HEIGHT_SALT, params.frequency),
            biome: NoiseLayer::new(seed, BIOME_SALT, params.biome_frequency),
            params,
        }
    }

    /// Topmost terrain layer of the column `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let n = self.height.sample2(x as f64, z as f64);
        ((n + 1.0) * self.params.amplitude).floor() as i32
    }

    /// Biome value in roughly `[-1, 1]` for the column `(x, z)`.
    pub fn biome(&self, x: i32, z: i32) -> f64 {
        self.biome.sample2(x as f64, z as f64)
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }
}
