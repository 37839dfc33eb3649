//! Seeded value-noise layers and a per-column pseudo-random draw.
//!
//! Every function here is pure: the same seed and coordinates always produce
//! the same value, on every call and on every platform.

use noise::{NoiseFn, Value};

/// One independently seeded value-noise field sampled at a fixed frequency.
///
/// Output is roughly in `[-1, 1]`.
#[derive(Clone, Debug)]
pub struct NoiseLayer {
    noise: Value,
    frequency: f64,
}

impl NoiseLayer {
    /// Creates a layer from a world seed, a per-layer salt, and a sampling frequency.
    ///
    /// The salt decorrelates layers that share a world seed.
    pub fn new(world_seed: u64, salt: u64, frequency: f64) -> Self {
        let seed = world_seed.wrapping_add(salt);
        // Fold the high half in so seeds differing only above bit 32 still diverge.
        let folded = (seed ^ (seed >> 32)) as u32;
        Self {
            noise: Value::new(folded),
            frequency,
        }
    }

    /// Samples the 2D field at `(x, z)`.
    pub fn sample2(&self, x: f64, z: f64) -> f64 {
        self.noise.get([x * self.frequency, z * self.frequency])
    }

    /// Samples the 3D field at `(x, y, z)`.
    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise
            .get([x * self.frequency, y * self.frequency, z * self.frequency])
    }

    /// Returns the sampling frequency.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}

/// Deterministic pseudo-random value in `[0, 1)` for the column `(x, z)`.
///
/// Uses `libm` so the draw is bit-identical regardless of the platform libc.
pub fn column_random(seed: u64, x: i32, z: i32) -> f64 {
    let s = libm::sin(x as f64 * 12.9898 + z as f64 * 78.233 + seed as f64) * 43758.5453;
    s - libm::floor(s)
}
