//! Procedural terrain: seeded noise layers, surface heights, caves, trees, and
//! the pure per-cell generation function built on top of them.

pub mod cave;
pub mod generator;
pub mod heightmap;
pub mod noise_source;
pub mod trees;

pub use cave::{CaveCarver, CaveConfig};
pub use generator::{ColumnSample, TerrainGenerator, TerrainParams};
pub use heightmap::{HeightmapParams, HeightmapSampler};
pub use noise_source::{NoiseLayer, column_random};
pub use trees::{Tree, TreeConfig};
