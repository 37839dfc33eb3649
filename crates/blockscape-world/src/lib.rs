//! The voxel world model: procedural terrain under a sparse override layer,
//! per-chunk change versions, and the liquid propagation tick.

pub mod fluids;
pub mod world;

pub use fluids::FluidTickReport;
pub use world::VoxelWorld;
