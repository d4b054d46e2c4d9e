//! Sparse voxel storage and the fixed material palette.

pub mod palette;
pub mod world;

pub use palette::{FALLBACK_COLOR, MaterialId, MaterialPalette, PaletteEntry, Rgb};
pub use world::{Layer, VoxelWorld};
