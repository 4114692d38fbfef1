//! # Generation Module
//!
//! Procedural terrain: seeded noise layers, domain warping, 2D sample maps and
//! the synthesizer that turns them into voxel grids.

pub mod domain_warp;
pub mod noise;
pub mod noise_map;
pub mod terrain;

pub use domain_warp::{DomainWarp, WarpSettings};
pub use noise::{build_layer, NoiseGenerator, NoiseSettings};
pub use noise_map::NoiseMap;
pub use terrain::{Biome, ColumnSample, MaterialLayer, MaterialLayers, TerrainGenerator, TerrainSettings};
