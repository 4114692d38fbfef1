//! # Terrain Module
//!
//! Turns noise layers into a heightfield and the heightfield into voxels.
//!
//! ## Height
//!
//! For a world-space column `(x, z)`, optionally displaced by a [`DomainWarp`] first:
//!
//! ```text
//! height = base_height
//!        + base(x, z)      * base_amplitude
//!        + ridged(x, z)    * mountain_amplitude
//!        - |simplex(x, z)| * river_depth
//!        + (base(x, z) > volcano_threshold ? volcano_height : 0)
//! ```
//!
//! ## Voxels
//!
//! A voxel is solid when its world-space Y is at or below the column height. Every
//! noise call is fed world-space coordinates, never chunk-local ones, so columns on
//! either side of a chunk border agree and no seams appear.

use cgmath::Point3;
use log::debug;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::error::Result;
use crate::voxels::block::{block_type::BlockType, VoxelData};
use crate::voxels::chunk::{Chunk, VoxelGrid};

use super::domain_warp::DomainWarp;
use super::noise::NoiseGenerator;
use super::noise_map::NoiseMap;

/// Scalars combining the noise layers into a height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Height of the terrain where every layer samples zero.
    pub base_height: f64,
    /// Weight of the base layer.
    pub base_amplitude: f64,
    /// Weight of the ridged mountain layer.
    pub mountain_amplitude: f64,
    /// Maximum depth carved by the river layer.
    pub river_depth: f64,
    /// Base-layer value above which a volcano spike is added.
    pub volcano_threshold: f64,
    /// Height of a volcano spike.
    pub volcano_height: f64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        TerrainSettings {
            base_height: 8.0,
            base_amplitude: 12.0,
            mountain_amplitude: 16.0,
            river_depth: 6.0,
            volcano_threshold: 0.6,
            volcano_height: 10.0,
        }
    }
}

impl TerrainSettings {
    /// Returns a copy with non-finite values replaced by defaults and depths made non-negative.
    pub fn sanitized(&self) -> Self {
        let defaults = TerrainSettings::default();
        let finite = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };
        TerrainSettings {
            base_height: finite(self.base_height, defaults.base_height),
            base_amplitude: finite(self.base_amplitude, defaults.base_amplitude),
            mountain_amplitude: finite(self.mountain_amplitude, defaults.mountain_amplitude),
            river_depth: finite(self.river_depth, defaults.river_depth).abs(),
            volcano_threshold: finite(self.volcano_threshold, defaults.volcano_threshold),
            volcano_height: finite(self.volcano_height, defaults.volcano_height),
        }
    }
}

/// One band of a material column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayer {
    /// The band covers depths below the surface up to, not including, this value.
    pub until_depth: f64,
    /// Material of the band.
    pub block_type: BlockType,
}

/// Maps depth below the column surface to a material.
///
/// Bands are checked shallowest first; a depth past every band gets the fallback.
/// The default has no bands and a stone fallback, giving single-material ground.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialLayers {
    /// Bands, shallowest first once sanitized.
    pub layers: Vec<MaterialLayer>,
    /// Material below the deepest band.
    pub fallback: BlockType,
}

impl Default for MaterialLayers {
    fn default() -> Self {
        MaterialLayers {
            layers: Vec::new(),
            fallback: BlockType::STONE,
        }
    }
}

impl MaterialLayers {
    /// A grass, dirt, stone column.
    pub fn grass_dirt_stone(grass_depth: f64, dirt_depth: f64) -> Self {
        MaterialLayers {
            layers: vec![
                MaterialLayer {
                    until_depth: grass_depth,
                    block_type: BlockType::GRASS,
                },
                MaterialLayer {
                    until_depth: grass_depth + dirt_depth,
                    block_type: BlockType::DIRT,
                },
            ],
            fallback: BlockType::STONE,
        }
    }

    /// Returns a copy with bands sorted by depth and unusable bands dropped.
    ///
    /// Air bands, air fallbacks and non-finite depths are discarded, since a column
    /// below its surface must stay solid.
    pub fn sanitized(&self) -> Self {
        let mut layers: Vec<MaterialLayer> = self
            .layers
            .iter()
            .filter(|l| l.until_depth.is_finite() && l.block_type.is_solid())
            .cloned()
            .collect();
        layers.sort_by(|a, b| a.until_depth.total_cmp(&b.until_depth));
        MaterialLayers {
            layers,
            fallback: if self.fallback.is_solid() {
                self.fallback
            } else {
                BlockType::STONE
            },
        }
    }

    /// Material at `depth` below the surface.
    pub fn material_at(&self, depth: f64) -> BlockType {
        self.layers
            .iter()
            .find(|layer| depth < layer.until_depth)
            .map_or(self.fallback, |layer| layer.block_type)
    }
}

/// Coarse classification of a column, stored in each voxel's biome byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Biome {
    /// Nothing else applies.
    Plains = 0,
    /// The ridged term outweighs the base term.
    Mountain = 1,
    /// The river carve is deeper than half the river depth.
    River = 2,
    /// The volcano spike is active.
    Volcano = 3,
}

/// Height and biome of one world-space column.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColumnSample {
    /// World-space surface height.
    pub height: f64,
    /// Column classification.
    pub biome: Biome,
}

/// Heightfield and voxel synthesizer.
///
/// The generator owns its noise layers; nothing is shared with other generators.
pub struct TerrainGenerator {
    settings: TerrainSettings,
    materials: MaterialLayers,
    base: Box<dyn NoiseGenerator>,
    mountain: Box<dyn NoiseGenerator>,
    river: Box<dyn NoiseGenerator>,
    warp: Option<(DomainWarp, Box<dyn NoiseGenerator>)>,
}

impl TerrainGenerator {
    /// Creates a generator from its three height layers.
    ///
    /// # Arguments
    /// * `settings` - Amplitudes and thresholds combining the layers
    /// * `base` - Rolling base terrain
    /// * `mountain` - Ridged mountain layer
    /// * `river` - Layer whose absolute value carves rivers
    pub fn new(
        settings: TerrainSettings,
        base: Box<dyn NoiseGenerator>,
        mountain: Box<dyn NoiseGenerator>,
        river: Box<dyn NoiseGenerator>,
    ) -> Self {
        TerrainGenerator {
            settings: settings.sanitized(),
            materials: MaterialLayers::default(),
            base,
            mountain,
            river,
            warp: None,
        }
    }

    /// Displaces every column lookup by `warp`, reading displacements from `noise`.
    pub fn with_warp(mut self, warp: DomainWarp, noise: Box<dyn NoiseGenerator>) -> Self {
        self.warp = Some((warp, noise));
        self
    }

    /// Replaces the material column.
    pub fn with_materials(mut self, materials: MaterialLayers) -> Self {
        self.materials = materials.sanitized();
        self
    }

    /// The sanitized height scalars.
    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// The sanitized material column.
    pub fn materials(&self) -> &MaterialLayers {
        &self.materials
    }

    /// Whether column lookups are domain warped.
    pub fn is_warped(&self) -> bool {
        self.warp.is_some()
    }

    /// Samples every layer for the world-space column `(x, z)`.
    pub fn sample_column(&self, x: f64, z: f64) -> ColumnSample {
        let (x, z) = match &self.warp {
            Some((warp, noise)) => warp.warp(noise.as_ref(), x, z),
            None => (x, z),
        };
        let s = &self.settings;

        let base = self.base.sample(x, z);
        let rolling = base * s.base_amplitude;
        let ridges = self.mountain.sample(x, z) * s.mountain_amplitude;
        let carve = self.river.sample(x, z).abs() * s.river_depth;
        let volcano = base > s.volcano_threshold;

        let mut height = s.base_height + rolling + ridges - carve;
        if volcano {
            height += s.volcano_height;
        }

        let biome = if volcano {
            Biome::Volcano
        } else if carve > s.river_depth / 2.0 {
            Biome::River
        } else if ridges > rolling.abs() {
            Biome::Mountain
        } else {
            Biome::Plains
        };
        ColumnSample { height, biome }
    }

    /// Terrain height of the world-space column `(x, z)`.
    pub fn height(&self, x: f64, z: f64) -> f64 {
        self.sample_column(x, z).height
    }

    /// Generates the voxels of the chunk at `chunk_position` without needing a chunk.
    ///
    /// # Arguments
    /// * `chunk_position` - Chunk coordinates
    /// * `size` - Chunk edge length in voxels
    /// * `voxel_size` - World-space edge length of one voxel
    ///
    /// # Returns
    /// A `size³` grid. Solid voxels carry their material, column biome and no light;
    /// air voxels carry the column biome and full sky light.
    pub fn generate_grid(&self, chunk_position: Point3<i32>, size: usize, voxel_size: f32) -> VoxelGrid {
        let mut grid = VoxelGrid::cubic(size);
        let step = voxel_size as f64;
        let origin = [
            chunk_position.x as i64 * size as i64,
            chunk_position.y as i64 * size as i64,
            chunk_position.z as i64 * size as i64,
        ];

        for z in 0..size {
            let world_z = (origin[2] + z as i64) as f64 * step;
            for x in 0..size {
                let world_x = (origin[0] + x as i64) as f64 * step;
                let column = self.sample_column(world_x, world_z);
                let biome = column.biome as u8;

                for y in 0..size {
                    let world_y = (origin[1] + y as i64) as f64 * step;
                    let voxel = if world_y <= column.height {
                        VoxelData {
                            block_type: self.materials.material_at(column.height - world_y),
                            biome,
                            light: 0.0,
                        }
                    } else {
                        VoxelData {
                            block_type: BlockType::AIR,
                            biome,
                            light: 1.0,
                        }
                    };
                    grid.set(x, y, z, voxel);
                }
            }
        }
        grid
    }

    /// Fills a chunk with generated voxels, marking it dirty.
    pub fn populate(&self, chunk: &mut Chunk) -> Result<()> {
        let start = Instant::now();
        let grid = self.generate_grid(chunk.position, chunk.size(), chunk.voxel_size());
        let solid = grid.solid_count();
        chunk.set_voxel_data(grid)?;
        debug!(
            "Generated chunk {:?}: {} solid voxels in {:?}",
            chunk.position,
            solid,
            start.elapsed()
        );
        Ok(())
    }

    /// Samples column heights on a regular world-space lattice.
    ///
    /// Cell `(i, j)` holds `height(origin[0] + i * voxel_size, origin[1] + j * voxel_size)`.
    pub fn height_map(&self, origin: [f64; 2], width: usize, depth: usize, voxel_size: f64) -> NoiseMap {
        NoiseMap::from_fn(width, depth, |i, j| {
            self.height(origin[0] + i as f64 * voxel_size, origin[1] + j as f64 * voxel_size)
        })
    }
}
