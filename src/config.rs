//! # Configuration
//!
//! `EngineConfig` gathers every tunable of the pipeline in one serializable value.
//! It is read from an optional JSON file; every field has a default, so a file only
//! needs the values it changes:
//!
//! ```json
//! {
//!   "world": { "chunk_size": 32, "load_radius": 3 },
//!   "noise": { "base": { "kind": "perlin", "seed": 7, "scale": 90.0 } },
//!   "mesher": { "cull_hidden_faces": true }
//! }
//! ```
//!
//! Loaded values are clamped into range with [`EngineConfig::sanitized`] before any
//! component is built from them.

use std::num::NonZeroUsize;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::generation::noise::{build_layer, FractalSettings, NoiseSettings, RidgedSettings};
use crate::generation::{DomainWarp, MaterialLayers, TerrainGenerator, TerrainSettings, WarpSettings};
use crate::meshing::GreedyMesher;
use crate::voxels::chunk::{CHUNK_DIMENSION, DEFAULT_VOXEL_SIZE};
use crate::voxels::chunk_manager::ChunkManager;
use crate::world::{GenerationMethod, VoxelWorld};

/// Largest accepted chunk edge length.
pub const MAX_CHUNK_SIZE: usize = 256;

/// World layout and chunk residency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk edge length in voxels.
    pub chunk_size: usize,
    /// World-space edge length of one voxel.
    pub voxel_size: f32,
    /// Radius, in chunks, of the batch generated at startup.
    pub load_radius: i32,
    /// Evict least recently used chunks beyond this count. `None` keeps every chunk.
    pub max_resident_chunks: Option<usize>,
    /// How new chunks are filled.
    pub generation_method: GenerationMethod,
    /// Solid probability for [`GenerationMethod::Random`].
    pub random_density: f64,
    /// Base seed for [`GenerationMethod::Random`].
    pub pattern_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_size: CHUNK_DIMENSION,
            voxel_size: DEFAULT_VOXEL_SIZE,
            load_radius: 2,
            max_resident_chunks: None,
            generation_method: GenerationMethod::Noise,
            random_density: 0.5,
            pattern_seed: 0,
        }
    }
}

/// The noise layers feeding the terrain generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Rolling base terrain. Also drives the volcano threshold.
    pub base: Option<NoiseSettings>,
    /// Mountain ranges, usually ridged.
    pub mountain: Option<NoiseSettings>,
    /// Rivers, carved by the absolute value of this layer.
    pub river: Option<NoiseSettings>,
    /// Field driving the domain warp. Warping is off when this is `None`.
    pub warp_layer: Option<NoiseSettings>,
    /// Strength and channel offsets of the domain warp.
    pub warp: WarpSettings,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        let fractal = |seed, scale| FractalSettings {
            seed,
            scale,
            ..FractalSettings::default()
        };
        NoiseConfig {
            base: Some(NoiseSettings::Perlin(fractal(0, 64.0))),
            mountain: Some(NoiseSettings::Ridged(RidgedSettings {
                fractal: fractal(1, 96.0),
                ..RidgedSettings::default()
            })),
            river: Some(NoiseSettings::Simplex(fractal(2, 128.0))),
            warp_layer: None,
            warp: WarpSettings::default(),
        }
    }
}

/// Mesher switches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherConfig {
    /// Skip faces buried against a solid neighbour.
    pub cull_hidden_faces: bool,
    /// Mesh the six face directions on scoped threads.
    pub parallel_sides: bool,
}

/// Every tunable of the terrain pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk layout, residency and fill method.
    pub world: WorldConfig,
    /// Amplitudes and thresholds of the height formula.
    pub terrain: TerrainSettings,
    /// Noise layers.
    pub noise: NoiseConfig,
    /// Depth-to-material column.
    pub materials: MaterialLayers,
    /// Mesher switches.
    pub mesher: MesherConfig,
}

impl EngineConfig {
    /// Parses a JSON document, filling absent fields with defaults.
    ///
    /// # Errors
    /// Returns `Json` if the document is malformed or a field has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read and `Json` if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns a copy with every value clamped into its accepted range.
    pub fn sanitized(&self) -> Self {
        let world = &self.world;
        let sanitize_layer = |layer: &Option<NoiseSettings>| layer.as_ref().map(NoiseSettings::sanitized);
        EngineConfig {
            world: WorldConfig {
                chunk_size: world.chunk_size.clamp(1, MAX_CHUNK_SIZE),
                voxel_size: if world.voxel_size.is_finite() && world.voxel_size > 0.0 {
                    world.voxel_size
                } else {
                    DEFAULT_VOXEL_SIZE
                },
                load_radius: world.load_radius.max(0),
                max_resident_chunks: world.max_resident_chunks.filter(|&n| n > 0),
                generation_method: world.generation_method,
                random_density: if world.random_density.is_nan() {
                    0.5
                } else {
                    world.random_density.clamp(0.0, 1.0)
                },
                pattern_seed: world.pattern_seed,
            },
            terrain: self.terrain.sanitized(),
            noise: NoiseConfig {
                base: sanitize_layer(&self.noise.base),
                mountain: sanitize_layer(&self.noise.mountain),
                river: sanitize_layer(&self.noise.river),
                warp_layer: sanitize_layer(&self.noise.warp_layer),
                warp: self.noise.warp.clone(),
            },
            materials: self.materials.sanitized(),
            mesher: self.mesher.clone(),
        }
    }

    /// Builds the terrain generator from the noise layers and terrain scalars.
    ///
    /// # Errors
    /// Returns `Configuration` if a height layer has no settings or the warp is invalid.
    pub fn build_generator(&self) -> Result<TerrainGenerator> {
        let noise = &self.noise;
        let generator = TerrainGenerator::new(
            self.terrain.clone(),
            build_layer("base", noise.base.as_ref())?,
            build_layer("mountain", noise.mountain.as_ref())?,
            build_layer("river", noise.river.as_ref())?,
        )
        .with_materials(self.materials.clone());

        match &noise.warp_layer {
            Some(layer) => {
                let warp = DomainWarp::new(noise.warp.clone())?;
                debug!("Domain warp enabled with strength {}", noise.warp.strength);
                Ok(generator.with_warp(warp, layer.build()))
            }
            None => Ok(generator),
        }
    }

    /// Builds a mesher that expects chunk-sized grids.
    pub fn build_mesher(&self) -> GreedyMesher {
        GreedyMesher::new()
            .with_culling(self.mesher.cull_hidden_faces)
            .with_parallel_sides(self.mesher.parallel_sides)
            .expecting_cubic(self.world.chunk_size)
    }

    /// Builds an empty chunk manager, bounded if `max_resident_chunks` is set.
    pub fn build_manager(&self) -> ChunkManager {
        let world = &self.world;
        match world.max_resident_chunks.and_then(NonZeroUsize::new) {
            Some(capacity) => ChunkManager::with_capacity(world.chunk_size, world.voxel_size, capacity),
            None => ChunkManager::new(world.chunk_size, world.voxel_size),
        }
    }

    /// Builds the whole pipeline from the sanitized configuration.
    ///
    /// # Errors
    /// Returns `Configuration` if the generator cannot be built.
    pub fn build_world(&self) -> Result<VoxelWorld> {
        let config = self.sanitized();
        let world = VoxelWorld::new(
            config.build_manager(),
            config.build_generator()?,
            config.build_mesher(),
        )
        .with_generation_method(config.world.generation_method)
        .with_random_pattern(config.world.random_density, config.world.pattern_seed);
        Ok(world)
    }
}
