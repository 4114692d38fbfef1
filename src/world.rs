//! # World Module
//!
//! This module provides `VoxelWorld`, the coordinator that ties the chunk
//! manager, the terrain generator and the mesher together.
//!
//! ## Pipeline
//!
//! ```text
//! load_chunk / load_radius        rebuild_meshes
//!   ChunkManager --Loaded--> fill    Chunk::regenerate --> Mesh
//! ```
//!
//! Loading is two explicit steps. The manager places an uninitialized chunk and
//! emits [`ChunkEvent::Loaded`]; the world then drains its event receiver and fills
//! every newly loaded chunk. Meshing is pull-based and only touches dirty chunks.
//!
//! ## Chunk Generation
//!
//! Multiple generation strategies are supported:
//! - Noise terrain from the [`TerrainGenerator`]
//! - Checkerboard pattern for testing
//! - Solid chunks (all blocks filled)
//! - Empty chunks (all blocks air)
//! - Random chunks with a fixed solid density

use std::fmt;
use std::sync::mpsc::Receiver;

use cgmath::Point3;
use log::{info, trace};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::error::Result;
use crate::generation::TerrainGenerator;
use crate::meshing::GreedyMesher;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::chunk::{Chunk, VoxelGrid};
use crate::voxels::chunk_manager::{ChunkEvent, ChunkManager};

/// How newly loaded chunks are filled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Terrain from the noise layers.
    #[default]
    Noise,
    /// Alternating stone and air.
    Checkerboard,
    /// Every voxel stone.
    Solid,
    /// Every voxel air.
    Empty,
    /// Each voxel solid with a fixed probability, seeded per chunk.
    Random,
}

/// Totals gathered by [`VoxelWorld::rebuild_meshes`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Resident chunks.
    pub chunks: usize,
    /// Chunks whose mesh was rebuilt by this call.
    pub rebuilt: usize,
    /// Quads over every meshed chunk.
    pub quads: usize,
    /// Triangles, two per quad.
    pub triangles: usize,
    /// Vertices, four per quad.
    pub vertices: usize,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chunks ({} rebuilt): {} quads, {} triangles, {} vertices",
            self.chunks, self.rebuilt, self.quads, self.triangles, self.vertices
        )
    }
}

/// A voxel world: resident chunks plus the generator and mesher that fill and draw them.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_terrain::{EngineConfig, GenerationMethod};
///
/// let mut config = EngineConfig::default();
/// config.world.chunk_size = 4;
/// config.world.generation_method = GenerationMethod::Solid;
///
/// let mut world = config.build_world()?;
/// world.load_chunk(Point3::new(0, 0, 0))?;
/// let stats = world.rebuild_meshes()?;
/// // one 4×4 quad per side and depth slice
/// assert_eq!(stats.quads, 6 * 4);
/// # Ok::<(), voxel_terrain::TerrainError>(())
/// ```
pub struct VoxelWorld {
    manager: ChunkManager,
    generator: TerrainGenerator,
    mesher: GreedyMesher,
    events: Receiver<ChunkEvent>,
    method: GenerationMethod,
    random_density: f64,
    pattern_seed: u64,
}

impl VoxelWorld {
    /// Creates a world from its parts and subscribes to the manager's chunk events.
    ///
    /// # Arguments
    /// * `manager` - Owner of the resident chunks
    /// * `generator` - Fills chunks when the method is [`GenerationMethod::Noise`]
    /// * `mesher` - Builds chunk meshes
    pub fn new(mut manager: ChunkManager, generator: TerrainGenerator, mesher: GreedyMesher) -> Self {
        let events = manager.subscribe();
        VoxelWorld {
            manager,
            generator,
            mesher,
            events,
            method: GenerationMethod::default(),
            random_density: 0.5,
            pattern_seed: 0,
        }
    }

    /// Returns this world filling chunks with `method`.
    pub fn with_generation_method(mut self, method: GenerationMethod) -> Self {
        self.method = method;
        self
    }

    /// Returns this world using the given density and base seed for random chunks.
    pub fn with_random_pattern(mut self, density: f64, seed: u64) -> Self {
        self.random_density = density;
        self.pattern_seed = seed;
        self
    }

    /// The chunk registry.
    pub fn manager(&self) -> &ChunkManager {
        &self.manager
    }

    /// The terrain generator used by [`GenerationMethod::Noise`].
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// The mesher applied by [`VoxelWorld::rebuild_meshes`].
    pub fn mesher(&self) -> &GreedyMesher {
        &self.mesher
    }

    /// How newly loaded chunks are filled.
    pub fn generation_method(&self) -> GenerationMethod {
        self.method
    }

    /// The resident chunk at `position`, if any.
    pub fn chunk(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.manager.get(position)
    }

    /// Loads and fills the chunk at `position`. Loading a resident chunk does nothing.
    pub fn load_chunk(&mut self, position: Point3<i32>) -> Result<()> {
        self.manager.load_chunk(position);
        self.fill_loaded()?;
        Ok(())
    }

    /// Loads and fills every chunk within `radius` of `center` on each axis.
    ///
    /// # Returns
    /// The positions that were newly loaded.
    pub fn load_radius(&mut self, center: Point3<i32>, radius: i32) -> Result<Vec<Point3<i32>>> {
        let start = Instant::now();
        let loaded = self.manager.load_radius(center, radius);
        let filled = self.fill_loaded()?;
        info!("Filled {} chunks in {:?}", filled, start.elapsed());
        Ok(loaded)
    }

    /// Unloads the chunk at `position`, returning whether it was resident.
    pub fn unload_chunk(&mut self, position: Point3<i32>) -> Result<bool> {
        let unloaded = self.manager.unload_chunk(position).is_some();
        self.fill_loaded()?;
        Ok(unloaded)
    }

    /// Rebuilds the mesh of every dirty chunk.
    ///
    /// # Returns
    /// Totals over every resident chunk that has a mesh.
    pub fn rebuild_meshes(&mut self) -> Result<MeshStats> {
        let start = Instant::now();
        let mut stats = MeshStats::default();
        for chunk in self.manager.chunks_mut() {
            stats.chunks += 1;
            if chunk.is_dirty() {
                stats.rebuilt += 1;
            }
            if let Some(mesh) = chunk.regenerate(&self.mesher)? {
                stats.quads += mesh.quad_count();
                stats.triangles += mesh.triangle_count();
                stats.vertices += mesh.vertices.len();
            }
        }
        info!("Rebuilt {} meshes in {:?}", stats.rebuilt, start.elapsed());
        Ok(stats)
    }

    /// Drops every chunk.
    pub fn clear(&mut self) -> Result<()> {
        self.manager.clear_all();
        self.fill_loaded()?;
        Ok(())
    }

    /// Drains pending chunk events and fills every chunk that was loaded.
    ///
    /// Chunks that were evicted again before their event was handled are skipped.
    fn fill_loaded(&mut self) -> Result<usize> {
        let mut filled = 0;
        while let Ok(event) = self.events.try_recv() {
            match event {
                ChunkEvent::Loaded(position) => {
                    let Some(chunk) = self.manager.get_mut(position) else {
                        trace!("Chunk {:?} left before it was filled", position);
                        continue;
                    };
                    let size = [chunk.size(); 3];
                    match self.method {
                        GenerationMethod::Noise => self.generator.populate(chunk)?,
                        GenerationMethod::Checkerboard => {
                            chunk.set_voxel_data(VoxelGrid::checkerboard(size, BlockType::STONE))?
                        }
                        GenerationMethod::Solid => {
                            chunk.set_voxel_data(VoxelGrid::solid(size, BlockType::STONE))?
                        }
                        GenerationMethod::Empty => chunk.set_voxel_data(VoxelGrid::new(size))?,
                        GenerationMethod::Random => {
                            let seed = chunk_seed(self.pattern_seed, position);
                            chunk.set_voxel_data(VoxelGrid::random(size, self.random_density, seed))?
                        }
                    }
                    filled += 1;
                }
                ChunkEvent::Unloaded(position) => trace!("Chunk {:?} unloaded", position),
                ChunkEvent::Cleared => trace!("World cleared"),
            }
        }
        Ok(filled)
    }
}

/// Mixes a base seed with a chunk position so neighbouring random chunks differ.
fn chunk_seed(seed: u64, position: Point3<i32>) -> u64 {
    let hash = (position.x as i64 as u64).wrapping_mul(73_856_093)
        ^ (position.y as i64 as u64).wrapping_mul(19_349_663)
        ^ (position.z as i64 as u64).wrapping_mul(83_492_791);
    seed ^ hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::voxels::chunk::ChunkState;

    fn world(method: GenerationMethod, chunk_size: usize) -> VoxelWorld {
        let mut config = EngineConfig::default();
        config.world.chunk_size = chunk_size;
        config.world.generation_method = method;
        config.build_world().unwrap()
    }

    #[test]
    fn test_load_chunk_fills_data() {
        let mut world = world(GenerationMethod::Solid, 4);
        world.load_chunk(Point3::new(2, -1, 0)).unwrap();

        let chunk = world.chunk(Point3::new(2, -1, 0)).unwrap();
        assert_eq!(chunk.state(), ChunkState::DataLoaded);
        assert_eq!(chunk.voxels().unwrap().solid_count(), 64);
    }

    #[test]
    fn test_load_chunk_is_idempotent() {
        let mut world = world(GenerationMethod::Noise, 8);
        world.load_chunk(Point3::new(0, 0, 0)).unwrap();
        world.rebuild_meshes().unwrap();
        let id = world.chunk(Point3::new(0, 0, 0)).unwrap().id();

        world.load_chunk(Point3::new(0, 0, 0)).unwrap();
        let chunk = world.chunk(Point3::new(0, 0, 0)).unwrap();
        assert_eq!(chunk.id(), id);
        // a reload does not refill, so the built mesh stays current
        assert_eq!(chunk.state(), ChunkState::Meshed);
        assert_eq!(world.manager().len(), 1);
    }

    #[test]
    fn test_rebuild_meshes_only_touches_dirty_chunks() {
        let mut world = world(GenerationMethod::Checkerboard, 2);
        world.load_radius(Point3::new(0, 0, 0), 1).unwrap();

        let first = world.rebuild_meshes().unwrap();
        assert_eq!(first.chunks, 27);
        assert_eq!(first.rebuilt, 27);
        // a 2×2×2 checkerboard has four isolated voxels
        assert_eq!(first.quads, 27 * 4 * 6);
        assert_eq!(first.triangles, first.quads * 2);
        assert_eq!(first.vertices, first.quads * 4);

        let second = world.rebuild_meshes().unwrap();
        assert_eq!(second.rebuilt, 0);
        assert_eq!(second.quads, first.quads);
    }

    #[test]
    fn test_empty_method_yields_empty_meshes() {
        let mut world = world(GenerationMethod::Empty, 4);
        world.load_chunk(Point3::new(0, 0, 0)).unwrap();
        let stats = world.rebuild_meshes().unwrap();
        assert_eq!(stats.rebuilt, 1);
        assert_eq!(stats.quads, 0);
        assert!(world.chunk(Point3::new(0, 0, 0)).unwrap().mesh().unwrap().is_empty());
    }

    #[test]
    fn test_random_chunks_are_seeded_per_position() {
        let mut first = world(GenerationMethod::Random, 8).with_random_pattern(0.5, 42);
        first.load_chunk(Point3::new(0, 0, 0)).unwrap();
        first.load_chunk(Point3::new(1, 0, 0)).unwrap();

        let a = first.chunk(Point3::new(0, 0, 0)).unwrap().voxels().unwrap().clone();
        let b = first.chunk(Point3::new(1, 0, 0)).unwrap().voxels().unwrap().clone();
        assert_ne!(a, b);

        let mut again = world(GenerationMethod::Random, 8).with_random_pattern(0.5, 42);
        again.load_chunk(Point3::new(1, 0, 0)).unwrap();
        assert_eq!(again.chunk(Point3::new(1, 0, 0)).unwrap().voxels().unwrap(), &b);
    }

    #[test]
    fn test_clear_and_unload() {
        let mut world = world(GenerationMethod::Solid, 2);
        world.load_radius(Point3::new(0, 0, 0), 1).unwrap();
        assert!(world.unload_chunk(Point3::new(1, 1, 1)).unwrap());
        assert!(!world.unload_chunk(Point3::new(1, 1, 1)).unwrap());
        assert_eq!(world.manager().len(), 26);

        world.clear().unwrap();
        assert!(world.manager().is_empty());

        // reloading after a clear fills the chunk again
        world.load_chunk(Point3::new(0, 0, 0)).unwrap();
        assert_eq!(
            world.chunk(Point3::new(0, 0, 0)).unwrap().state(),
            ChunkState::DataLoaded
        );
    }

    #[test]
    fn test_evicted_chunks_are_skipped() {
        let mut config = EngineConfig::default();
        config.world.chunk_size = 2;
        config.world.generation_method = GenerationMethod::Solid;
        config.world.max_resident_chunks = Some(4);
        let mut world = config.build_world().unwrap();

        let loaded = world.load_radius(Point3::new(0, 0, 0), 1).unwrap();
        assert_eq!(loaded.len(), 27);
        assert_eq!(world.manager().len(), 4);
        assert!(world
            .manager()
            .chunks()
            .all(|chunk| chunk.state() == ChunkState::DataLoaded));
    }
}
