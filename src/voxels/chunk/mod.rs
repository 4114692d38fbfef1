//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size cubic partition of the
//! voxel world that owns its voxel grid and the mesh derived from it.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --set_voxel_data--> DataLoaded (dirty) --regenerate--> Meshed (clean)
//!                                         ^                                 |
//!                                         +---------set_voxel_data----------+
//! ```
//!
//! Rebuilding is pull-based: nothing polls the chunk. Callers decide when to
//! call [`Chunk::regenerate`], which only runs the mesher if the data changed.

use cgmath::{Point3, Vector3};
use log::debug;
use web_time::Instant;

use crate::error::{Result, TerrainError};
use crate::meshing::{GreedyMesher, Mesh};

pub mod chunk_iteration;
pub mod voxel_grid;

pub use voxel_grid::VoxelGrid;

/// The default edge length of a chunk in voxels.
pub const CHUNK_DIMENSION: usize = 16;
/// The default world-space edge length of a single voxel.
pub const DEFAULT_VOXEL_SIZE: f32 = 1.0;

/// Where a chunk is in its generate-then-mesh lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Placed in the world but no voxel data has been supplied yet.
    Uninitialized,
    /// Voxel data is present and the mesh is stale or missing.
    DataLoaded,
    /// The mesh reflects the current voxel data.
    Meshed,
}

/// Represents an N×N×N collection of voxels in the world.
pub struct Chunk {
    /// Identity assigned by the chunk manager; unique among chunks it created.
    id: u64,
    /// The position of this chunk in chunk coordinates (not voxel coordinates).
    pub position: Point3<i32>,
    /// Edge length in voxels.
    size: usize,
    /// World-space edge length of one voxel.
    voxel_size: f32,
    voxels: Option<VoxelGrid>,
    mesh: Option<Mesh>,
    dirty: bool,
}

impl Chunk {
    /// Creates an uninitialized chunk at the given grid position.
    ///
    /// # Arguments
    /// * `id` - Identity of the chunk within its manager
    /// * `position` - The chunk coordinates of the new chunk
    /// * `size` - The edge length of the chunk in voxels
    /// * `voxel_size` - The world-space size of a single voxel
    pub fn new(id: u64, position: Point3<i32>, size: usize, voxel_size: f32) -> Self {
        Chunk {
            id,
            position,
            size,
            voxel_size,
            voxels: None,
            mesh: None,
            dirty: false,
        }
    }

    /// Identity of this chunk within its manager.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Edge length in voxels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// World-space edge length of one voxel.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// World-space placement of the chunk's minimum corner voxel:
    /// `position * size * voxel_size`.
    pub fn world_position(&self) -> Vector3<f32> {
        let edge = self.size as f32 * self.voxel_size;
        Vector3::new(
            self.position.x as f32 * edge,
            self.position.y as f32 * edge,
            self.position.z as f32 * edge,
        )
    }

    /// World-space voxel coordinate of the chunk's local origin.
    pub fn voxel_origin(&self) -> Point3<i64> {
        let size = self.size as i64;
        Point3::new(
            self.position.x as i64 * size,
            self.position.y as i64 * size,
            self.position.z as i64 * size,
        )
    }

    /// Replaces the voxel grid and marks the chunk dirty.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` unless the grid is exactly `size³`.
    pub fn set_voxel_data(&mut self, grid: VoxelGrid) -> Result<()> {
        let expected = [self.size; 3];
        if grid.dimensions() != expected {
            return Err(TerrainError::DimensionMismatch {
                expected,
                found: grid.dimensions(),
            });
        }
        self.voxels = Some(grid);
        self.dirty = true;
        Ok(())
    }

    /// The current voxel grid, if any has been supplied.
    pub fn voxels(&self) -> Option<&VoxelGrid> {
        self.voxels.as_ref()
    }

    /// The most recently built mesh, if any.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// Whether the mesh is stale relative to the voxel data.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The chunk's lifecycle state.
    pub fn state(&self) -> ChunkState {
        match (&self.voxels, self.dirty) {
            (None, _) => ChunkState::Uninitialized,
            (Some(_), true) => ChunkState::DataLoaded,
            (Some(_), false) => ChunkState::Meshed,
        }
    }

    /// Rebuilds the mesh if the voxel data changed since the last build.
    ///
    /// The previous mesh is discarded and replaced. A clean chunk returns its
    /// existing mesh without touching the mesher.
    ///
    /// # Returns
    /// The current mesh, or `None` if no voxel data has been supplied yet.
    pub fn regenerate(&mut self, mesher: &GreedyMesher) -> Result<Option<&Mesh>> {
        if self.dirty {
            if let Some(grid) = &self.voxels {
                let start = Instant::now();
                let mesh = mesher.generate_mesh(grid)?;
                debug!(
                    "Meshed chunk {:?}: {} quads in {:?}",
                    self.position,
                    mesh.quad_count(),
                    start.elapsed()
                );
                self.mesh = Some(mesh);
            }
            self.dirty = false;
        }
        Ok(self.mesh.as_ref())
    }
}
