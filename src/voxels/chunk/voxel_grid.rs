//! # Voxel Grid Module
//!
//! A dense, fixed-size 3D array of [`VoxelData`] records. Grids are what generators
//! produce, what chunks own, and what the greedy mesher reads.
//!
//! ## Layout
//!
//! Voxels are stored in row-major order, X fastest, then Y, then Z:
//! `index = x + dx * y + dx * dy * z`.
//!
//! ## Pattern Fills
//!
//! Besides the empty grid, a few deterministic fills are provided for debugging
//! and testing (solid, checkerboard, random), mirroring the chunk generation
//! methods selectable on the world.

use cgmath::Point3;

use crate::error::{Result, TerrainError};
use crate::voxels::block::{block_type::BlockType, VoxelData};

use super::chunk_iteration::ChunkBlockIterator;

/// A dense 3D grid of voxels.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    dimensions: [usize; 3],
    voxels: Vec<VoxelData>,
}

impl VoxelGrid {
    /// Creates a grid of the given dimensions filled with air.
    pub fn new(dimensions: [usize; 3]) -> Self {
        let len = dimensions[0] * dimensions[1] * dimensions[2];
        VoxelGrid {
            dimensions,
            voxels: vec![VoxelData::AIR; len],
        }
    }

    /// Creates a cubic `size³` grid filled with air.
    pub fn cubic(size: usize) -> Self {
        Self::new([size, size, size])
    }

    /// Wraps an existing voxel vector.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `voxels.len()` is not the product of `dimensions`.
    pub fn from_voxels(dimensions: [usize; 3], voxels: Vec<VoxelData>) -> Result<Self> {
        let expected = dimensions[0] * dimensions[1] * dimensions[2];
        if voxels.len() != expected {
            return Err(TerrainError::DimensionMismatch {
                expected: dimensions,
                found: [voxels.len(), 1, 1],
            });
        }
        Ok(VoxelGrid { dimensions, voxels })
    }

    /// Creates a grid where every voxel has the given solid type.
    pub fn solid(dimensions: [usize; 3], block_type: BlockType) -> Self {
        let mut grid = Self::new(dimensions);
        grid.voxels.fill(VoxelData::new(block_type));
        grid
    }

    /// Creates a 3D checkerboard: a voxel is solid when `x + y + z` is even.
    pub fn checkerboard(dimensions: [usize; 3], block_type: BlockType) -> Self {
        let mut grid = Self::new(dimensions);
        for z in 0..dimensions[2] {
            for y in 0..dimensions[1] {
                for x in 0..dimensions[0] {
                    if (x + y + z) % 2 == 0 {
                        grid.set(x, y, z, VoxelData::new(block_type));
                    }
                }
            }
        }
        grid
    }

    /// Creates a grid where each voxel is solid with probability `density`.
    ///
    /// Solid voxels get a random solid type. The same `seed` always yields the same grid.
    pub fn random(dimensions: [usize; 3], density: f64, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut grid = Self::new(dimensions);
        for voxel in grid.voxels.iter_mut() {
            if rng.f64() < density {
                *voxel = VoxelData::new(BlockType::random_solid(&mut rng));
            }
        }
        grid
    }

    /// The grid dimensions as `[x, y, z]`.
    #[inline]
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// Total number of voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Whether the grid has zero volume.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Linear index of a coordinate. The caller guarantees it is in bounds.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.dimensions[0] * (y + self.dimensions[1] * z)
    }

    /// Whether a coordinate lies inside the grid.
    #[inline]
    pub fn contains(&self, position: [usize; 3]) -> bool {
        position[0] < self.dimensions[0]
            && position[1] < self.dimensions[1]
            && position[2] < self.dimensions[2]
    }

    /// Gets the voxel at the specified coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> &VoxelData {
        &self.voxels[self.index(x, y, z)]
    }

    /// Same as [`VoxelGrid::get`] but takes a `[x, y, z]` triple.
    #[inline]
    pub fn get_at(&self, position: [usize; 3]) -> &VoxelData {
        self.get(position[0], position[1], position[2])
    }

    /// Gets the voxel at a point, or `None` if it is outside the grid.
    pub fn try_get(&self, position: Point3<usize>) -> Option<&VoxelData> {
        let p = [position.x, position.y, position.z];
        self.contains(p).then(|| self.get_at(p))
    }

    /// Overwrites the voxel at the specified coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelData) {
        let index = self.index(x, y, z);
        self.voxels[index] = voxel;
    }

    /// Read-only view of the raw voxel storage.
    pub fn voxels(&self) -> &[VoxelData] {
        &self.voxels
    }

    /// Number of non-air voxels.
    pub fn solid_count(&self) -> usize {
        self.solid_voxels().count()
    }

    /// Iterates over the non-air voxels together with their positions.
    pub fn solid_voxels(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout_is_x_fastest() {
        let grid = VoxelGrid::new([4, 3, 2]);
        assert_eq!(grid.index(1, 0, 0), 1);
        assert_eq!(grid.index(0, 1, 0), 4);
        assert_eq!(grid.index(0, 0, 1), 12);
        assert_eq!(grid.len(), 24);
    }

    #[test]
    fn test_from_voxels_rejects_wrong_length() {
        let result = VoxelGrid::from_voxels([2, 2, 2], vec![VoxelData::AIR; 7]);
        assert!(matches!(result, Err(TerrainError::DimensionMismatch { .. })));
        assert!(VoxelGrid::from_voxels([2, 2, 2], vec![VoxelData::AIR; 8]).is_ok());
    }

    #[test]
    fn test_checkerboard_alternates() {
        let grid = VoxelGrid::checkerboard([2, 2, 2], BlockType::STONE);
        assert!(grid.get(0, 0, 0).is_solid());
        assert!(!grid.get(1, 0, 0).is_solid());
        assert!(!grid.get(0, 1, 0).is_solid());
        assert!(grid.get(1, 1, 0).is_solid());
        assert!(grid.get(1, 0, 1).is_solid());
        assert_eq!(grid.solid_count(), 4);
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = VoxelGrid::random([8, 8, 8], 0.4, 99);
        let b = VoxelGrid::random([8, 8, 8], 0.4, 99);
        assert_eq!(a, b);
        assert!(a.solid_count() > 0 && a.solid_count() < a.len());
    }

    #[test]
    fn test_try_get_out_of_bounds() {
        let grid = VoxelGrid::cubic(2);
        assert!(grid.try_get(Point3::new(1, 1, 1)).is_some());
        assert!(grid.try_get(Point3::new(2, 0, 0)).is_none());
    }
}
