//! # Chunk Iteration Module
//!
//! This module provides an iterator over the non-air voxels of a grid, yielding
//! each voxel together with its grid-local position in storage order.

use cgmath::Point3;

use crate::voxels::block::VoxelData;

use super::voxel_grid::VoxelGrid;

/// An iterator over all non-air voxels in a grid.
///
/// Air voxels are skipped. Positions advance X first, then Y, then Z, matching
/// the grid's storage order.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the grid being iterated over
    grid_ref: &'a VoxelGrid,
    /// Current position in the voxel storage
    current_offset: usize,
    /// Current X position within the grid
    local_x: usize,
    /// Current Y position within the grid
    local_y: usize,
    /// Current Z position within the grid
    local_z: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` positioned before the first voxel.
    pub fn new(grid_ref: &'a VoxelGrid) -> Self {
        ChunkBlockIterator {
            grid_ref,
            current_offset: 0,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    fn advance(&mut self) {
        let [dx, dy, _] = self.grid_ref.dimensions();
        self.current_offset += 1;
        self.local_x += 1;
        if self.local_x == dx {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == dy {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<usize>, &'a VoxelData);

    fn next(&mut self) -> Option<Self::Item> {
        let voxels = self.grid_ref.voxels();
        while self.current_offset < voxels.len() {
            let voxel = &voxels[self.current_offset];
            let position = Point3::new(self.local_x, self.local_y, self.local_z);
            self.advance();
            if voxel.is_solid() {
                return Some((position, voxel));
            }
        }
        None
    }
}
