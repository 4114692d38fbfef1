use cgmath::Point3;

use crate::voxels::block::{block_side::BlockSide, block_type::BlockType};

/// Represents a single merged quad produced by the greedy mesher.
///
/// A face starts at the seed voxel `origin` and covers `width` voxels along the
/// side's first in-plane axis and `height` voxels along the second (see
/// [`BlockSide::axes`]). The depth coordinate is that of the seed voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Which side of the voxels this face represents
    pub block_side: BlockSide,
    /// The seed voxel (minimum corner of the merged rectangle) in grid coordinates
    pub origin: Point3<usize>,
    /// Extent along the first in-plane axis, in voxels
    pub width: usize,
    /// Extent along the second in-plane axis, in voxels
    pub height: usize,
    /// Material shared by every voxel the face covers
    pub block_type: BlockType,
}

impl Face {
    /// Creates a 1×1 face for the voxel at the given coordinates.
    pub fn unit(origin: Point3<usize>, block_type: BlockType, block_side: BlockSide) -> Self {
        Face {
            block_side,
            origin,
            width: 1,
            height: 1,
            block_type,
        }
    }

    /// Number of voxel faces merged into this quad.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether the grid cell at `position` is one of the cells this face was merged from.
    pub fn covers(&self, position: Point3<usize>) -> bool {
        let (u, v, d) = self.block_side.axes();
        let (p, o) = (
            [position.x, position.y, position.z],
            [self.origin.x, self.origin.y, self.origin.z],
        );
        p[d] == o[d]
            && (o[u]..o[u] + self.width).contains(&p[u])
            && (o[v]..o[v] + self.height).contains(&p[v])
    }

    /// The four corner positions of the quad, in the side's winding order.
    ///
    /// Voxel centers sit on integer coordinates with extents of ±0.5, so a face on
    /// the positive side of voxel `x` lies on the plane `x + 0.5`.
    ///
    /// # Returns
    /// Pairs of `(position, uv)` where `uv` is the matching unit-square corner.
    pub fn corners(&self) -> [(Point3<f32>, [f32; 2]); 4] {
        let (u, v, d) = self.block_side.axes();
        let origin = [
            self.origin.x as f32,
            self.origin.y as f32,
            self.origin.z as f32,
        ];
        let depth = if self.block_side.is_positive() {
            origin[d] + 0.5
        } else {
            origin[d] - 0.5
        };
        let u_edges = [origin[u] - 0.5, origin[u] + self.width as f32 - 0.5];
        let v_edges = [origin[v] - 0.5, origin[v] + self.height as f32 - 0.5];

        self.block_side.corner_order().map(|(a, b)| {
            let mut position = [0.0; 3];
            position[d] = depth;
            position[u] = u_edges[a as usize];
            position[v] = v_edges[b as usize];
            (Point3::from(position), [a as f32, b as f32])
        })
    }
}
