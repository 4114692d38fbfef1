//! Greedy meshing implementation.
//!
//! For each of the six face directions the grid is swept one depth slice at a
//! time. Inside a slice, every unprocessed solid cell seeds a rectangle that
//! first grows along the side's `u` axis and then along its `v` axis for the
//! full current width. Each rectangle becomes one quad and its cells are marked
//! processed so the same face is never emitted twice from one direction.
//!
//! Without culling, a face is emitted for every solid cell in every direction,
//! including faces buried between two solid voxels. Enabling
//! [`GreedyMesher::cull_hidden_faces`] skips cells whose neighbour along the
//! face normal is solid.

use std::thread;

use bitvec::prelude::{bitvec, BitVec};
use cgmath::Point3;
use log::trace;
use web_time::Instant;

use crate::error::{Result, TerrainError};
use crate::voxels::block::{block_side::BlockSide, block_type::BlockType};
use crate::voxels::chunk::VoxelGrid;

use super::{face::Face, mesh::Mesh};

/// Converts voxel grids into quad meshes by merging coplanar faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyMesher {
    /// Skip faces whose neighbour along the normal is solid and inside the grid.
    pub cull_hidden_faces: bool,
    /// Run the six direction passes on scoped threads. Output is unchanged.
    pub parallel_sides: bool,
    /// Reject grids that do not have exactly these dimensions.
    pub expected_dimensions: Option<[usize; 3]>,
}

impl GreedyMesher {
    /// A mesher that emits every face and runs single-threaded.
    pub fn new() -> Self {
        GreedyMesher::default()
    }

    /// Returns this mesher with hidden-face culling switched on or off.
    pub fn with_culling(mut self, cull_hidden_faces: bool) -> Self {
        self.cull_hidden_faces = cull_hidden_faces;
        self
    }

    /// Returns this mesher with parallel direction passes switched on or off.
    pub fn with_parallel_sides(mut self, parallel_sides: bool) -> Self {
        self.parallel_sides = parallel_sides;
        self
    }

    /// Returns this mesher requiring every grid to be `size³`.
    pub fn expecting_cubic(mut self, size: usize) -> Self {
        self.expected_dimensions = Some([size; 3]);
        self
    }

    fn check_dimensions(&self, grid: &VoxelGrid) -> Result<()> {
        match self.expected_dimensions {
            Some(expected) if expected != grid.dimensions() => {
                Err(TerrainError::DimensionMismatch {
                    expected,
                    found: grid.dimensions(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Generates a mesh for the whole grid.
    ///
    /// The grid is only read. Calling this twice on the same grid yields identical
    /// buffers in identical order. An all-air grid yields an empty mesh.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the mesher expects different dimensions.
    pub fn generate_mesh(&self, grid: &VoxelGrid) -> Result<Mesh> {
        let start = Instant::now();
        let faces = self.collect_faces(grid)?;
        let mesh = Mesh::from_faces(&faces);
        trace!(
            "Greedy mesh of {:?}: {} quads from {} solid voxels in {:?}",
            grid.dimensions(),
            faces.len(),
            grid.solid_count(),
            start.elapsed()
        );
        Ok(mesh)
    }

    /// Runs the merge passes and returns the resulting faces, side by side in
    /// [`BlockSide::all`] order.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the mesher expects different dimensions.
    pub fn collect_faces(&self, grid: &VoxelGrid) -> Result<Vec<Face>> {
        self.check_dimensions(grid)?;

        let mut faces = Vec::new();
        if self.parallel_sides {
            let cull = self.cull_hidden_faces;
            thread::scope(|scope| {
                let handles = BlockSide::all().map(|side| {
                    scope.spawn(move || {
                        let mut processed = bitvec![0; grid.len()];
                        let mut side_faces = Vec::new();
                        greedy_side(grid, side, cull, &mut processed, &mut side_faces);
                        side_faces
                    })
                });
                for handle in handles {
                    match handle.join() {
                        Ok(side_faces) => faces.extend(side_faces),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
            });
        } else {
            // allocated once per call, cleared before each direction
            let mut processed = bitvec![0; grid.len()];
            for side in BlockSide::all() {
                processed.fill(false);
                greedy_side(grid, side, self.cull_hidden_faces, &mut processed, &mut faces);
            }
        }
        Ok(faces)
    }
}

/// Whether the face of the cell at `position` on `side` would be covered by a solid neighbour.
fn is_face_hidden(grid: &VoxelGrid, side: BlockSide, position: [usize; 3]) -> bool {
    let (_, _, d) = side.axes();
    let mut neighbour = position;
    if side.is_positive() {
        neighbour[d] += 1;
    } else if neighbour[d] == 0 {
        return false;
    } else {
        neighbour[d] -= 1;
    }
    grid.contains(neighbour) && grid.get_at(neighbour).is_solid()
}

/// Whether the cell at `position` can join a rectangle of `block_type` faces.
fn is_mergeable(
    grid: &VoxelGrid,
    processed: &BitVec,
    side: BlockSide,
    cull: bool,
    position: [usize; 3],
    block_type: BlockType,
) -> bool {
    let index = grid.index(position[0], position[1], position[2]);
    !processed[index]
        && grid.voxels()[index].block_type == block_type
        && !(cull && is_face_hidden(grid, side, position))
}

/// Emits the merged faces of a single direction into `faces`.
///
/// `processed` must be cleared and sized to the grid.
fn greedy_side(
    grid: &VoxelGrid,
    side: BlockSide,
    cull: bool,
    processed: &mut BitVec,
    faces: &mut Vec<Face>,
) {
    let dimensions = grid.dimensions();
    let (u, v, d) = side.axes();
    let emitted_before = faces.len();

    for depth in 0..dimensions[d] {
        for a in 0..dimensions[u] {
            for b in 0..dimensions[v] {
                let mut seed = [0; 3];
                seed[d] = depth;
                seed[u] = a;
                seed[v] = b;

                let block_type = grid.get_at(seed).block_type;
                if !block_type.is_solid()
                    || !is_mergeable(grid, processed, side, cull, seed, block_type)
                {
                    continue;
                }

                let at = |du: usize, dv: usize| {
                    let mut position = seed;
                    position[u] += du;
                    position[v] += dv;
                    position
                };

                let mut width = 1;
                while a + width < dimensions[u]
                    && is_mergeable(grid, processed, side, cull, at(width, 0), block_type)
                {
                    width += 1;
                }

                let mut height = 1;
                'grow: while b + height < dimensions[v] {
                    for du in 0..width {
                        if !is_mergeable(grid, processed, side, cull, at(du, height), block_type) {
                            break 'grow;
                        }
                    }
                    height += 1;
                }

                for dv in 0..height {
                    for du in 0..width {
                        let p = at(du, dv);
                        let index = grid.index(p[0], p[1], p[2]);
                        processed.set(index, true);
                    }
                }

                faces.push(Face {
                    block_side: side,
                    origin: Point3::from(seed),
                    width,
                    height,
                    block_type,
                });
            }
        }
    }

    trace!("{:?}: {} faces", side, faces.len() - emitted_before);
}
