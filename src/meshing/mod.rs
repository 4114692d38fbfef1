//! Mesh generation for voxel grids.
//!
//! This module converts dense voxel grids into renderable quad meshes. It implements
//! greedy meshing to reduce the number of vertices and triangles by merging adjacent
//! coplanar faces of the same material.
//!
//! # Architecture
//! - [`GreedyMesher`]: the configurable merge pass over all six face directions
//! - [`Face`]: a merged rectangle of voxel faces, the mesher's intermediate output
//! - [`Mesh`]: separate position / index / UV buffers with recomputed normals and bounds
//! - [`Vertex`]: interleaved, `Pod` vertex for upload by an external renderer
//!
//! # Usage
//! ```no_run
//! use voxel_terrain::meshing::GreedyMesher;
//! use voxel_terrain::voxels::chunk::VoxelGrid;
//!
//! let grid = VoxelGrid::cubic(16);
//! let mesh = GreedyMesher::new().generate_mesh(&grid).unwrap();
//! assert!(mesh.is_empty());
//! ```

mod face;
mod greedy;
mod mesh;
mod vertex;

pub use face::Face;
pub use greedy::GreedyMesher;
pub use mesh::{Bounds, Mesh};
pub use vertex::Vertex;
