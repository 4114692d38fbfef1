//! # Voxel Storage
//!
//! This module contains the data side of the terrain core: what a voxel is, how
//! voxels are grouped into chunks, and how chunks are tracked on the world grid.
//!
//! * **Block**: voxel types, the per-voxel record and the six face directions
//! * **Chunk**: fixed-size cubic grids of voxels that own their mesh
//! * **Chunk Manager**: the registry of resident chunks and their load events
//!
//! Voxel data flows one way: a generator writes a grid into a chunk, the chunk
//! marks itself dirty, and the mesher later reads the grid without modifying it.

pub mod block;
pub mod chunk;
pub mod chunk_manager;
