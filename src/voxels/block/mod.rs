//! # Block Module
//!
//! This module provides the per-voxel data record and the types it is built from:
//! the material enum and the six face directions.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// A single voxel record.
///
/// Voxel records are plain values owned by the grid that contains them. They are written
/// wholesale at generation time and only read during meshing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VoxelData {
    /// The material of this voxel. `BlockType::AIR` means empty.
    pub block_type: BlockType,
    /// Biome identifier assigned by the terrain generator.
    pub biome: u8,
    /// Sky light level in `[0, 1]`.
    pub light: f32,
}

impl VoxelData {
    /// An empty voxel.
    pub const AIR: VoxelData = VoxelData {
        block_type: BlockType::AIR,
        biome: 0,
        light: 0.0,
    };

    /// Creates a voxel of the given type with no biome and no light.
    pub fn new(block_type: BlockType) -> Self {
        VoxelData {
            block_type,
            ..Self::AIR
        }
    }

    /// Whether this voxel is anything other than air.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.block_type.is_solid()
    }
}
