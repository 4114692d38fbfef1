//! # Block Type Module
//!
//! This module defines the material types a voxel can hold.
//! It provides conversion from the compact byte representation and random type selection.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Enumerates all possible voxel types in the terrain.
///
/// `AIR` is the only empty type; every other variant is solid and takes part in meshing.
/// The `FromPrimitive` derive allows conversion from the stored byte.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. Never produces faces.
    #[default]
    AIR = 0,

    /// Bedrock-like ground. The default material for every solid cell.
    STONE = 1,

    /// Soil found a few cells below the surface.
    DIRT = 2,

    /// The topmost solid layer of a column.
    GRASS = 3,

    /// Loose ground, typically carved by rivers.
    SAND = 4,
}

impl BlockType {
    /// Converts a stored byte back into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the byte does not name a known type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(btype)
    }

    /// Returns the compact byte representation of this type.
    pub fn as_int(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether this type is anything other than air.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// Picks a random solid type (excluding `AIR`) from the given generator.
    ///
    /// Used by the random pattern fill; the caller seeds the generator so output is reproducible.
    pub fn random_solid(rng: &mut fastrand::Rng) -> Self {
        Self::from_int(rng.u8(1..=4)).unwrap_or(BlockType::STONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip_for_known_types() {
        for ty in [
            BlockType::AIR,
            BlockType::STONE,
            BlockType::DIRT,
            BlockType::GRASS,
            BlockType::SAND,
        ] {
            assert_eq!(BlockType::from_int(ty.as_int()), Some(ty));
        }
        assert_eq!(BlockType::from_int(200), None);
    }

    #[test]
    fn test_random_solid_never_air() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..256 {
            assert!(BlockType::random_solid(&mut rng).is_solid());
        }
    }
}
