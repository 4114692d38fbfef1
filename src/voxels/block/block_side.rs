//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel and the fixed
//! per-face tables the mesher relies on: which grid axes span the face plane,
//! which axis is the depth (normal) axis, and the corner winding.

use cgmath::Vector3;

/// Index of the X axis in `[x, y, z]` triples.
pub const AXIS_X: usize = 0;
/// Index of the Y axis in `[x, y, z]` triples.
pub const AXIS_Y: usize = 1;
/// Index of the Z axis in `[x, y, z]` triples.
pub const AXIS_Z: usize = 2;

/// Represents the six possible faces of a voxel.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT].
/// Mesh output is emitted side by side in this order.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

/// Corner order for faces whose `u × v` already points along the outward normal.
const CORNERS_FORWARD: [(u8, u8); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];
/// Corner order for faces whose `u × v` points inward; reversing keeps winding counter-clockwise.
const CORNERS_REVERSED: [(u8, u8); 4] = [(0, 0), (0, 1), (1, 1), (1, 0)];

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Returns the in-plane axes and the depth axis for this face as `(u, v, depth)`.
    ///
    /// Rectangles grow along `u` first, then along `v`.
    ///
    /// | Side      | u | v | depth |
    /// |-----------|---|---|-------|
    /// | LEFT/RIGHT| Z | Y | X     |
    /// | BOTTOM/TOP| X | Z | Y     |
    /// | FRONT/BACK| X | Y | Z     |
    pub fn axes(self) -> (usize, usize, usize) {
        match self {
            BlockSide::LEFT | BlockSide::RIGHT => (AXIS_Z, AXIS_Y, AXIS_X),
            BlockSide::BOTTOM | BlockSide::TOP => (AXIS_X, AXIS_Z, AXIS_Y),
            BlockSide::FRONT | BlockSide::BACK => (AXIS_X, AXIS_Y, AXIS_Z),
        }
    }

    /// Whether the face points along the positive direction of its depth axis.
    pub fn is_positive(self) -> bool {
        matches!(self, BlockSide::FRONT | BlockSide::TOP | BlockSide::RIGHT)
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// The hardcoded corner order for a quad on this face.
    ///
    /// Each entry is `(a, b)` where `a` selects the `u` edge (0 = start, 1 = end)
    /// and `b` selects the `v` edge. Triangles `(0, 1, 2)` and `(0, 2, 3)` built from
    /// this order wind counter-clockwise when viewed from outside the voxel.
    pub fn corner_order(self) -> [(u8, u8); 4] {
        match self {
            // u × v is -X, -Y and +Z respectively
            BlockSide::LEFT => CORNERS_FORWARD,
            BlockSide::RIGHT => CORNERS_REVERSED,
            BlockSide::BOTTOM => CORNERS_FORWARD,
            BlockSide::TOP => CORNERS_REVERSED,
            BlockSide::FRONT => CORNERS_FORWARD,
            BlockSide::BACK => CORNERS_REVERSED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn unit(axis: usize) -> Vector3<f32> {
        let mut v = Vector3::new(0.0, 0.0, 0.0);
        v[axis] = 1.0;
        v
    }

    #[test]
    fn test_corner_order_winds_outward() {
        for side in BlockSide::all() {
            let (u, v, _) = side.axes();
            let corner = |(a, b): (u8, u8)| unit(u) * a as f32 + unit(v) * b as f32;
            let order = side.corner_order();
            let (p0, p1, p2) = (corner(order[0]), corner(order[1]), corner(order[2]));
            let winding_normal = (p1 - p0).cross(p2 - p0);
            let n = side.normal().cast::<f32>().unwrap_or(Vector3::new(0.0, 0.0, 0.0));
            assert!(winding_normal.dot(n) > 0.0, "{side:?} winds inward");
        }
    }

    #[test]
    fn test_axes_are_distinct() {
        for side in BlockSide::all() {
            let (u, v, d) = side.axes();
            assert!(u != v && v != d && u != d);
            assert_eq!(side.normal()[d].abs(), 1);
        }
    }
}
