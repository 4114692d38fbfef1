//! Interleaved vertex format handed to an external renderer.

/// A vertex as laid out in a GPU vertex buffer.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in chunk-local voxel units
    pub position: [f32; 3],
    /// Unit normal recomputed from triangle winding
    pub normal: [f32; 3],
    /// UV texture coordinates (unit square per quad)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Size of one vertex in bytes, for buffer stride declarations.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Views a vertex slice as raw bytes ready for upload.
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_and_byte_view() {
        let vertices = [Vertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 1.0, 0.0],
            tex_coords: [0.0, 1.0],
        }; 3];
        assert_eq!(Vertex::STRIDE, 32);
        assert_eq!(Vertex::as_bytes(&vertices).len(), 3 * Vertex::STRIDE);
    }
}
