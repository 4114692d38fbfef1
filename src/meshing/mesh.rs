//! Mesh data structures produced by the greedy mesher.
//!
//! A [`Mesh`] keeps positions, triangle indices and UVs in separate buffers.
//! Normals and bounds are not authored per quad; they are recomputed from the
//! triangle data once all quads have been emitted.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, Zero};

use super::{face::Face, vertex::Vertex};

/// Axis-aligned bounding box of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner
    pub min: Point3<f32>,
    /// Maximum corner
    pub max: Point3<f32>,
}

impl Bounds {
    /// Midpoint of the box.
    pub fn center(&self) -> Point3<f32> {
        self.min.midpoint(self.max)
    }

    /// Edge lengths of the box.
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// A renderable triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions in chunk-local voxel units
    pub vertices: Vec<Point3<f32>>,
    /// Triangle list, three indices per triangle
    pub indices: Vec<u32>,
    /// One UV per vertex
    pub uvs: Vec<[f32; 2]>,
    /// One unit normal per vertex, derived from winding
    pub normals: Vec<Vector3<f32>>,
    /// Bounds of `vertices`, `None` for an empty mesh
    pub bounds: Option<Bounds>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Builds a mesh from merged faces, four vertices and two triangles per face.
    ///
    /// Normals and bounds are recalculated before returning.
    pub fn from_faces(faces: &[Face]) -> Self {
        let mut mesh = Mesh {
            vertices: Vec::with_capacity(faces.len() * 4),
            indices: Vec::with_capacity(faces.len() * 6),
            uvs: Vec::with_capacity(faces.len() * 4),
            normals: Vec::new(),
            bounds: None,
        };

        for face in faces {
            mesh.add_face(face);
        }

        mesh.recalculate_normals();
        mesh.recalculate_bounds();
        mesh
    }

    /// Appends the vertices, UVs and indices of a single face.
    fn add_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        for (position, uv) in face.corners() {
            self.vertices.push(position);
            self.uvs.push(uv);
        }
        self.indices
            .extend_from_slice(&Self::generate_face_indices(base));
    }

    /// Generates the index data for one quad whose first vertex is `base`.
    ///
    /// # Returns
    /// Two triangles, `(0, 1, 2)` and `(0, 2, 3)`, offset by `base`.
    pub fn generate_face_indices(base: u32) -> [u32; 6] {
        [base, base + 1, base + 2, base, base + 2, base + 3]
    }

    /// Recomputes per-vertex normals from triangle winding.
    ///
    /// Each triangle contributes its area-weighted face normal to its three
    /// vertices; the sums are then normalized. Vertices not referenced by any
    /// non-degenerate triangle get a zero normal.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vector3::zero(); self.vertices.len()];
        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let (pa, pb, pc) = (self.vertices[a], self.vertices[b], self.vertices[c]);
            let face_normal = (pb - pa).cross(pc - pa);
            normals[a] += face_normal;
            normals[b] += face_normal;
            normals[c] += face_normal;
        }
        for normal in normals.iter_mut() {
            if normal.magnitude2() > 0.0 {
                *normal = normal.normalize();
            }
        }
        self.normals = normals;
    }

    /// Recomputes the bounding box from the vertex positions.
    pub fn recalculate_bounds(&mut self) {
        self.bounds = self.vertices.split_first().map(|(first, rest)| {
            rest.iter().fold(
                Bounds {
                    min: *first,
                    max: *first,
                },
                |bounds, p| Bounds {
                    min: Point3::new(
                        bounds.min.x.min(p.x),
                        bounds.min.y.min(p.y),
                        bounds.min.z.min(p.z),
                    ),
                    max: Point3::new(
                        bounds.max.x.max(p.x),
                        bounds.max.y.max(p.y),
                        bounds.max.z.max(p.z),
                    ),
                },
            )
        });
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of quads (four vertices each).
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and UVs into a GPU-ready vertex buffer.
    pub fn gpu_vertices(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((position, normal), uv)| Vertex {
                position: [position.x, position.y, position.z],
                normal: [normal.x, normal.y, normal.z],
                tex_coords: *uv,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::{block_side::BlockSide, block_type::BlockType};

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mesh = Mesh::from_faces(&[]);
        assert!(mesh.is_empty());
        assert!(mesh.bounds.is_none());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_face_indices_offset_by_base() {
        assert_eq!(Mesh::generate_face_indices(8), [8, 9, 10, 8, 10, 11]);
    }

    #[test]
    fn test_normals_point_outward() {
        for side in BlockSide::all() {
            let face = Face::unit(Point3::new(0, 0, 0), BlockType::STONE, side);
            let mesh = Mesh::from_faces(&[face]);
            let expected = side.normal().cast::<f32>().unwrap_or(Vector3::zero());
            for normal in &mesh.normals {
                assert!((*normal - expected).magnitude() < 1e-6, "{side:?}: {normal:?}");
            }
        }
    }

    #[test]
    fn test_gpu_vertices_interleave_buffers() {
        let face = Face::unit(Point3::new(1, 1, 1), BlockType::STONE, BlockSide::TOP);
        let mesh = Mesh::from_faces(&[face]);
        let vertices = mesh.gpu_vertices();
        assert_eq!(vertices.len(), 4);
        for (vertex, position) in vertices.iter().zip(&mesh.vertices) {
            assert_eq!(vertex.position, [position.x, position.y, position.z]);
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
    }
}
