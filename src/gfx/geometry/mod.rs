//! # Procedural and loaded geometry
//!
//! Everything the renderer draws is a [`Geometry`]: an indexed triangle list
//! of [`Vertex3D`]. The [`primitives`] module builds the common shapes the
//! showcases use; [`Geometry::from_obj_mesh`] converts meshes produced by the
//! OBJ loader.
//!
//! ```
//! use vitrine::gfx::geometry::{cube, sphere};
//!
//! let boxy = cube(1.0);
//! assert_eq!(boxy.triangle_count(), 12);
//!
//! let ball = sphere(0.5, 16, 8);
//! assert!(ball.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Indexed triangle list, counter-clockwise winding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Paint every vertex with one colour.
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
        self
    }

    /// Append `other`, offsetting its indices past the current vertices.
    pub fn append(&mut self, other: &Geometry) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Build geometry from a triangulated, single-index OBJ mesh.
    ///
    /// Missing or mismatched normals are replaced by accumulated face normals.
    pub fn from_obj_mesh(mesh: &tobj::Mesh) -> Self {
        let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            face_normals(&mesh.positions, &mesh.indices)
        };

        let vertices = mesh
            .positions
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .map(|(p, n)| {
                Vertex3D::new([p[0], p[1], p[2]], [n[0], n[1], n[2]], [1.0; 3])
            })
            .collect();

        Self::new(vertices, mesh.indices.clone())
    }
}

/// Per-vertex normals averaged from the faces that share each vertex.
fn face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let mut normals = vec![0.0f32; positions.len()];
    let corner = |i: u32| {
        let i = i as usize * 3;
        cgmath::Vector3::new(positions[i], positions[i + 1], positions[i + 2])
    };

    for triangle in indices.chunks_exact(3) {
        let (a, b, c) = (triangle[0], triangle[1], triangle[2]);
        let vertex_count = (positions.len() / 3) as u32;
        if a >= vertex_count || b >= vertex_count || c >= vertex_count {
            continue;
        }
        let normal = (corner(b) - corner(a)).cross(corner(c) - corner(a));
        for &i in triangle {
            let i = i as usize * 3;
            normals[i] += normal.x;
            normals[i + 1] += normal.y;
            normals[i + 2] += normal.z;
        }
    }

    for normal in normals.chunks_exact_mut(3) {
        let length = normal.iter().map(|c| c * c).sum::<f32>().sqrt();
        if length > f32::EPSILON {
            normal.iter_mut().for_each(|component| *component /= length);
        } else {
            normal.copy_from_slice(&[0.0, 1.0, 0.0]);
        }
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_offsets_indices() {
        let mut merged = cube(1.0);
        let vertices = merged.vertex_count() as u32;
        merged.append(&cube(2.0));

        assert_eq!(merged.triangle_count(), 24);
        assert_eq!(merged.indices[36], merged.indices[0] + vertices);
    }

    #[test]
    fn obj_mesh_without_normals_gets_face_normals() {
        let mesh = tobj::Mesh {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            indices: vec![0, 1, 2],
            ..Default::default()
        };

        let geometry = Geometry::from_obj_mesh(&mesh);
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.triangle_count(), 1);
        for vertex in &geometry.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn with_color_paints_all_vertices() {
        let geometry = cube(1.0).with_color([0.2, 0.4, 0.6]);
        let painted = |vertex: &Vertex3D| vertex.color == [0.2, 0.4, 0.6];
        assert!(geometry.vertices.iter().all(painted));
    }
}
