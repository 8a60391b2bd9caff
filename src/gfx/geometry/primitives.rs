//! Primitive shape generators. All shapes are centred on the origin, Y up.

use std::f32::consts::PI;

use super::Geometry;
use crate::gfx::scene::vertex::Vertex3D;

/// Face colours of [`colored_cube`], in face order +Z, -Z, -X, +X, +Y, -Y.
pub const FACE_COLORS: [[f32; 3]; 6] = [
    [0.93, 0.27, 0.27],
    [0.27, 0.80, 0.40],
    [0.25, 0.47, 0.95],
    [0.98, 0.80, 0.20],
    [0.70, 0.35, 0.90],
    [0.20, 0.85, 0.85],
];

// Outward normal, then the four corners counter-clockwise seen from outside.
#[rustfmt::skip]
const CUBE_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    ([0.0, 0.0, 1.0],
     [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    ([0.0, 0.0, -1.0],
     [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
    ([-1.0, 0.0, 0.0],
     [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
    ([1.0, 0.0, 0.0],
     [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
    ([0.0, 1.0, 0.0],
     [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
    ([0.0, -1.0, 0.0],
     [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
];

/// White cube with edge length `size`.
pub fn cube(size: f32) -> Geometry {
    build_cube(size, [[1.0; 3]; 6])
}

/// Cube whose six faces use [`FACE_COLORS`].
pub fn colored_cube(size: f32) -> Geometry {
    build_cube(size, FACE_COLORS)
}

/// Axis-aligned box with independent extents.
pub fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let mut geometry = cube(1.0);
    for vertex in &mut geometry.vertices {
        vertex.position[0] *= width;
        vertex.position[1] *= height;
        vertex.position[2] *= depth;
    }
    geometry
}

fn build_cube(size: f32, colors: [[f32; 3]; 6]) -> Geometry {
    let half = size * 0.5;
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for ((normal, corners), color) in CUBE_FACES.iter().zip(colors) {
        let base = vertices.len() as u32;
        for corner in corners {
            let position = [corner[0] * half, corner[1] * half, corner[2] * half];
            vertices.push(Vertex3D::new(position, *normal, color));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    Geometry::new(vertices, indices)
}

/// Horizontal plane in XZ facing +Y, subdivided into a grid.
pub fn plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> Geometry {
    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);
    let mut geometry = Geometry::default();

    for row in 0..=d_segs {
        let v = row as f32 / d_segs as f32;
        for column in 0..=w_segs {
            let u = column as f32 / w_segs as f32;
            geometry.vertices.push(Vertex3D::new(
                [(u - 0.5) * width, 0.0, (v - 0.5) * depth],
                [0.0, 1.0, 0.0],
                [1.0; 3],
            ));
        }
    }

    for row in 0..d_segs {
        for column in 0..w_segs {
            let i = row * (w_segs + 1) + column;
            let below = i + w_segs + 1;
            // Counter-clockwise seen from +Y
            geometry.indices.extend_from_slice(&[i, below, i + 1, i + 1, below, below + 1]);
        }
    }

    geometry
}

/// UV sphere.
pub fn sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> Geometry {
    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);
    let mut geometry = Geometry::default();

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let normal = [theta.sin() * phi.sin(), theta.cos(), theta.sin() * phi.cos()];
            let position = normal.map(|component| component * radius);
            geometry.vertices.push(Vertex3D::new(position, normal, [1.0; 3]));
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;
            geometry
                .indices
                .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }

    geometry
}
