use std::rc::Rc;

use cgmath::*;

use crate::gfx::geometry::Geometry;

/// Translation, Euler rotation (radians, applied X then Y then Z) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn rotate(&mut self, x: f32, y: f32, z: f32) {
        self.rotation += Vector3::new(x, y, z);
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.position += offset;
    }

    /// Model matrix `T * Rz * Ry * Rx * S`.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Drawable element of a [`Scene`](super::Scene).
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    /// Tint multiplied with the vertex colours
    pub color: [f32; 4],
    pub visible: bool,
    geometry: Rc<Geometry>,
    revision: u64,
}

impl Node {
    pub fn new(name: impl Into<String>, geometry: impl Into<Rc<Geometry>>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            color: [1.0; 4],
            visible: true,
            geometry: geometry.into(),
            revision: 0,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: impl Into<Rc<Geometry>>) {
        self.geometry = geometry.into();
        self.revision += 1;
    }

    /// Bumped whenever the geometry is replaced, so GPU copies can be refreshed.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::cube;

    #[test]
    fn identity_transform_by_default() {
        assert_eq!(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn matrix_scales_rotates_then_translates() {
        let transform = Transform::from_position(1.0, 0.0, 0.0)
            .with_rotation(0.0, std::f32::consts::FRAC_PI_2, 0.0)
            .with_scale(2.0);

        let point = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) scaled to (2,0,0), turned about Y to (0,0,-2), moved by +X
        let expected = Vector3::new(1.0, 0.0, -2.0);
        assert!((point.truncate() - expected).magnitude() < 1e-5);
    }

    #[test]
    fn replacing_geometry_bumps_revision() {
        let mut node = Node::new("box", cube(1.0));
        assert_eq!(node.revision(), 0);

        node.set_geometry(cube(2.0));
        assert_eq!(node.revision(), 1);
        assert_eq!(node.geometry().vertex_count(), 24);
    }
}
