use cgmath::*;

use crate::error::ScreenError;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::<f32>::identity().into(),
        }
    }
}

/// Perspective camera looking from `position` towards `target`.
///
/// The projection matrix is cached; call [`update_projection_matrix`] after
/// changing `fov`, `aspect`, `near` or `far`.
///
/// [`update_projection_matrix`]: PerspectiveCamera::update_projection_matrix
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub fov: Deg<f32>,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov: Deg<f32>, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Unit vector from the eye towards the target.
    pub fn direction(&self) -> Vector3<f32> {
        let forward = self.target - self.position;
        if forward.magnitude2() > f32::EPSILON {
            forward.normalize()
        } else {
            -Vector3::unit_z()
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn set_fov(&mut self, fov: Deg<f32>) {
        self.fov = fov;
        self.update_projection_matrix();
    }

    /// Recompute the cached projection matrix.
    ///
    /// Invalid parameters keep the previous matrix; [`validate`] reports them.
    ///
    /// [`validate`]: PerspectiveCamera::validate
    pub fn update_projection_matrix(&mut self) {
        if self.validate().is_ok() {
            self.projection =
                OPENGL_TO_WGPU_MATRIX * perspective(self.fov, self.aspect, self.near, self.far);
        }
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let up = if self.direction().cross(self.up).magnitude2() > f32::EPSILON {
            self.up
        } else {
            // Looking straight along `up`; pick any perpendicular axis.
            Vector3::unit_z()
        };
        Matrix4::look_to_rh(self.position, self.direction(), up)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.position.to_homogeneous().into(),
            view_proj: self.view_projection().into(),
        }
    }

    /// Check that the camera describes a renderable frustum.
    pub fn validate(&self) -> Result<(), ScreenError> {
        let fov = self.fov.0;
        if !(fov.is_finite() && fov > 0.0 && fov < 180.0) {
            return Err(ScreenError::InvalidArgument(format!(
                "camera field of view must be within (0, 180) degrees, got {fov}"
            )));
        }
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return Err(ScreenError::InvalidArgument(format!(
                "camera aspect must be positive, got {}",
                self.aspect
            )));
        }
        let finite = self.near.is_finite() && self.far.is_finite();
        if !(finite && self.near > 0.0 && self.far > self.near) {
            return Err(ScreenError::InvalidArgument(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        Ok(())
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(Deg(45.0), 1.0, 0.1, 100.0)
    }
}
