//! Construction-time options for the screen hierarchy.
//!
//! Every struct enumerates its options with a `Default`; `with_*` setters
//! override single fields.

use cgmath::{Deg, Point3};

use super::viewport::Dimension;
use crate::gfx::camera::PerspectiveCamera;

pub use crate::gfx::camera::{FirstPersonConfig, OrbitConfig};

/// Options of the base screen.
#[derive(Debug)]
pub struct ScreenConfig {
    pub width: Dimension,
    pub height: Dimension,
    /// Device scale factor; invalid values fall back to 1.0
    pub pixel_density: f64,
    /// Name of the drawable surface, used as the window title by the host
    pub surface_label: String,
    /// Log frame statistics once per second
    pub stats: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: Dimension::Fixed(1280),
            height: Dimension::Fixed(720),
            pixel_density: 1.0,
            surface_label: "vitrine-surface".to_string(),
            stats: false,
        }
    }
}

impl ScreenConfig {
    pub fn with_size(mut self, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        self.width = width.into();
        self.height = height.into();
        self
    }

    pub fn with_pixel_density(mut self, density: f64) -> Self {
        self.pixel_density = density;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.surface_label = label.into();
        self
    }

    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.stats = enabled;
        self
    }
}

/// Options of [`PerspectiveScreen`](super::PerspectiveScreen).
#[derive(Debug)]
pub struct PerspectiveConfig {
    pub screen: ScreenConfig,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, -5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl PerspectiveConfig {
    pub fn with_screen(mut self, screen: ScreenConfig) -> Self {
        self.screen = screen;
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn with_target(mut self, target: [f32; 3]) -> Self {
        self.target = target;
        self
    }

    /// Camera described by these options at the given aspect.
    pub fn camera(&self, aspect: f32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(Deg(self.fov), aspect, self.near, self.far);
        camera.position = Point3::from(self.position);
        camera.look_at(Point3::from(self.target));
        camera
    }
}

/// Options of [`OrbitScreen`](super::OrbitScreen).
#[derive(Debug, Default)]
pub struct OrbitScreenConfig {
    pub perspective: PerspectiveConfig,
    pub orbit: OrbitConfig,
}

impl OrbitScreenConfig {
    pub fn with_perspective(mut self, perspective: PerspectiveConfig) -> Self {
        self.perspective = perspective;
        self
    }

    pub fn with_orbit(mut self, orbit: OrbitConfig) -> Self {
        self.orbit = orbit;
        self
    }
}

/// Options of [`FirstPersonScreen`](super::FirstPersonScreen).
#[derive(Debug, Default)]
pub struct FirstPersonScreenConfig {
    pub perspective: PerspectiveConfig,
    pub first_person: FirstPersonConfig,
}

impl FirstPersonScreenConfig {
    pub fn with_perspective(mut self, perspective: PerspectiveConfig) -> Self {
        self.perspective = perspective;
        self
    }

    pub fn with_first_person(mut self, first_person: FirstPersonConfig) -> Self {
        self.first_person = first_person;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PerspectiveConfig::default();
        assert_eq!(config.fov, 45.0);
        assert_eq!(config.near, 0.1);
        assert_eq!(config.far, 100.0);
        assert_eq!(config.position, [0.0, 0.0, -5.0]);
        assert!(!config.screen.stats);
        assert_eq!(config.screen.surface_label, "vitrine-surface");
    }

    #[test]
    fn builders_override_single_fields() {
        let config = PerspectiveConfig::default()
            .with_fov(60.0)
            .with_screen(
                ScreenConfig::default()
                    .with_size(Dimension::Fixed(320), Dimension::Fixed(240))
                    .with_stats(true),
            );

        assert_eq!(config.fov, 60.0);
        assert_eq!(config.near, 0.1);
        assert_eq!(config.screen.width.resolve(), 320);
        assert!(config.screen.stats);
    }

    #[test]
    fn camera_looks_at_target() {
        let camera = PerspectiveConfig::default()
            .with_position([0.0, 2.0, 0.0])
            .with_target([0.0, 2.0, 3.0])
            .camera(1.5);

        assert_eq!(camera.aspect, 1.5);
        assert!((camera.direction().z - 1.0).abs() < 1e-6);
        assert!(camera.validate().is_ok());
    }
}
