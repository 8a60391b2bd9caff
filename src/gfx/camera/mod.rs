pub mod first_person_controls;
pub mod orbit_controls;
pub mod perspective_camera;

pub use first_person_controls::{FirstPersonConfig, FirstPersonControls};
pub use orbit_controls::{OrbitConfig, OrbitControls};
pub use perspective_camera::{CameraUniform, PerspectiveCamera};

use crate::input::InputEvent;

/// A camera manipulation scheme driven by input and per-frame updates.
pub trait CameraControls {
    /// Short name used in logs, e.g. `"orbit"`.
    fn name(&self) -> &'static str;

    /// Apply pending motion to the camera. Called once per frame.
    fn update(&mut self, delta: f32, camera: &mut PerspectiveCamera);

    fn handle_input(&mut self, event: &InputEvent);

    /// Adopt the camera's current pose, e.g. after another control scheme moved it.
    fn sync(&mut self, camera: &PerspectiveCamera);
}
