use std::f32::consts::PI;

use cgmath::*;

use super::{CameraControls, PerspectiveCamera};
use crate::input::{InputEvent, Key, PointerButton};

/// Tuning for [`OrbitControls`]. Every field has a default.
#[derive(Debug, Clone, Copy)]
pub struct OrbitConfig {
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update while damping
    pub damping_factor: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    /// Radians per pixel of pointer drag
    pub rotate_speed: f32,
    /// Log-scale zoom per wheel line
    pub zoom_speed: f32,
    /// Fraction of the orbit distance per pixel of pan drag
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle bounds, measured from the up axis
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_pan: true,
            enable_zoom: true,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.001,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

impl OrbitConfig {
    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.enable_damping = enabled;
        self
    }

    pub fn with_pan(mut self, enabled: bool) -> Self {
        self.enable_pan = enabled;
        self
    }

    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_polar_range(mut self, min: f32, max: f32) -> Self {
        self.min_polar_angle = min;
        self.max_polar_angle = max;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y
    phi: f32,
    /// Azimuth around +Y, zero along +Z
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            return Self {
                radius: 0.0,
                phi: PI / 2.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        Vector3::new(
            self.radius * self.phi.sin() * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.cos(),
        )
    }
}

/// Orbits the camera around a target point.
///
/// Primary drag rotates, secondary drag (or shift + primary drag) pans, the
/// wheel zooms. Shift + C restores the pose captured at construction.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub config: OrbitConfig,
    pub target: Point3<f32>,
    spherical: Spherical,
    home: (Point3<f32>, Spherical),
    pending_theta: f32,
    pending_phi: f32,
    pending_zoom: f32,
    pending_pan: Vector2<f32>,
    rotating: bool,
    panning: bool,
    shift_held: bool,
}

impl OrbitControls {
    pub fn new(config: OrbitConfig, camera: &PerspectiveCamera) -> Self {
        let spherical = Spherical::from_offset(camera.position - camera.target);
        Self {
            config,
            target: camera.target,
            spherical,
            home: (camera.target, spherical),
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_zoom: 0.0,
            pending_pan: Vector2::zero(),
            rotating: false,
            panning: false,
            shift_held: false,
        }
    }

    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    pub fn polar_angle(&self) -> f32 {
        self.spherical.phi
    }

    pub fn azimuth_angle(&self) -> f32 {
        self.spherical.theta
    }

    /// Queue a rotation, applied (possibly damped) by the next updates
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        self.pending_theta += azimuth;
        self.pending_phi += polar;
    }

    /// Queue a zoom step; positive values move closer
    pub fn zoom(&mut self, amount: f32) {
        if self.config.enable_zoom {
            self.pending_zoom -= amount * self.config.zoom_speed;
        }
    }

    /// Queue a pan in screen pixels
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.config.enable_pan {
            self.pending_pan += Vector2::new(dx, dy);
        }
    }

    pub fn reset(&mut self) {
        let (target, spherical) = self.home;
        self.target = target;
        self.spherical = spherical;
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_zoom = 0.0;
        self.pending_pan = Vector2::zero();
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    fn apply_pan(&mut self, pan: Vector2<f32>, camera: &PerspectiveCamera) {
        let forward = camera.direction();
        let right = forward.cross(camera.up);
        if right.magnitude2() <= f32::EPSILON {
            return;
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();

        let scale = self.spherical.radius.max(1.0) * self.config.pan_speed;
        self.target += (-right * pan.x + up * pan.y) * scale;
    }
}

impl CameraControls for OrbitControls {
    fn name(&self) -> &'static str {
        "orbit"
    }

    fn update(&mut self, _delta: f32, camera: &mut PerspectiveCamera) {
        let factor = if self.config.enable_damping {
            self.config.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.spherical.theta += self.pending_theta * factor;
        self.spherical.phi += self.pending_phi * factor;

        let min_phi = self.config.min_polar_angle.max(f32::EPSILON);
        let max_phi = self.config.max_polar_angle.min(PI - f32::EPSILON);
        self.spherical.phi = self.spherical.phi.clamp(min_phi, max_phi.max(min_phi));

        self.spherical.radius *= (self.pending_zoom * factor).exp();
        let max_distance = self.config.max_distance.max(self.config.min_distance);
        self.spherical.radius = self
            .spherical
            .radius
            .clamp(self.config.min_distance, max_distance);

        let pan = self.pending_pan * factor;
        self.apply_pan(pan, camera);

        let keep = 1.0 - factor;
        self.pending_theta *= keep;
        self.pending_phi *= keep;
        self.pending_zoom *= keep;
        self.pending_pan *= keep;

        camera.position = self.target + self.spherical.to_offset();
        camera.look_at(self.target);
    }

    fn handle_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(Key::Shift) => self.shift_held = true,
            InputEvent::KeyUp(Key::Shift) => self.shift_held = false,
            InputEvent::KeyDown(Key::C) if self.shift_held => {
                log::debug!("orbit controls reset to home pose");
                self.reset();
            }
            InputEvent::PointerDown(PointerButton::Primary) => {
                if self.shift_held && self.config.enable_pan {
                    self.panning = true;
                } else {
                    self.rotating = true;
                }
            }
            InputEvent::PointerDown(PointerButton::Secondary) if self.config.enable_pan => {
                self.panning = true;
            }
            InputEvent::PointerUp(_) => {
                self.rotating = false;
                self.panning = false;
            }
            InputEvent::PointerMoved { dx, dy } => {
                if self.rotating {
                    let speed = self.config.rotate_speed;
                    self.rotate(-dx * speed, -dy * speed);
                } else if self.panning {
                    self.pan(dx, dy);
                }
            }
            InputEvent::Wheel { delta } => self.zoom(delta),
            _ => {}
        }
    }

    fn sync(&mut self, camera: &PerspectiveCamera) {
        self.target = camera.target;
        self.spherical = Spherical::from_offset(camera.position - camera.target);
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_zoom = 0.0;
        self.pending_pan = Vector2::zero();
    }
}
