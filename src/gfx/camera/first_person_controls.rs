use std::f32::consts::FRAC_PI_2;

use cgmath::*;

use super::{CameraControls, PerspectiveCamera};
use crate::input::{InputEvent, Key};

/// Tuning for [`FirstPersonControls`].
#[derive(Debug, Clone, Copy)]
pub struct FirstPersonConfig {
    /// World units per second
    pub move_speed: f32,
    /// Radians per pixel of pointer motion
    pub look_speed: f32,
    /// Radians per second for Q/E turning
    pub turn_speed: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for FirstPersonConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.5,
            look_speed: 0.002,
            turn_speed: 1.5,
            min_pitch: -FRAC_PI_2 + 0.01,
            max_pitch: FRAC_PI_2 - 0.01,
        }
    }
}

impl FirstPersonConfig {
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    pub fn with_look_speed(mut self, speed: f32) -> Self {
        self.look_speed = speed;
        self
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct MovementState {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    turn_left: bool,
    turn_right: bool,
}

impl MovementState {
    const fn axis(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// (forward, right, up)
    const fn velocity(&self) -> (f32, f32, f32) {
        (
            Self::axis(self.forward, self.backward),
            Self::axis(self.right, self.left),
            Self::axis(self.up, self.down),
        )
    }

    const fn turn(&self) -> f32 {
        Self::axis(self.turn_left, self.turn_right)
    }

    fn set(&mut self, key: Key, pressed: bool) -> bool {
        let flag = match key {
            Key::W | Key::ArrowUp => &mut self.forward,
            Key::S | Key::ArrowDown => &mut self.backward,
            Key::A | Key::ArrowLeft => &mut self.left,
            Key::D | Key::ArrowRight => &mut self.right,
            Key::Space => &mut self.up,
            Key::Shift => &mut self.down,
            Key::Q => &mut self.turn_left,
            Key::E => &mut self.turn_right,
            _ => return false,
        };
        *flag = pressed;
        true
    }
}

/// Walk-and-look camera control.
///
/// Movement keys translate the camera on the horizontal plane (Space/Shift
/// for vertical), scaled by frame delta. Pointer motion turns the view only
/// while the pointer is locked.
#[derive(Debug, Clone)]
pub struct FirstPersonControls {
    pub config: FirstPersonConfig,
    yaw: f32,
    pitch: f32,
    movement: MovementState,
    locked: bool,
}

impl FirstPersonControls {
    pub fn new(config: FirstPersonConfig, camera: &PerspectiveCamera) -> Self {
        let mut controls = Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
            movement: MovementState::default(),
            locked: false,
        };
        controls.sync(camera);
        controls
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Release the pointer and stop any movement in progress.
    pub fn unlock(&mut self) {
        self.locked = false;
        self.movement = MovementState::default();
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// View direction derived from yaw and pitch.
    pub fn direction(&self) -> Vector3<f32> {
        Vector3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    fn look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.config.look_speed;
        self.pitch = (self.pitch - dy * self.config.look_speed)
            .clamp(self.config.min_pitch, self.config.max_pitch);
    }
}

impl CameraControls for FirstPersonControls {
    fn name(&self) -> &'static str {
        "first-person"
    }

    fn update(&mut self, delta: f32, camera: &mut PerspectiveCamera) {
        self.yaw += self.movement.turn() * self.config.turn_speed * delta;

        let (forward, right, up) = self.movement.velocity();
        let heading = Vector3::new(self.yaw.sin(), 0.0, self.yaw.cos());
        let side = heading.cross(Vector3::unit_y());
        let step = self.config.move_speed * delta;

        camera.position += (heading * forward + side * right + Vector3::unit_y() * up) * step;
        camera.target = camera.position + self.direction();
    }

    fn handle_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                self.movement.set(key, true);
            }
            InputEvent::KeyUp(key) => {
                self.movement.set(key, false);
            }
            InputEvent::PointerMoved { dx, dy } if self.locked => self.look(dx, dy),
            _ => {}
        }
    }

    fn sync(&mut self, camera: &PerspectiveCamera) {
        let direction = camera.direction();
        self.yaw = direction.x.atan2(direction.z);
        self.pitch = direction
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(self.config.min_pitch, self.config.max_pitch);
    }
}
