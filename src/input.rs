//! Platform-neutral input events and the winit translation layer.
//!
//! Control strategies consume [`InputEvent`] so they can be driven from tests
//! without a window; [`from_window_event`] and [`from_device_event`] bridge
//! winit's event types.

use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys the showcases and control strategies react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    C,
    Space,
    Shift,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown(PointerButton),
    PointerUp(PointerButton),
    /// Relative pointer motion in physical pixels
    PointerMoved { dx: f32, dy: f32 },
    /// Scroll amount in lines, positive away from the user
    Wheel { delta: f32 },
}

/// Translate a window event. Pointer motion comes from device events instead.
pub fn from_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(code) = event.physical_key else {
                return None;
            };
            let key = keycode_to_key(code)?;
            Some(match event.state {
                ElementState::Pressed => InputEvent::KeyDown(key),
                ElementState::Released => InputEvent::KeyUp(key),
            })
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let button = mouse_button_to_pointer(*button)?;
            Some(match state {
                ElementState::Pressed => InputEvent::PointerDown(button),
                ElementState::Released => InputEvent::PointerUp(button),
            })
        }
        WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel {
            delta: match delta {
                MouseScrollDelta::LineDelta(_, lines) => *lines,
                // Roughly one line per 40 pixels of trackpad scroll
                MouseScrollDelta::PixelDelta(position) => position.y as f32 / 40.0,
            },
        }),
        _ => None,
    }
}

/// Translate a raw device event (unaccelerated pointer motion).
pub fn from_device_event(event: &DeviceEvent) -> Option<InputEvent> {
    match event {
        DeviceEvent::MouseMotion { delta } => Some(InputEvent::PointerMoved {
            dx: delta.0 as f32,
            dy: delta.1 as f32,
        }),
        _ => None,
    }
}

fn keycode_to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::KeyE => Some(Key::E),
        KeyCode::KeyC => Some(Key::C),
        KeyCode::Space => Some(Key::Space),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Key::Shift),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::ArrowUp => Some(Key::ArrowUp),
        KeyCode::ArrowDown => Some(Key::ArrowDown),
        KeyCode::ArrowLeft => Some(Key::ArrowLeft),
        KeyCode::ArrowRight => Some(Key::ArrowRight),
        _ => None,
    }
}

fn mouse_button_to_pointer(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit keyboard events carry platform-private fields, so only the
    // mappings and device events are exercised here.

    #[test]
    fn maps_movement_keys() {
        assert_eq!(keycode_to_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(keycode_to_key(KeyCode::ShiftRight), Some(Key::Shift));
        assert_eq!(keycode_to_key(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(keycode_to_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn maps_mouse_buttons() {
        assert_eq!(
            mouse_button_to_pointer(MouseButton::Left),
            Some(PointerButton::Primary)
        );
        assert_eq!(
            mouse_button_to_pointer(MouseButton::Right),
            Some(PointerButton::Secondary)
        );
        assert_eq!(mouse_button_to_pointer(MouseButton::Back), None);
    }

    #[test]
    fn translates_mouse_motion() {
        let event = DeviceEvent::MouseMotion { delta: (3.0, -2.5) };
        assert_eq!(
            from_device_event(&event),
            Some(InputEvent::PointerMoved { dx: 3.0, dy: -2.5 })
        );
    }
}
