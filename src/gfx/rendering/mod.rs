//! Renderers that draw a [`Scene`] through a [`PerspectiveCamera`].
//!
//! Screens only talk to the [`Renderer`] trait. [`WgpuRenderer`] draws into a
//! window surface; [`HeadlessRenderer`] records what it was asked to do and
//! backs tests and windowless runs.

pub mod headless;
pub mod render_engine;

pub use headless::HeadlessRenderer;
pub use render_engine::WgpuRenderer;

use crate::gfx::{camera::PerspectiveCamera, scene::Scene};

pub trait Renderer {
    /// Resize the drawable area, in logical pixels. Zero sizes are ignored.
    fn set_size(&mut self, width: u32, height: u32);

    /// Physical pixels per logical pixel.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Draw one frame.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);

    /// Current drawable size in logical pixels.
    fn size(&self) -> (u32, u32);

    fn pixel_ratio(&self) -> f64;
}

/// Physical size for a logical size and pixel ratio, never below 1x1.
pub(crate) fn physical_size(width: u32, height: u32, ratio: f64) -> (u32, u32) {
    let scale = |value: u32| ((value as f64 * ratio).round() as u32).max(1);
    (scale(width), scale(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_applies_ratio() {
        assert_eq!(physical_size(800, 600, 2.0), (1600, 1200));
        assert_eq!(physical_size(801, 601, 1.5), (1202, 902));
        assert_eq!(physical_size(0, 10, 1.0), (1, 10));
    }
}
