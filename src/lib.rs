//! Vitrine
//!
//! A gallery of small 3D showcases built on a screen lifecycle layer: a
//! responsive viewport, a frame clock, update and resize callback
//! registries and a render loop, rendered with wgpu inside a winit window.

pub mod app;
pub mod error;
pub mod gfx;
pub mod input;
pub mod loader;
pub mod screen;
pub mod showcase;
pub mod stats;

pub use app::ShowcaseApp;
pub use error::{LoadError, ScreenError};
pub use screen::Screen;
