//! # Graphics
//!
//! The rendering collaborator of the screen layer.
//!
//! - **Camera** ([`camera`]) - perspective camera plus orbit and first-person controls
//! - **Geometry** ([`geometry`]) - procedural primitives and OBJ mesh conversion
//! - **Scene** ([`scene`]) - flat scene graph of named, transformed nodes
//! - **Rendering** ([`rendering`]) - the [`Renderer`] trait with wgpu and headless
//!   implementations
//! - **Resources** ([`resources`]) - GPU texture helpers
//!
//! [`Renderer`]: rendering::Renderer

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::PerspectiveCamera;
pub use rendering::{HeadlessRenderer, Renderer, WgpuRenderer};
pub use scene::Scene;
