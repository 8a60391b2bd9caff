//! # Scene graph
//!
//! A [`Scene`] is the root the renderer draws each frame. It holds
//! [`Node`]s addressed by [`NodeId`], each pairing shared [`Geometry`] with a
//! [`Transform`] and a tint colour.
//!
//! ```
//! use vitrine::gfx::geometry::colored_cube;
//! use vitrine::gfx::scene::{Node, Scene, Transform};
//!
//! let mut scene = Scene::new();
//! let lifted = Transform::from_position(0.0, 0.5, 0.0);
//! let id = scene.add(Node::new("box", colored_cube(1.0)).with_transform(lifted));
//! scene.get_mut(id).unwrap().transform.rotate(0.0, 0.1, 0.0);
//! ```
//!
//! [`Geometry`]: crate::gfx::geometry::Geometry

pub mod node;
pub mod scene;
pub mod vertex;

pub use node::{Node, Transform};
pub use scene::{NodeId, Scene};
pub use vertex::Vertex3D;
