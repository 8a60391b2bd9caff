//! Error types shared by the screen lifecycle and the asset loader.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by a [`Screen`](crate::screen::Screen) lifecycle call.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// An overridable lifecycle hook (`prepare`, scene or camera accessors)
    /// was called on a screen that does not provide it.
    #[error("method '{0}' is not implemented by this screen")]
    NotImplemented(&'static str),

    /// `start()` was handed a scene or camera it cannot render.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An asset failed to load while the screen was preparing.
    #[error(transparent)]
    AssetLoad(#[from] LoadError),

    /// The renderer collaborator could not be created or configured.
    #[error("renderer error: {0}")]
    Renderer(String),
}

/// Failures raised by [`AssetLoader`](crate::loader::AssetLoader).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read asset '{name}' from {}", path.display())]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model '{name}' from {}", path.display())]
    Model {
        name: String,
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
}
