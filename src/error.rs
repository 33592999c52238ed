//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the canopy crate.
#[derive(Debug)]
pub enum CanopyError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to decode a diffuse texture image.
    Texture(image::ImageError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A WGSL source failed to compose or a shared module failed to
    /// register.
    ShaderCompose {
        /// Virtual file path of the failing shader.
        file_path: String,
        /// Composer diagnostic.
        source: Box<naga_oil::compose::ComposerError>,
    },
    /// A draw asked for instances past the end of the transform array.
    InstanceRange {
        /// One past the last instance the draw would read.
        requested: u32,
        /// Number of transforms actually uploaded.
        available: u32,
    },
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for CanopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Texture(e) => write!(f, "texture decode error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::ShaderCompose { file_path, source } => {
                write!(f, "failed to compose shader '{file_path}': {source}")
            }
            Self::InstanceRange {
                requested,
                available,
            } => write!(
                f,
                "draw reads instance {} but only {available} transforms are bound",
                requested.saturating_sub(1)
            ),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for CanopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Texture(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::ShaderCompose { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<RenderContextError> for CanopyError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for CanopyError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for CanopyError {
    fn from(e: image::ImageError) -> Self {
        Self::Texture(e)
    }
}
