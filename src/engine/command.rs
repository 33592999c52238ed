//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or a programmatic call, is a `ViewerCommand` passed to
//! [`SceneRenderEngine::execute`](super::SceneRenderEngine::execute).

use glam::Vec2;

use crate::options::DepthOverlayMode;

/// A single operation on the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    /// Orbit the camera by a drag delta in pixels.
    RotateCamera {
        /// Screen-space drag delta.
        delta: Vec2,
    },
    /// Slide the camera focus by a drag delta in pixels.
    PanCamera {
        /// Screen-space drag delta.
        delta: Vec2,
    },
    /// Zoom toward (positive) or away from (negative) the focus.
    Zoom {
        /// Scroll amount.
        delta: f32,
    },
    /// Return the camera to its initial orbit.
    ResetCamera,
    /// Step the depth overlay to the next mode.
    CycleDepthOverlay,
    /// Select a specific depth overlay mode.
    SetDepthOverlay(DepthOverlayMode),
    /// Pause or resume the per-frame rotation.
    ToggleRotation,
}
