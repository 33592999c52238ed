//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera, its GPU uniform, and an orbital
//! controller with rotation, panning and zoom.

/// Orbital camera controller and the camera's GPU binding.
pub mod controller;
/// Core camera struct and GPU uniform type.
pub mod core;

pub use controller::{CameraBinding, CameraController};
pub use self::core::{Camera, CameraUniform};
