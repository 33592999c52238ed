//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, growable buffers, textures,
//! layout helpers, and shader composition.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Bind group layout entries and pipeline boilerplate.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Diffuse and depth textures.
pub mod texture;
