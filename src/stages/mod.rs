//! CPU evaluation of the shader stages.
//!
//! Each function here computes what the corresponding WGSL entry point
//! produces for one invocation, so the transform order, the quad table and
//! the overlay colors can be checked without a GPU adapter. The WGSL sources
//! in `assets/shaders/` and these functions share their constants through
//! [`crate::binding`] and [`crate::renderer::fullscreen`].

/// Full-screen quad vertex stages and depth-overlay fragment stages.
pub mod depth_view;
/// Instanced mesh vertex and fragment stages.
pub mod mesh;
/// Texel images and sampler addressing/filtering.
pub mod sampler;

pub use depth_view::{
    constant_fragment, quad_position, quad_vertex, sampled_fragment,
    QuadVertexOutput,
};
pub use mesh::{
    clip_position, fragment, vertex, MeshVertexInput, MeshVertexOutput,
    TransformBindings,
};
pub use sampler::{SamplerState, TexelImage};
