//! Render passes: the instanced textured mesh and the depth overlay drawn
//! on top of it.

pub mod depth_view;
pub mod fullscreen;
pub mod instances;
pub mod mesh;
