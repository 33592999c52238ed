// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
// Tests may unwrap.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Instanced textured-mesh renderer with a depth-buffer overlay, built on
//! wgpu.
//!
//! A grid of mesh instances is drawn in one indexed, instanced call. Each
//! vertex is placed at `camera * transforms[instance] * rotation * local`,
//! with the texture, camera, rotation and instance transforms held in four
//! separately updated bind groups. A full-screen pass can then draw the
//! depth buffer over the frame for debugging.
//!
//! # Key entry points
//!
//! - [`engine::SceneRenderEngine`] - owns the GPU resources and the frame
//! - [`binding`] - bind-group slot assignments shared with the WGSL
//! - [`stages`] - CPU evaluation of each shader stage
//! - [`options::Options`] - runtime configuration loaded from TOML
//! - [`Viewer`] - a ready-made winit window (feature `viewer`)
//!
//! # Frame
//!
//! Each frame advances the per-object rotation, writes the camera
//! view-projection, records the mesh pass (clearing colour and depth), then
//! records the depth overlay pass over the result when enabled.

pub mod binding;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod stages;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{SceneRenderEngine, ViewerCommand};
pub use error::CanopyError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
