//! wgpu render backend for the wara viewer.
//!
//! Draws a flat ground plane and a ring of textured icon quads, one instanced
//! draw for all icons. The view-projection matrix comes from
//! [`wara_render::OrbitCamera`] once per frame.
//!
//! # Invariants
//! - Renderer never mutates the scene or the camera.
//! - Depth and MSAA targets always match the current surface size.

mod error;
mod gpu;
mod mesh;
mod shaders;
mod texture;

pub use error::RenderError;
pub use gpu::{RenderOptions, WgpuRenderer};
pub use texture::{IconImage, load_icon_image, placeholder_icon};
