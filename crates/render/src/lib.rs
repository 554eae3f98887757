//! Rendering core: renderer-agnostic camera and scene model.
//!
//! The orbit camera is the only stateful piece of view logic. Backends read it
//! once per frame through [`OrbitCamera::view_proj`]; input layers mutate it
//! through [`OrbitCamera::handle_drag`].
//!
//! # Invariants
//! - Camera pitch stays within the configured limit after every mutation.
//! - The look-at target is the world origin and never moves.
//! - Renderers read the scene and camera; they never mutate either.

mod camera;
mod config;
mod error;
mod renderer;
mod scene;

pub use camera::OrbitCamera;
pub use config::{CameraConfig, SceneConfig};
pub use error::ConfigError;
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{Icon, Scene};

pub fn crate_info() -> &'static str {
    "wara-render v0.1.0"
}
