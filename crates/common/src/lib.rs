//! Shared types used by the camera core, the input layer, and the render backends.

mod types;

pub use types::{Transform, Viewport};
