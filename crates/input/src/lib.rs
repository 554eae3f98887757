//! Input layer: raw pointer events in, camera actions out.
//!
//! # Invariants
//! - The cursor position is tracked on every move, drag or not, so a drag
//!   that starts after the pointer has moved produces no spurious jump.
//! - Orbit actions are emitted only while the primary button is held.
//! - Nothing here depends on a windowing system; the desktop app translates
//!   its events into [`PointerButton`] and cursor coordinates.

pub mod action;
pub mod drag;

pub use action::Action;
pub use drag::{DragTracker, PointerButton};

pub fn crate_info() -> &'static str {
    "wara-input v0.1.0"
}
