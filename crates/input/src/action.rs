/// A high-level camera action produced by the input layer.
///
/// The application applies actions to the camera; it never interprets raw
/// input events itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit by a drag delta in pixels.
    Orbit { dx: f32, dy: f32 },
    /// Zoom by scroll lines; positive moves closer.
    Zoom(f32),
    /// Return the camera to its initial state.
    ResetCamera,
    /// Leave the application.
    Quit,
}

impl Action {
    /// Map a key name (as reported by the windowing layer) to an action.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "r" | "R" => Some(Action::ResetCamera),
            "Escape" => Some(Action::Quit),
            _ => None,
        }
    }
}
