use glam::Vec2;

use crate::action::Action;

/// Mouse buttons the tracker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Turns cursor positions and button state into orbit deltas.
///
/// The last cursor position is recorded on every move regardless of whether
/// a drag is active, so pressing the button never produces a delta measured
/// from a stale position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragTracker {
    dragging: bool,
    last_cursor: Option<Vec2>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Last observed cursor position, if any move has been seen.
    pub fn last_cursor(&self) -> Option<Vec2> {
        self.last_cursor
    }

    /// Record a button transition. Only the primary button drives orbiting.
    pub fn button(&mut self, button: PointerButton, pressed: bool) {
        if button != PointerButton::Primary {
            return;
        }
        if self.dragging != pressed {
            tracing::debug!(dragging = pressed, "drag state changed");
        }
        self.dragging = pressed;
    }

    /// Record a cursor move. Returns an orbit action when a drag is active.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Option<Action> {
        let position = Vec2::new(x, y);
        let action = match (self.dragging, self.last_cursor) {
            (true, Some(last)) => {
                let delta = position - last;
                Some(Action::Orbit {
                    dx: delta.x,
                    dy: delta.y,
                })
            }
            _ => None,
        };
        self.last_cursor = Some(position);
        action
    }

    /// Map a scroll of `lines` to a zoom action. Zero scrolls are dropped.
    pub fn scrolled(&self, lines: f32) -> Option<Action> {
        (lines != 0.0 && lines.is_finite()).then_some(Action::Zoom(lines))
    }

    /// Forget the cursor position, e.g. when the pointer leaves the window.
    pub fn cursor_left(&mut self) {
        self.last_cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_orbit_without_button() {
        let mut t = DragTracker::new();
        assert_eq!(t.cursor_moved(10.0, 10.0), None);
        assert_eq!(t.cursor_moved(50.0, 80.0), None);
        assert_eq!(t.last_cursor(), Some(Vec2::new(50.0, 80.0)));
    }

    #[test]
    fn drag_emits_deltas_from_last_position() {
        let mut t = DragTracker::new();
        t.cursor_moved(100.0, 100.0);
        t.button(PointerButton::Primary, true);
        assert_eq!(
            t.cursor_moved(110.0, 95.0),
            Some(Action::Orbit { dx: 10.0, dy: -5.0 })
        );
        assert_eq!(
            t.cursor_moved(111.0, 95.0),
            Some(Action::Orbit { dx: 1.0, dy: 0.0 })
        );
    }

    #[test]
    fn movement_before_press_does_not_cause_a_jump() {
        let mut t = DragTracker::new();
        t.cursor_moved(0.0, 0.0);
        // Pointer travels far while the button is up.
        t.cursor_moved(700.0, 500.0);
        t.button(PointerButton::Primary, true);
        assert_eq!(
            t.cursor_moved(702.0, 501.0),
            Some(Action::Orbit { dx: 2.0, dy: 1.0 })
        );
    }

    #[test]
    fn release_stops_orbit_but_keeps_tracking() {
        let mut t = DragTracker::new();
        t.cursor_moved(0.0, 0.0);
        t.button(PointerButton::Primary, true);
        t.cursor_moved(5.0, 5.0);
        t.button(PointerButton::Primary, false);
        assert!(!t.is_dragging());
        assert_eq!(t.cursor_moved(300.0, 300.0), None);
        assert_eq!(t.last_cursor(), Some(Vec2::new(300.0, 300.0)));
    }

    #[test]
    fn first_sample_after_press_only_records() {
        let mut t = DragTracker::new();
        t.button(PointerButton::Primary, true);
        assert_eq!(t.cursor_moved(400.0, 300.0), None);
        assert!(t.cursor_moved(401.0, 300.0).is_some());
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut t = DragTracker::new();
        t.cursor_moved(0.0, 0.0);
        t.button(PointerButton::Secondary, true);
        assert!(!t.is_dragging());
        assert_eq!(t.cursor_moved(10.0, 0.0), None);
    }

    #[test]
    fn cursor_left_resets_reference() {
        let mut t = DragTracker::new();
        t.cursor_moved(10.0, 10.0);
        t.button(PointerButton::Primary, true);
        t.cursor_left();
        assert_eq!(t.cursor_moved(500.0, 10.0), None);
    }

    #[test]
    fn scroll_maps_to_zoom() {
        let t = DragTracker::new();
        assert_eq!(t.scrolled(1.5), Some(Action::Zoom(1.5)));
        assert_eq!(t.scrolled(0.0), None);
        assert_eq!(t.scrolled(f32::NAN), None);
    }
}
