// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracking for pan/zoom drags.
//!
//! The host forwards raw button and pointer events. [`MouseState`] remembers where each
//! button went down and where the pointer is now; [`MouseState::preview`] applies the
//! implied pan and zoom to a copy of the committed axes. Nothing is committed here.
//!
//! - Left drag pans so the content follows the pointer.
//! - Right drag zooms: rightward and upward drags zoom in.
//! - Middle click (press and release without moving) requests auto-axis.

use hashbrown::HashMap;
use kurbo::{Point, Vec2};

use crate::axes::AxesSnapshot;

/// Pointer travel, in pixels, under which a press and release count as a click.
pub const CLICK_SLOP_PX: f64 = 3.0;

/// Mouse buttons the plot reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Pans.
    Left,
    /// Auto-axis on click.
    Middle,
    /// Zooms.
    Right,
}

/// What a button release amounted to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// A left drag by the given pixel offset.
    Pan(Vec2),
    /// A right drag by the given pixel offset.
    Zoom(Vec2),
    /// A press and release within [`CLICK_SLOP_PX`].
    Click(MouseButton),
}

/// Transient per-plot pointer state.
#[derive(Clone, Debug, Default)]
pub struct MouseState {
    origins: HashMap<MouseButton, Point>,
    pointer: Option<Point>,
}

impl MouseState {
    /// Creates an idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a button press at `at`. A repeated press keeps the first origin.
    pub fn press(&mut self, button: MouseButton, at: Point) {
        self.origins.entry(button).or_insert(at);
        self.pointer = Some(at);
    }

    /// Records pointer motion.
    pub fn move_to(&mut self, at: Point) {
        self.pointer = Some(at);
    }

    /// Records a button release at `at` and reports the gesture it completed.
    ///
    /// Returns `None` for a release without a matching press and for a middle-button drag.
    pub fn release(&mut self, button: MouseButton, at: Point) -> Option<Gesture> {
        self.pointer = Some(at);
        let origin = self.origins.remove(&button)?;
        let delta = at - origin;
        if delta.hypot() <= CLICK_SLOP_PX {
            return Some(Gesture::Click(button));
        }
        match button {
            MouseButton::Left => Some(Gesture::Pan(delta)),
            MouseButton::Right => Some(Gesture::Zoom(delta)),
            MouseButton::Middle => None,
        }
    }

    /// Moves every remaining origin to the current pointer.
    ///
    /// Called after committing a preview so still-held buttons do not apply their offset
    /// twice.
    pub fn rebase(&mut self) {
        if let Some(pointer) = self.pointer {
            for origin in self.origins.values_mut() {
                *origin = pointer;
            }
        }
    }

    /// Forgets all buttons.
    pub fn reset(&mut self) {
        self.origins.clear();
    }

    /// Last known pointer location.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Where `button` went down, if it is held.
    pub fn origin(&self, button: MouseButton) -> Option<Point> {
        self.origins.get(&button).copied()
    }

    /// Whether `button` is held.
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.origins.contains_key(&button)
    }

    /// Whether no button is held.
    pub fn is_idle(&self) -> bool {
        self.origins.is_empty()
    }

    /// Whether a pan or zoom drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.is_down(MouseButton::Left) || self.is_down(MouseButton::Right)
    }

    /// Applies the in-progress drags to a copy of `committed`.
    pub fn preview(&self, committed: AxesSnapshot) -> AxesSnapshot {
        let mut preview = committed;
        let Some(pointer) = self.pointer else {
            return preview;
        };
        if let Some(origin) = self.origin(MouseButton::Left) {
            let d = pointer - origin;
            preview.pan_pixels(d.x, d.y);
        }
        if let Some(origin) = self.origin(MouseButton::Right) {
            let d = pointer - origin;
            preview.zoom_pixels(d.x, d.y);
        }
        preview
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Rect;

    use super::*;
    use crate::range::AxisRange;

    fn committed() -> AxesSnapshot {
        AxesSnapshot {
            x: AxisRange::new(0.0, 10.0),
            y: AxisRange::new(0.0, 10.0),
            y2: AxisRange::invalid(),
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
        }
    }

    #[test]
    fn idle_preview_is_the_committed_state() {
        let m = MouseState::new();
        assert_eq!(m.preview(committed()), committed(), "no drag, no change");
    }

    #[test]
    fn left_drag_previews_a_pan() {
        let mut m = MouseState::new();
        m.press(MouseButton::Left, Point::new(50.0, 50.0));
        m.move_to(Point::new(60.0, 50.0));
        let p = m.preview(committed());
        assert!((p.x.low() + 1.0).abs() < 1e-12, "x shifted left: {:?}", p.x);
        assert_eq!(p.y, committed().y, "no vertical motion");
        assert_eq!(
            m.release(MouseButton::Left, Point::new(60.0, 50.0)),
            Some(Gesture::Pan(Vec2::new(10.0, 0.0))),
            "release reports the pan"
        );
        assert!(!m.is_dragging(), "released");
    }

    #[test]
    fn right_drag_previews_a_zoom() {
        let mut m = MouseState::new();
        m.press(MouseButton::Right, Point::new(10.0, 90.0));
        m.move_to(Point::new(60.0, 90.0));
        let p = m.preview(committed());
        assert!((p.x.span() - 5.0).abs() < 1e-12, "x zoomed in: {:?}", p.x);
        assert_eq!(p.y, committed().y, "y untouched");
    }

    #[test]
    fn small_motion_is_a_click() {
        let mut m = MouseState::new();
        m.press(MouseButton::Middle, Point::new(5.0, 5.0));
        assert_eq!(
            m.release(MouseButton::Middle, Point::new(6.0, 6.0)),
            Some(Gesture::Click(MouseButton::Middle)),
            "middle click"
        );
        assert_eq!(m.release(MouseButton::Left, Point::ZERO), None, "no press, no gesture");
    }

    #[test]
    fn rebase_stops_double_counting() {
        let mut m = MouseState::new();
        m.press(MouseButton::Left, Point::new(0.0, 0.0));
        m.press(MouseButton::Right, Point::new(0.0, 0.0));
        m.move_to(Point::new(20.0, 0.0));
        m.release(MouseButton::Right, Point::new(20.0, 0.0));
        m.rebase();
        assert_eq!(
            m.origin(MouseButton::Left),
            Some(Point::new(20.0, 0.0)),
            "held button restarts from the pointer"
        );
    }
}
