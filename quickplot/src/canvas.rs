// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing surface abstraction and a recording implementation.
//!
//! A plot never owns pixels. It issues a short list of primitives against a [`Canvas`];
//! backends turn those into raster, vector or retained output.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Line, Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;
use smallvec::SmallVec;

use crate::text::{HeuristicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};

/// A paint + width pair for stroked shapes (frames, ticks, grid lines, series lines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// A 2D drawing surface.
///
/// Coordinates are pixels with Y pointing down. `save`/`restore` bracket clip changes;
/// backends may keep additional state (transforms, paint caches) on the same stack.
pub trait Canvas: TextMeasurer {
    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, brush: &Brush);

    /// Strokes the outline of an axis-aligned rectangle.
    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle);

    /// Fills a path.
    fn fill_path(&mut self, path: &BezPath, brush: &Brush);

    /// Strokes a path.
    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle);

    /// Draws a single line of horizontal text anchored at `pos`.
    fn draw_text(&mut self, text: &str, pos: Point, style: &TextStyle);

    /// Draws a single line of text with its baseline along `line`.
    ///
    /// Glyphs advance from `line.p0` toward `line.p1`. The anchor is `p0`, the midpoint or
    /// `p1` for [`TextAnchor::Start`](crate::TextAnchor::Start), `Middle` and `End`.
    fn draw_text_along(&mut self, text: &str, line: Line, style: &TextStyle);

    /// Intersects the current clip with `rect`.
    fn clip_rect(&mut self, rect: Rect);

    /// Pushes the current state.
    fn save(&mut self);

    /// Pops the state pushed by the matching [`Canvas::save`].
    fn restore(&mut self);
}

/// One recorded drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`Canvas::fill_rect`].
    FillRect {
        /// Rectangle.
        rect: Rect,
        /// Paint.
        brush: Brush,
    },
    /// [`Canvas::stroke_rect`].
    StrokeRect {
        /// Rectangle.
        rect: Rect,
        /// Stroke.
        stroke: StrokeStyle,
    },
    /// [`Canvas::fill_path`].
    FillPath {
        /// Path.
        path: BezPath,
        /// Paint.
        brush: Brush,
    },
    /// [`Canvas::stroke_path`].
    StrokePath {
        /// Path.
        path: BezPath,
        /// Stroke.
        stroke: StrokeStyle,
    },
    /// [`Canvas::draw_text`].
    Text {
        /// Text.
        text: String,
        /// Anchor point.
        pos: Point,
        /// Style.
        style: TextStyle,
    },
    /// [`Canvas::draw_text_along`].
    TextAlong {
        /// Text.
        text: String,
        /// Baseline.
        line: Line,
        /// Style.
        style: TextStyle,
    },
    /// [`Canvas::clip_rect`], with the effective (intersected) clip.
    Clip(Rect),
    /// [`Canvas::save`].
    Save,
    /// [`Canvas::restore`].
    Restore,
}

impl DrawCommand {
    /// Replays this command onto `canvas`.
    pub fn apply(&self, canvas: &mut dyn Canvas) {
        match self {
            Self::FillRect { rect, brush } => canvas.fill_rect(*rect, brush),
            Self::StrokeRect { rect, stroke } => canvas.stroke_rect(*rect, stroke),
            Self::FillPath { path, brush } => canvas.fill_path(path, brush),
            Self::StrokePath { path, stroke } => canvas.stroke_path(path, stroke),
            Self::Text { text, pos, style } => canvas.draw_text(text, *pos, style),
            Self::TextAlong { text, line, style } => canvas.draw_text_along(text, *line, style),
            Self::Clip(rect) => canvas.clip_rect(*rect),
            Self::Save => canvas.save(),
            Self::Restore => canvas.restore(),
        }
    }
}

/// A [`Canvas`] that records a display list.
///
/// Useful for hosts that replay draw calls on their own surface, and for inspecting what a
/// render produced. Text is measured with a [`HeuristicTextMeasurer`] unless another
/// measurer is supplied.
#[derive(Debug)]
pub struct RecordingCanvas<M = HeuristicTextMeasurer> {
    measurer: M,
    commands: Vec<DrawCommand>,
    clip: Option<Rect>,
    saved: SmallVec<[Option<Rect>; 4]>,
}

impl RecordingCanvas {
    /// Creates an empty recording with heuristic text measurement.
    pub fn new() -> Self {
        Self::with_measurer(HeuristicTextMeasurer)
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TextMeasurer> RecordingCanvas<M> {
    /// Creates an empty recording that measures text with `measurer`.
    pub fn with_measurer(measurer: M) -> Self {
        Self {
            measurer,
            commands: Vec::new(),
            clip: None,
            saved: SmallVec::new(),
        }
    }

    /// Recorded commands in issue order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the recording empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Drops all commands and state.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip = None;
        self.saved.clear();
    }

    /// The effective clip, if any.
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Every piece of text drawn, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } | DrawCommand::TextAlong { text, .. } => {
                Some(text.as_str())
            }
            _ => None,
        })
    }

    /// Replays the recording onto another canvas.
    pub fn replay(&self, target: &mut dyn Canvas) {
        for command in &self.commands {
            command.apply(target);
        }
    }
}

impl<M: TextMeasurer> TextMeasurer for RecordingCanvas<M> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        self.measurer.measure(text, style)
    }
}

impl<M: TextMeasurer> Canvas for RecordingCanvas<M> {
    fn fill_rect(&mut self, rect: Rect, brush: &Brush) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            brush: brush.clone(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            stroke: stroke.clone(),
        });
    }

    fn fill_path(&mut self, path: &BezPath, brush: &Brush) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            brush: brush.clone(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            stroke: stroke.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, pos: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            pos,
            style: *style,
        });
    }

    fn draw_text_along(&mut self, text: &str, line: Line, style: &TextStyle) {
        self.commands.push(DrawCommand::TextAlong {
            text: text.into(),
            line,
            style: *style,
        });
    }

    fn clip_rect(&mut self, rect: Rect) {
        let clip = match self.clip {
            Some(current) => current.intersect(rect),
            None => rect,
        };
        self.clip = Some(clip);
        self.commands.push(DrawCommand::Clip(clip));
    }

    fn save(&mut self) {
        self.saved.push(self.clip);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        let Some(clip) = self.saved.pop() else {
            tracing::debug!("restore without matching save");
            return;
        };
        self.clip = clip;
        self.commands.push(DrawCommand::Restore);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn clip_is_scoped_by_save_restore() {
        let mut c = RecordingCanvas::new();
        c.save();
        c.clip_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        c.clip_rect(Rect::new(5.0, 5.0, 20.0, 20.0));
        assert_eq!(
            c.current_clip(),
            Some(Rect::new(5.0, 5.0, 10.0, 10.0)),
            "nested clips intersect"
        );
        c.restore();
        assert_eq!(c.current_clip(), None, "restore pops the clip");
        assert_eq!(c.depth(), 0, "balanced");
    }

    #[test]
    fn unmatched_restore_is_ignored() {
        let mut c = RecordingCanvas::new();
        c.restore();
        assert!(c.commands().is_empty(), "nothing recorded");
    }

    #[test]
    fn replay_reproduces_the_list() {
        let mut a = RecordingCanvas::new();
        a.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &Brush::Solid(css::WHITE));
        a.draw_text("hi", Point::new(1.0, 2.0), &TextStyle::default());
        let mut b = RecordingCanvas::new();
        a.replay(&mut b);
        assert_eq!(a.commands(), b.commands(), "replay is faithful");
        assert_eq!(b.texts().collect::<Vec<_>>(), ["hi"], "text recorded");
    }
}
