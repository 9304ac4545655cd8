// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series styling: colors, markers and line widths.

use kurbo::{BezPath, Circle, Shape};
use peniko::Color;
use peniko::color::palette::css;

use crate::axes::YAxis;

/// Default series colors, picked by insertion index and repeating past the end.
pub const PALETTE: [Color; 10] = [
    css::STEEL_BLUE,
    css::DARK_ORANGE,
    css::FOREST_GREEN,
    css::CRIMSON,
    css::MEDIUM_PURPLE,
    css::SADDLE_BROWN,
    css::HOT_PINK,
    css::GRAY,
    css::OLIVE,
    css::DARK_CYAN,
];

/// Marker shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A filled circle.
    Circle,
    /// A filled, axis-aligned square.
    Square,
    /// Two crossing strokes (`+`).
    Cross,
}

impl Symbol {
    /// Returns a path for this symbol centered at `cx, cy`, using `size` as the diameter/side.
    pub fn path(self, cx: f64, cy: f64, size: f64) -> BezPath {
        let half = size * 0.5;
        match self {
            Self::Circle => {
                // Flattening tolerance in pixels.
                Circle::new((cx, cy), half).path_elements(0.1).collect()
            }
            Self::Square => {
                let mut p = BezPath::new();
                p.move_to((cx - half, cy - half));
                p.line_to((cx + half, cy - half));
                p.line_to((cx + half, cy + half));
                p.line_to((cx - half, cy + half));
                p.close_path();
                p
            }
            Self::Cross => {
                let mut p = BezPath::new();
                p.move_to((cx - half, cy));
                p.line_to((cx + half, cy));
                p.move_to((cx, cy - half));
                p.line_to((cx, cy + half));
                p
            }
        }
    }

    /// Whether the symbol is drawn by stroking rather than filling.
    pub fn is_stroked(self) -> bool {
        matches!(self, Self::Cross)
    }
}

/// A marker drawn at every sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// Shape.
    pub symbol: Symbol,
    /// Diameter or side length in pixels.
    pub size: f64,
}

impl Marker {
    /// Creates a marker.
    pub fn new(symbol: Symbol, size: f64) -> Self {
        Self { symbol, size }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new(Symbol::Circle, 5.0)
    }
}

/// Visual style of a series.
///
/// A style with a line width connects consecutive samples; a style with a marker draws
/// one glyph per sample. Both may be set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    /// Line and marker color.
    pub color: Color,
    /// Per-sample marker.
    pub marker: Option<Marker>,
    /// Width of the connecting line.
    pub line_width: Option<f64>,
    /// Vertical axis the series is plotted against.
    pub y_axis: YAxis,
}

impl Style {
    /// Creates a line-and-marker style with an explicit color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            marker: Some(Marker::default()),
            line_width: Some(1.0),
            y_axis: YAxis::Primary,
        }
    }

    /// Creates a line-and-marker style colored from [`PALETTE`] slot `index`.
    pub fn indexed(index: usize) -> Self {
        Self::new(PALETTE[index % PALETTE.len()])
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets (or removes) the marker.
    #[must_use]
    pub fn with_marker(mut self, marker: Option<Marker>) -> Self {
        self.marker = marker;
        self
    }

    /// Sets (or removes) the connecting line.
    #[must_use]
    pub fn with_line_width(mut self, width: Option<f64>) -> Self {
        self.line_width = width;
        self
    }

    /// Plots against the given vertical axis.
    #[must_use]
    pub fn on_axis(mut self, y_axis: YAxis) -> Self {
        self.y_axis = y_axis;
        self
    }
}
