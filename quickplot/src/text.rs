// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text styling and measurement hooks for tick labels, axis labels and titles.
//!
//! Layout needs label extents before anything is drawn: the widest Y tick label decides
//! how wide the Y scale band must be. Shaping is the drawing surface's job, so the core
//! only depends on a tiny measurement interface. Every [`Canvas`](crate::Canvas) is also a
//! [`TextMeasurer`], which keeps measurement consistent with what ends up on screen.

use kurbo::Size;
use peniko::Color;
use peniko::color::palette::css;

/// A minimal text measurement interface used by tick generation and layout.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as a single line; callers split on `\n` themselves.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// Horizontal placement of text relative to its anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The anchor is the start of the text.
    #[default]
    Start,
    /// The anchor is the middle of the text.
    Middle,
    /// The anchor is the end of the text.
    End,
}

/// Vertical placement of text relative to its anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The anchor sits on the alphabetic baseline.
    #[default]
    Alphabetic,
    /// The anchor sits on the vertical middle of the line box.
    Middle,
    /// The anchor sits on the top of the line box.
    Hanging,
}

/// Styling for a run of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// Font weight.
    pub weight: FontWeight,
    /// Fill color.
    pub color: Color,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical anchor.
    pub baseline: TextBaseline,
}

impl TextStyle {
    /// Creates a black, normal-weight style with the given font size.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            weight: FontWeight::NORMAL,
            color: css::BLACK,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the fill color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the anchor and baseline.
    #[must_use]
    pub fn with_alignment(mut self, anchor: TextAnchor, baseline: TextBaseline) -> Self {
        self.anchor = anchor;
        self.baseline = baseline;
        self
    }

    /// Whether the weight is bold or heavier.
    pub fn is_bold(&self) -> bool {
        self.weight >= FontWeight::BOLD
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width.
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// The bounding size of the line (advance width by line height).
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.advance_width, self.line_height())
    }
}

/// A heuristic text measurer for tests and surfaces without font access.
///
/// It assumes an average glyph width of 0.6em (0.65em when bold) and a baseline at 0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let em = if style.is_bold() { 0.65 } else { 0.6 };
        TextMetrics {
            advance_width: em * style.font_size * text.chars().count() as f64,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn bold_text_measures_wider() {
        let measurer = HeuristicTextMeasurer;
        let regular = TextStyle::new(10.0);
        let bold = regular.with_weight(FontWeight::BOLD);
        let a = measurer.measure("1.25", &regular);
        let b = measurer.measure("1.25", &bold);
        assert!(b.advance_width > a.advance_width, "bold should be wider");
        assert!((a.line_height() - 10.0).abs() < 1e-9, "line height is one em");
    }

    #[test]
    fn empty_text_has_no_width() {
        let m = HeuristicTextMeasurer.measure("", &TextStyle::default());
        assert_eq!(m.size().width, 0.0, "empty text has no advance");
    }
}
