// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The axis model: per-dimension ranges plus the pixel rectangle they map onto.
//!
//! [`Axes`] holds the committed state through [`RangeHandle`]s, so an X or Y range may be
//! observed by more than one plot. Pan and zoom math lives on the [`AxesSnapshot`] value
//! type; drag previews work on a snapshot and only [`Axes::commit`] writes back.

use kurbo::{Point, Rect};

use crate::range::{AxisRange, DataExtent, RangeHandle};

/// Smallest zoom fraction a single drag may produce.
pub const MIN_ZOOM_FACTOR: f64 = 0.1;

/// Largest zoom fraction a single drag may produce.
pub const MAX_ZOOM_FACTOR: f64 = 10.0;

/// Which vertical axis a series is plotted against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum YAxis {
    /// The left-hand axis.
    #[default]
    Primary,
    /// The right-hand axis.
    Secondary,
}

/// Converts a drag distance along an axis into a zoom fraction.
///
/// Dragging the full axis length in the positive direction zooms in as far as one drag
/// allows; the result is clamped to [`MIN_ZOOM_FACTOR`]..=[`MAX_ZOOM_FACTOR`].
pub fn zoom_factor_from_drag(delta_pixels: f64, axis_pixels: f64) -> f64 {
    if axis_pixels.is_nan() || axis_pixels <= 0.0 || !delta_pixels.is_finite() {
        return 1.0;
    }
    (1.0 - delta_pixels / axis_pixels).clamp(MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR)
}

/// An affine data-to-pixel mapping for one X range and one Y range.
///
/// Pixel Y grows downward while data Y grows upward. Built fresh for every render from the
/// current ranges and the layout's data rectangle; invalid ranges map as `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelMapping {
    x: AxisRange,
    y: AxisRange,
    rect: Rect,
}

impl PixelMapping {
    /// Creates a mapping of `x`/`y` onto `rect`.
    pub fn new(x: AxisRange, y: AxisRange, rect: Rect) -> Self {
        Self {
            x: x.or_unit(),
            y: y.or_unit(),
            rect: rect.abs(),
        }
    }

    /// The target pixel rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The X range being mapped (never invalid).
    pub fn x_range(&self) -> AxisRange {
        self.x
    }

    /// The Y range being mapped (never invalid).
    pub fn y_range(&self) -> AxisRange {
        self.y
    }

    /// Data X to pixel X.
    pub fn x_to_pixel(&self, x: f64) -> f64 {
        self.rect.x0 + self.x.fraction(x) * self.rect.width()
    }

    /// Data Y to pixel Y.
    pub fn y_to_pixel(&self, y: f64) -> f64 {
        self.rect.y1 - self.y.fraction(y) * self.rect.height()
    }

    /// Pixel X to data X. A zero-width rectangle maps everything to the low bound.
    pub fn pixel_to_x(&self, px: f64) -> f64 {
        let w = self.rect.width();
        if w <= 0.0 {
            return self.x.low();
        }
        self.x.lerp((px - self.rect.x0) / w)
    }

    /// Pixel Y to data Y. A zero-height rectangle maps everything to the low bound.
    pub fn pixel_to_y(&self, py: f64) -> f64 {
        let h = self.rect.height();
        if h <= 0.0 {
            return self.y.low();
        }
        self.y.lerp((self.rect.y1 - py) / h)
    }

    /// Data point to pixel point.
    pub fn data_to_pixel(&self, p: Point) -> Point {
        Point::new(self.x_to_pixel(p.x), self.y_to_pixel(p.y))
    }

    /// Pixel point to data point.
    pub fn pixel_to_data(&self, p: Point) -> Point {
        Point::new(self.pixel_to_x(p.x), self.pixel_to_y(p.y))
    }
}

/// A detached copy of axis state used for drag previews.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxesSnapshot {
    /// X range.
    pub x: AxisRange,
    /// Primary Y range.
    pub y: AxisRange,
    /// Secondary Y range.
    pub y2: AxisRange,
    /// Data rectangle the ranges map onto.
    pub rect: Rect,
}

impl AxesSnapshot {
    /// Scales X by `fx` and both Y ranges by `fy` around their centers.
    pub fn zoom(&mut self, fx: f64, fy: f64) {
        self.x.zoom(fx);
        self.y.zoom(fy);
        self.y2.zoom(fy);
    }

    /// Zooms by a drag of `(dx, dy)` pixels: rightward and upward drags zoom in.
    pub fn zoom_pixels(&mut self, dx: f64, dy: f64) {
        let fx = zoom_factor_from_drag(dx, self.rect.width());
        let fy = zoom_factor_from_drag(-dy, self.rect.height());
        self.zoom(fx, fy);
    }

    /// Pans so the content follows a drag of `(dx, dy)` pixels.
    pub fn pan_pixels(&mut self, dx: f64, dy: f64) {
        let (w, h) = (self.rect.width(), self.rect.height());
        if w > 0.0 {
            self.x.pan(-(dx / w) * self.x.span());
        }
        if h > 0.0 {
            // Pixel Y points down; data Y points up.
            self.y.pan((dy / h) * self.y.span());
            self.y2.pan((dy / h) * self.y2.span());
        }
    }

    /// The mapping for series on `axis`.
    pub fn mapping(&self, axis: YAxis) -> PixelMapping {
        let y = match axis {
            YAxis::Primary => self.y,
            YAxis::Secondary => self.y2,
        };
        PixelMapping::new(self.x, y, self.rect)
    }
}

/// Committed axis state of a plot.
#[derive(Debug, Default)]
pub struct Axes {
    x: RangeHandle,
    y: RangeHandle,
    y2: RangeHandle,
    rect: Rect,
}

impl Axes {
    /// Creates unset axes with fresh, unshared handles.
    pub fn new() -> Self {
        Self::default()
    }

    /// X range handle.
    pub fn x(&self) -> &RangeHandle {
        &self.x
    }

    /// Primary Y range handle.
    pub fn y(&self) -> &RangeHandle {
        &self.y
    }

    /// Secondary Y range handle.
    pub fn y2(&self) -> &RangeHandle {
        &self.y2
    }

    /// Whether both X and primary Y have been set.
    pub fn is_valid(&self) -> bool {
        self.x.get().is_valid() && self.y.get().is_valid()
    }

    /// Replaces X and primary Y with the bounds of `extent`.
    pub fn set(&mut self, extent: DataExtent) {
        self.x.update(|r| r.set(extent.x_min, extent.x_max));
        self.y.update(|r| r.set(extent.y_min, extent.y_max));
    }

    /// Widens X and primary Y to include `extent`.
    pub fn expand(&mut self, extent: DataExtent) {
        self.x.update(|r| r.expand(extent.x_range()));
        self.y.update(|r| r.expand(extent.y_range()));
    }

    /// Scales X by `fx` and both Y ranges by `fy`. Fractions below 1 zoom in.
    pub fn zoom(&mut self, fx: f64, fy: f64) {
        let mut s = self.snapshot();
        s.zoom(fx, fy);
        self.commit(s);
    }

    /// Zooms by a pixel drag relative to the last assigned rectangle.
    pub fn zoom_pixels(&mut self, dx: f64, dy: f64) {
        let mut s = self.snapshot();
        s.zoom_pixels(dx, dy);
        self.commit(s);
    }

    /// Pans by a pixel drag relative to the last assigned rectangle.
    pub fn pan_pixels(&mut self, dx: f64, dy: f64) {
        let mut s = self.snapshot();
        s.pan_pixels(dx, dy);
        self.commit(s);
    }

    /// Records the pixel rectangle the ranges map onto.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect.abs();
    }

    /// The last assigned pixel rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Maps a data point against X and primary Y.
    pub fn data_to_pixel(&self, p: Point) -> Point {
        self.mapping(YAxis::Primary).data_to_pixel(p)
    }

    /// Maps a pixel point back to X and primary Y.
    pub fn pixel_to_data(&self, p: Point) -> Point {
        self.mapping(YAxis::Primary).pixel_to_data(p)
    }

    /// The mapping for series on `axis`.
    pub fn mapping(&self, axis: YAxis) -> PixelMapping {
        self.snapshot().mapping(axis)
    }

    /// Copies the current state.
    pub fn snapshot(&self) -> AxesSnapshot {
        AxesSnapshot {
            x: self.x.get(),
            y: self.y.get(),
            y2: self.y2.get(),
            rect: self.rect,
        }
    }

    /// Writes the ranges of `snapshot` back, visible to every plot sharing a handle.
    pub fn commit(&mut self, snapshot: AxesSnapshot) {
        self.x.set(snapshot.x);
        self.y.set(snapshot.y);
        self.y2.set(snapshot.y2);
    }

    pub(crate) fn share_x(&mut self, other: &Self) {
        self.x = other.x.share();
    }

    pub(crate) fn share_y(&mut self, other: &Self) {
        self.y = other.y.share();
    }

    pub(crate) fn unshare_x(&mut self) {
        self.x = self.x.detached();
    }

    pub(crate) fn unshare_y(&mut self) {
        self.y = self.y.detached();
    }
}
