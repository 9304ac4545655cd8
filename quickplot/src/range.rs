// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis ranges, data extents and shareable range handles.
//!
//! An [`AxisRange`] is the visible numeric interval of one dimension. It starts out
//! *invalid* and becomes valid on the first set/expand. Once valid it always satisfies
//! `low < high`: every mutation clamps to a minimum span instead of collapsing.

use alloc::rc::Rc;
use core::cell::Cell;

/// Smallest span any valid range may have, in data units.
pub const MIN_SPAN: f64 = 1e-12;

/// Relative span floor so that ranges far from zero stay representable.
const MIN_RELATIVE_SPAN: f64 = 1e-12;

/// The visible interval of a single axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    low: f64,
    high: f64,
    valid: bool,
}

impl AxisRange {
    /// An unset range. Mapping through it falls back to `[0, 1]`.
    pub const fn invalid() -> Self {
        Self {
            low: 0.0,
            high: 1.0,
            valid: false,
        }
    }

    /// Creates a valid range, swapping reversed bounds and clamping to the minimum span.
    ///
    /// Non-finite bounds produce an invalid range.
    pub fn new(low: f64, high: f64) -> Self {
        let mut range = Self::invalid();
        range.set(low, high);
        range
    }

    /// Lower bound.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Whether the range has been set.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// `high - low`, saturating at `f64::MAX` for bounds of opposite sign near the limits.
    pub fn span(&self) -> f64 {
        (self.high - self.low).min(f64::MAX)
    }

    /// Half of `high - low`. Finite for every pair of finite bounds.
    pub fn half_span(&self) -> f64 {
        0.5 * self.high - 0.5 * self.low
    }

    /// Midpoint of the range.
    pub fn center(&self) -> f64 {
        0.5 * self.low + 0.5 * self.high
    }

    /// Position of `value` relative to the bounds: `0` at `low`, `1` at `high`.
    pub fn fraction(&self, value: f64) -> f64 {
        (0.5 * value - 0.5 * self.low) / self.half_span()
    }

    /// The value at `t` along the range, the inverse of [`fraction`](Self::fraction).
    pub fn lerp(&self, t: f64) -> f64 {
        2.0 * (0.5 * self.low + t * self.half_span())
    }

    /// Whether `value` lies within the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Returns this range if valid, otherwise the unit range `[0, 1]`.
    pub fn or_unit(self) -> Self {
        if self.valid { self } else { Self::new(0.0, 1.0) }
    }

    /// Replaces the bounds and marks the range valid.
    ///
    /// Non-finite input leaves the range untouched.
    pub fn set(&mut self, low: f64, high: f64) {
        if !low.is_finite() || !high.is_finite() {
            return;
        }
        let (low, high) = if low > high { (high, low) } else { (low, high) };
        *self = Self {
            low,
            high,
            valid: true,
        }
        .with_min_span();
    }

    /// Widens this range to the union with `other`.
    ///
    /// An invalid `other` is ignored; an invalid `self` simply takes `other`.
    pub fn expand(&mut self, other: Self) {
        if !other.valid {
            return;
        }
        if !self.valid {
            *self = other;
            return;
        }
        self.low = self.low.min(other.low);
        self.high = self.high.max(other.high);
    }

    /// Scales the span around the center. A fraction below 1 zooms in.
    pub fn zoom(&mut self, fraction: f64) {
        let center = self.center();
        self.zoom_around(center, fraction);
    }

    /// Scales the span around an arbitrary anchor value.
    ///
    /// Non-positive or non-finite fractions are ignored, as are results that overflow.
    pub fn zoom_around(&mut self, anchor: f64, fraction: f64) {
        if !self.valid || !fraction.is_finite() || fraction <= 0.0 || !anchor.is_finite() {
            return;
        }
        let low = anchor + (self.low - anchor) * fraction;
        let high = anchor + (self.high - anchor) * fraction;
        self.apply(low, high);
    }

    /// Shifts both bounds by `delta` data units.
    pub fn pan(&mut self, delta: f64) {
        if !self.valid || !delta.is_finite() {
            return;
        }
        self.apply(self.low + delta, self.high + delta);
    }

    /// Ensures the range spans at least the minimum span, widening around its center.
    #[must_use]
    pub fn with_min_span(self) -> Self {
        let center = self.center();
        let min_span = MIN_SPAN.max(center.abs() * MIN_RELATIVE_SPAN);
        if self.span() >= min_span {
            return self;
        }
        let low = (center - 0.5 * min_span).clamp(-f64::MAX, f64::MAX - min_span);
        Self {
            low,
            high: low + min_span,
            valid: self.valid,
        }
    }

    fn apply(&mut self, low: f64, high: f64) {
        if !low.is_finite() || !high.is_finite() {
            tracing::debug!(low, high, "rejecting non-finite axis range");
            return;
        }
        self.low = low.min(high);
        self.high = low.max(high);
        *self = self.with_min_span();
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::invalid()
    }
}

/// The bounding box of a plottable's samples, in data units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataExtent {
    /// Smallest X value.
    pub x_min: f64,
    /// Largest X value.
    pub x_max: f64,
    /// Smallest Y value.
    pub y_min: f64,
    /// Largest Y value.
    pub y_max: f64,
}

impl DataExtent {
    /// Creates an extent from explicit bounds.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Computes the extent of paired samples. Returns `None` when there are no pairs.
    ///
    /// Only the common prefix of `xs` and `ys` is considered.
    pub fn of_points(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let mut pairs = xs.iter().zip(ys);
        let (&x0, &y0) = pairs.next()?;
        let mut extent = Self::new(x0, x0, y0, y0);
        for (&x, &y) in pairs {
            extent.x_min = extent.x_min.min(x);
            extent.x_max = extent.x_max.max(x);
            extent.y_min = extent.y_min.min(y);
            extent.y_max = extent.y_max.max(y);
        }
        Some(extent)
    }

    /// Whether all four bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite()
    }

    /// The smallest extent containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// The X bounds as a range.
    pub fn x_range(&self) -> AxisRange {
        AxisRange::new(self.x_min, self.x_max)
    }

    /// The Y bounds as a range.
    pub fn y_range(&self) -> AxisRange {
        AxisRange::new(self.y_min, self.y_max)
    }
}

/// A shareable handle to an [`AxisRange`].
///
/// Plots own one handle per dimension. Two plots observe the same range only after an
/// explicit [`RangeHandle::share`]; there is deliberately no `Clone` impl, so aliasing
/// never happens by accident. Handles are single-threaded (`Rc`), matching the
/// one-render-loop-per-plot model.
#[derive(Debug, Default)]
pub struct RangeHandle(Rc<Cell<AxisRange>>);

impl RangeHandle {
    /// Creates a new, unshared handle.
    pub fn new(range: AxisRange) -> Self {
        Self(Rc::new(Cell::new(range)))
    }

    /// Current value.
    pub fn get(&self) -> AxisRange {
        self.0.get()
    }

    /// Replaces the value, visible to every sharer.
    pub fn set(&self, range: AxisRange) {
        self.0.set(range);
    }

    /// Applies `f` to the current value and stores the result.
    pub fn update(&self, f: impl FnOnce(&mut AxisRange)) {
        let mut range = self.0.get();
        f(&mut range);
        self.0.set(range);
    }

    /// Returns a second handle aliasing the same range.
    pub fn share(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    /// Returns a fresh handle holding a copy of the current value.
    pub fn detached(&self) -> Self {
        Self::new(self.get())
    }

    /// Whether both handles alias the same range.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn starts_invalid_and_set_validates() {
        let mut r = AxisRange::default();
        assert!(!r.is_valid(), "default range must be unset");
        r.set(3.0, -1.0);
        assert!(r.is_valid(), "set must validate");
        assert_eq!((r.low(), r.high()), (-1.0, 3.0), "bounds are sorted");
    }

    #[test]
    fn expand_on_invalid_behaves_like_set() {
        let mut r = AxisRange::invalid();
        r.expand(AxisRange::new(2.0, 5.0));
        assert_eq!(r, AxisRange::new(2.0, 5.0), "first expand adopts the extent");
        r.expand(AxisRange::invalid());
        assert_eq!(r, AxisRange::new(2.0, 5.0), "invalid extent is a no-op");
    }

    #[test]
    fn expand_is_order_independent() {
        let a = AxisRange::new(-3.0, 1.0);
        let b = AxisRange::new(0.5, 9.0);
        let c = AxisRange::new(-10.0, -8.0);

        let mut ab = AxisRange::new(0.0, 1.0);
        ab.expand(a);
        ab.expand(b);
        ab.expand(c);

        let mut ba = AxisRange::new(0.0, 1.0);
        ba.expand(c);
        ba.expand(b);
        ba.expand(a);

        assert_eq!(ab, ba, "expand must be commutative");
    }

    #[test]
    fn zoom_scales_around_center() {
        let mut r = AxisRange::new(0.0, 10.0);
        r.zoom(0.5);
        assert!((r.low() - 2.5).abs() < 1e-12, "low {}", r.low());
        assert!((r.high() - 7.5).abs() < 1e-12, "high {}", r.high());
        r.zoom(4.0);
        assert!((r.span() - 20.0).abs() < 1e-12, "span {}", r.span());
    }

    #[test]
    fn zoom_never_collapses_the_range() {
        let mut r = AxisRange::new(1.0, 2.0);
        for _ in 0..200 {
            r.zoom(1e-3);
        }
        assert!(r.low() < r.high(), "range collapsed: {r:?}");
        assert!(r.span() >= MIN_SPAN, "span below floor: {}", r.span());
    }

    #[test]
    fn zoom_ignores_bad_fractions() {
        let mut r = AxisRange::new(0.0, 1.0);
        r.zoom(0.0);
        r.zoom(-2.0);
        r.zoom(f64::NAN);
        assert_eq!(r, AxisRange::new(0.0, 1.0), "bad fractions must be ignored");
    }

    #[test]
    fn pan_far_from_zero_keeps_positive_span() {
        let mut r = AxisRange::new(0.0, 1e-9);
        r.pan(1e12);
        assert!(r.low() < r.high(), "pan lost precision: {r:?}");
    }

    #[test]
    fn bounds_near_f64_max_keep_finite_measures() {
        let mut r = AxisRange::new(-1e308, 1e308);
        assert!(r.is_valid(), "finite bounds are accepted");
        assert_eq!(r.span(), f64::MAX, "span saturates");
        assert!((r.half_span() - 1e308).abs() <= 1e292, "half span {}", r.half_span());
        assert_eq!(r.center(), 0.0, "center");
        assert!((r.fraction(5e307) - 0.75).abs() < 1e-12, "fraction {}", r.fraction(5e307));
        assert!((r.lerp(0.75) - 5e307).abs() <= 1e-12 * 5e307, "lerp {}", r.lerp(0.75));

        r.zoom(0.5);
        assert!((r.high() - 5e307).abs() <= 1e-12 * 5e307, "zoom in: {r:?}");
        r.zoom(1e10);
        assert!((r.high() - 5e307).abs() <= 1e-12 * 5e307, "overflowing zoom ignored: {r:?}");
    }

    #[test]
    fn zero_width_set_is_widened() {
        let r = AxisRange::new(4.0, 4.0);
        assert!(r.span() > 0.0, "zero-width range must be widened");
        assert!(r.contains(4.0), "widened range keeps its center");
    }

    #[test]
    fn extent_union_and_points() {
        let a = DataExtent::of_points(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).expect("non-empty");
        assert_eq!(a, DataExtent::new(0.0, 2.0, 0.0, 1.0), "extent of scenario points");
        assert!(DataExtent::of_points(&[], &[]).is_none(), "empty input has no extent");
        let b = DataExtent::new(-1.0, 0.5, 3.0, 4.0);
        assert_eq!(a.union(b), b.union(a), "union commutes");
        assert_eq!(a.union(b), DataExtent::new(-1.0, 2.0, 0.0, 4.0), "union bounds");
    }

    #[test]
    fn shared_handles_observe_each_other() {
        let a = RangeHandle::new(AxisRange::new(0.0, 1.0));
        let b = a.share();
        b.set(AxisRange::new(5.0, 6.0));
        assert_eq!(a.get(), AxisRange::new(5.0, 6.0), "share aliases the range");
        assert!(a.ptr_eq(&b), "shared handles alias");

        let c = a.detached();
        c.update(|r| r.pan(1.0));
        assert_eq!(a.get(), AxisRange::new(5.0, 6.0), "detached copy is independent");
        assert!(!a.ptr_eq(&c), "detached handle does not alias");
    }
}
