// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick placement and labeling.
//!
//! Ticks sit on "nice" values: multiples of `1`, `2` or `5` times a power of ten. The search
//! walks from coarse to fine steps until the tick count reaches the density target for the
//! available pixel span, never exceeding [`TickDensity::max_ticks`].

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::Size;

use crate::range::AxisRange;
use crate::text::{TextMeasurer, TextStyle};

/// Upper bound on candidate steps tried by [`find_ticks`] (about 21 decades).
pub const MAX_TICK_SEARCH_STEPS: usize = 64;

/// Largest number of ticks a search ever produces.
pub const MAX_TICK_COUNT: usize = 10_000;

/// Step multipliers tried within each decade, coarse to fine.
const STEP_MULTIPLIERS: [f64; 3] = [5.0, 2.0, 1.0];

/// Extra label digits tried when two adjacent labels would read the same.
const MAX_EXTRA_DIGITS: usize = 6;

/// Tick density targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickDensity {
    /// Desired distance between neighboring ticks, in pixels.
    pub spacing_px: f64,
    /// Fewest ticks to aim for, regardless of pixel span.
    pub min_ticks: usize,
    /// Most ticks ever produced.
    pub max_ticks: usize,
}

impl TickDensity {
    /// Sets the desired tick spacing in pixels.
    #[must_use]
    pub fn with_spacing(mut self, spacing_px: f64) -> Self {
        self.spacing_px = spacing_px;
        self
    }

    /// Sets the tick count band. Both ends are capped at [`MAX_TICK_COUNT`].
    #[must_use]
    pub fn with_count_band(mut self, min_ticks: usize, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks.clamp(1, MAX_TICK_COUNT);
        self.min_ticks = min_ticks.clamp(1, self.max_ticks);
        self
    }

    /// Number of ticks to aim for over `pixel_span` pixels.
    pub fn target(&self, pixel_span: f64) -> usize {
        let max = self.max_ticks.clamp(1, MAX_TICK_COUNT);
        let min = self.min_ticks.clamp(1, max);
        if !pixel_span.is_finite() || pixel_span <= 0.0 || self.spacing_px <= 0.0 {
            return min;
        }
        let wanted = (pixel_span / self.spacing_px).round().min(max as f64);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "finite, non-negative and capped at max_ticks"
        )]
        let wanted = wanted.max(0.0) as usize;
        wanted.clamp(min, max)
    }
}

impl Default for TickDensity {
    fn default() -> Self {
        Self {
            spacing_px: 60.0,
            min_ticks: 2,
            max_ticks: 12,
        }
    }
}

/// A labeled reference value on an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Position in data units.
    pub value: f64,
    /// Rendered label.
    pub label: String,
}

/// The outcome of a tick search.
#[derive(Clone, Debug, PartialEq)]
pub struct TickSearch {
    /// Ticks in ascending order.
    pub ticks: Vec<Tick>,
    /// Distance between neighboring ticks (`0` for a single tick).
    pub step: f64,
    /// Set when the search gave up early and returned a best-effort result.
    pub degraded: bool,
}

/// Finds nicely spaced, labeled ticks for `[low, high]` drawn over `pixel_span` pixels.
///
/// A zero-width range yields one tick at that value. Non-finite bounds yield no ticks and
/// a degraded result.
pub fn find_ticks(low: f64, high: f64, pixel_span: f64, density: &TickDensity) -> TickSearch {
    if !low.is_finite() || !high.is_finite() {
        tracing::warn!(low, high, "tick search on non-finite range");
        return TickSearch {
            ticks: Vec::new(),
            step: 0.0,
            degraded: true,
        };
    }
    let (low, high) = if low > high { (high, low) } else { (low, high) };
    // Half-span arithmetic stays finite for bounds near `f64::MAX`.
    let half = 0.5 * high - 0.5 * low;
    if half <= 0.0 {
        return TickSearch {
            ticks: alloc::vec![Tick {
                value: low,
                label: format!("{low}"),
            }],
            step: 0.0,
            degraded: false,
        };
    }

    let target = density.target(pixel_span);
    let max_ticks = density.max_ticks.clamp(target, MAX_TICK_COUNT);
    let (step, settled) = search_step(low, high, target, max_ticks, MAX_TICK_SEARCH_STEPS);
    if !settled {
        tracing::warn!(
            low,
            high,
            pixel_span,
            target_ticks = target,
            "tick search hit its bound; using best-effort ticks"
        );
    }

    let Some(step) = step else {
        return TickSearch {
            ticks: label_values(&[low, high], high - low, low, high),
            step: high - low,
            degraded: true,
        };
    };

    let values = tick_values(low, high, step);
    TickSearch {
        ticks: label_values(&values, step, low, high),
        step,
        degraded: !settled,
    }
}

/// Walks candidate steps from coarse to fine, trying at most `budget` of them.
///
/// Returns the chosen step and whether the search settled. A step settles once it yields at
/// least `target` ticks; if it would exceed `max_ticks`, the closest earlier candidate wins.
/// When the budget runs out, the candidate whose count came closest to `target` is returned.
fn search_step(
    low: f64,
    high: f64,
    target: usize,
    max_ticks: usize,
    budget: usize,
) -> (Option<f64>, bool) {
    // One decade above the span, so the first candidate never overshoots.
    let mut power = decade(0.5 * high - 0.5 * low).saturating_add(1);
    let mut closest: Option<(f64, usize)> = None;
    let mut tried = 0;
    while tried < budget {
        let base = 10_f64.powi(power);
        for mult in STEP_MULTIPLIERS {
            if tried == budget {
                break;
            }
            tried += 1;
            let step = mult * base;
            if step <= 0.0 {
                // Underflowed below the smallest representable step.
                return (closest.map(|(s, _)| s), false);
            }
            if !step.is_finite() {
                continue;
            }
            let count = tick_count(low, high, step);
            if count > max_ticks && closest.is_some() {
                return (closest.map(|(s, _)| s), true);
            }
            if closest.is_none_or(|(_, c)| count.abs_diff(target) < c.abs_diff(target)) {
                closest = Some((step, count));
            }
            if count >= target {
                return (Some(step), true);
            }
        }
        power -= 1;
    }
    (closest.map(|(s, _)| s), false)
}

/// Formats `value` for a tick grid with spacing `step` over an axis whose largest absolute
/// bound is `magnitude`.
///
/// Fixed notation shows as many decimals as the step needs; magnitudes of a million and
/// above, or below `1e-4`, switch to scientific notation.
pub fn format_tick(value: f64, step: f64, magnitude: f64) -> String {
    format_with(value, Notation::for_grid(step, magnitude), 0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Notation {
    Fixed { decimals: usize },
    Scientific { digits: usize },
}

impl Notation {
    fn for_grid(step: f64, magnitude: f64) -> Self {
        let step_exp = if step.is_finite() && step > 0.0 {
            decade(step)
        } else {
            0
        };
        let mag_exp = if magnitude.is_finite() && magnitude > 0.0 {
            decade(magnitude)
        } else {
            0
        };
        if mag_exp >= 6 || (magnitude > 0.0 && mag_exp < -4) {
            Self::Scientific {
                digits: clamp_digits(mag_exp - step_exp),
            }
        } else {
            Self::Fixed {
                decimals: clamp_digits(-step_exp),
            }
        }
    }
}

fn format_with(value: f64, notation: Notation, extra: usize) -> String {
    match notation {
        Notation::Fixed { decimals } => format!("{:.*}", decimals + extra, value),
        Notation::Scientific { digits } => format!("{:.*e}", digits + extra, value),
    }
}

fn clamp_digits(exp: i32) -> usize {
    usize::try_from(exp.clamp(0, 15)).unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation, reason = "clamped to the f64 exponent range")]
fn decade(value: f64) -> i32 {
    let exp = value.abs().log10().floor();
    if !exp.is_finite() {
        return 0;
    }
    exp.clamp(-400.0, 400.0) as i32
}

/// Number of ticks `step` places in `[low, high]`, saturating one past [`MAX_TICK_COUNT`].
#[allow(
    clippy::cast_possible_truncation,
    reason = "guarded by finite/positive checks and capped just above MAX_TICK_COUNT"
)]
fn tick_count(low: f64, high: f64, step: f64) -> usize {
    let first = (low / step - 1e-9).ceil();
    let last = (high / step + 1e-9).floor();
    let n = last - first + 1.0;
    if !n.is_finite() || n <= 0.0 {
        return 0;
    }
    n.min((MAX_TICK_COUNT + 1) as f64) as usize
}

fn tick_values(low: f64, high: f64, step: f64) -> Vec<f64> {
    let first = (low / step - 1e-9).ceil();
    let n = tick_count(low, high, step);
    (0..n)
        .map(|i| {
            let v = (first + i as f64) * step;
            // Snap rounding noise (and -0) at the origin.
            if v.abs() < step * 1e-9 { 0.0 } else { v }
        })
        .collect()
}

fn label_values(values: &[f64], step: f64, low: f64, high: f64) -> Vec<Tick> {
    let notation = Notation::for_grid(step, low.abs().max(high.abs()));
    let mut extra = 0;
    loop {
        let labels: Vec<String> = values
            .iter()
            .map(|&v| format_with(v, notation, extra))
            .collect();
        let distinct = labels.windows(2).all(|w| w[0] != w[1]);
        if distinct || extra == MAX_EXTRA_DIGITS {
            return values
                .iter()
                .zip(labels)
                .map(|(&value, label)| Tick { value, label })
                .collect();
        }
        extra += 1;
    }
}

/// Which edge of the data rectangle a tick collection decorates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Primary Y axis.
    Left,
    /// Secondary Y axis.
    Right,
    /// X axis.
    Bottom,
}

/// Ticks for one axis side plus the size of their widest label.
#[derive(Clone, Debug, PartialEq)]
pub struct TickCollection {
    side: Side,
    ticks: Vec<Tick>,
    step: f64,
    max_label_size: Size,
    degraded: bool,
}

impl TickCollection {
    /// Creates an empty collection for `side`.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            ticks: Vec::new(),
            step: 0.0,
            max_label_size: Size::ZERO,
            degraded: false,
        }
    }

    /// Recomputes ticks for `range` over `pixel_span` pixels and measures their labels.
    pub fn regenerate<M: TextMeasurer + ?Sized>(
        &mut self,
        range: AxisRange,
        pixel_span: f64,
        density: &TickDensity,
        measurer: &M,
        style: &TextStyle,
    ) {
        let range = range.or_unit();
        let search = find_ticks(range.low(), range.high(), pixel_span, density);
        let mut max = Size::ZERO;
        for tick in &search.ticks {
            let size = measurer.measure(&tick.label, style).size();
            max.width = max.width.max(size.width);
            max.height = max.height.max(size.height);
        }
        self.ticks = search.ticks;
        self.step = search.step;
        self.degraded = search.degraded;
        self.max_label_size = max;
    }

    /// Drops all ticks.
    pub fn clear(&mut self) {
        self.ticks.clear();
        self.step = 0.0;
        self.max_label_size = Size::ZERO;
        self.degraded = false;
    }

    /// The side this collection decorates.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Ticks in ascending order.
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Spacing between ticks.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Whether the last search returned best-effort ticks.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Size of the largest label.
    pub fn max_label_size(&self) -> Size {
        self.max_label_size
    }

    /// The label extent that competes with the scale band: width for vertical axes, height
    /// for the horizontal one.
    pub fn widest_label(&self) -> f64 {
        match self.side {
            Side::Left | Side::Right => self.max_label_size.width,
            Side::Bottom => self.max_label_size.height,
        }
    }
}
