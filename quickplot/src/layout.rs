// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Band layout for a single plot.
//!
//! The outer rectangle is cut into named bands, each reserved from one edge:
//! - the **title** across the top, full width;
//! - the **Y label** and **Y2 label** strips on the left and right of everything below it;
//! - the **X label** strip along the bottom, between the label strips;
//! - the **X scale** band above the X label, spanning the corners under both Y scales;
//! - the **Y scale** and **Y2 scale** bands beside the data rectangle;
//! - the **data** rectangle, which is whatever remains.
//!
//! The bands partition the outer rectangle exactly. When they do not fit, they shrink
//! proportionally so the data rectangle keeps at least
//! [`LayoutSpec::min_data_extent`] (or the whole dimension, if that is smaller).

use kurbo::Rect;

/// Upper bound on layout passes per render.
///
/// Each pass may widen scale bands to fit tick labels measured against the previous pass.
pub const LAYOUT_MAX_PASSES: usize = 3;

/// Reserved band sizes, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSpec {
    /// Height of the title band.
    pub title_height: f64,
    /// Height of the X label band.
    pub x_label_height: f64,
    /// Width of the Y label band.
    pub y_label_width: f64,
    /// Width of the Y2 label band.
    pub y2_label_width: f64,
    /// Height of the X scale (tick label) band.
    pub x_scale_height: f64,
    /// Width of the Y scale band.
    pub y_scale_width: f64,
    /// Width of the Y2 scale band.
    pub y2_scale_width: f64,
    /// Smallest data rectangle width/height kept when bands must shrink.
    pub min_data_extent: f64,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            title_height: 30.0,
            x_label_height: 28.0,
            y_label_width: 28.0,
            y2_label_width: 28.0,
            x_scale_height: 22.0,
            y_scale_width: 40.0,
            y2_scale_width: 40.0,
            min_data_extent: 20.0,
        }
    }
}

impl LayoutSpec {
    /// Sets the title band height.
    #[must_use]
    pub fn with_title_height(mut self, height: f64) -> Self {
        self.title_height = height;
        self
    }

    /// Sets the label band thicknesses.
    #[must_use]
    pub fn with_label_bands(mut self, y_label: f64, y2_label: f64, x_label: f64) -> Self {
        self.y_label_width = y_label;
        self.y2_label_width = y2_label;
        self.x_label_height = x_label;
        self
    }

    /// Sets the scale band thicknesses.
    #[must_use]
    pub fn with_scale_bands(mut self, y_scale: f64, y2_scale: f64, x_scale: f64) -> Self {
        self.y_scale_width = y_scale;
        self.y2_scale_width = y2_scale;
        self.x_scale_height = x_scale;
        self
    }

    /// Sets the minimum data extent.
    #[must_use]
    pub fn with_min_data_extent(mut self, extent: f64) -> Self {
        self.min_data_extent = extent;
        self
    }

    /// The same spec with no space reserved for the secondary Y axis.
    #[must_use]
    pub fn without_y2(mut self) -> Self {
        self.y2_label_width = 0.0;
        self.y2_scale_width = 0.0;
        self
    }

    /// Enlarges scale bands that are thinner than the required sizes.
    ///
    /// Bands never shrink here. Returns `true` if any band changed.
    pub fn fit_scale_bands(&mut self, y: f64, y2: f64, x: f64) -> bool {
        let mut changed = false;
        for (band, need) in [
            (&mut self.y_scale_width, y),
            (&mut self.y2_scale_width, y2),
            (&mut self.x_scale_height, x),
        ] {
            if need.is_finite() && need > *band {
                *band = need;
                changed = true;
            }
        }
        changed
    }
}

/// The arranged bands of one plot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlotLayout {
    /// The rectangle that was partitioned.
    pub outer: Rect,
    /// Title band.
    pub title: Rect,
    /// Y label band.
    pub y_label: Rect,
    /// Y2 label band.
    pub y2_label: Rect,
    /// X label band.
    pub x_label: Rect,
    /// Y scale band.
    pub y_scale: Rect,
    /// Y2 scale band.
    pub y2_scale: Rect,
    /// X scale band.
    pub x_scale: Rect,
    /// Data rectangle.
    pub data: Rect,
}

impl PlotLayout {
    /// Partitions `rect` according to `spec`.
    pub fn arrange(spec: &LayoutSpec, rect: Rect) -> Self {
        let outer = rect.abs();
        let min_data = band(spec.min_data_extent);

        let [y_label_w, y_scale_w, y2_scale_w, y2_label_w] = fit_bands(
            [
                band(spec.y_label_width),
                band(spec.y_scale_width),
                band(spec.y2_scale_width),
                band(spec.y2_label_width),
            ],
            outer.width(),
            min_data,
        );
        let [title_h, x_scale_h, x_label_h] = fit_bands(
            [
                band(spec.title_height),
                band(spec.x_scale_height),
                band(spec.x_label_height),
            ],
            outer.height(),
            min_data,
        );

        // Edges, left to right and top to bottom. Shared edges use the same value so the
        // bands tile without gaps.
        let x_label_left = outer.x0 + y_label_w;
        let x_label_right = outer.x1 - y2_label_w;
        let data_left = x_label_left + y_scale_w;
        let data_right = (x_label_right - y2_scale_w).max(data_left);

        let body_top = outer.y0 + title_h;
        let x_label_top = outer.y1 - x_label_h;
        let data_bottom = (x_label_top - x_scale_h).max(body_top);

        Self {
            outer,
            title: Rect::new(outer.x0, outer.y0, outer.x1, body_top),
            y_label: Rect::new(outer.x0, body_top, x_label_left, outer.y1),
            y2_label: Rect::new(x_label_right, body_top, outer.x1, outer.y1),
            x_label: Rect::new(x_label_left, x_label_top, x_label_right, outer.y1),
            x_scale: Rect::new(x_label_left, data_bottom, x_label_right, x_label_top),
            y_scale: Rect::new(x_label_left, body_top, data_left, data_bottom),
            y2_scale: Rect::new(data_right, body_top, x_label_right, data_bottom),
            data: Rect::new(data_left, body_top, data_right, data_bottom),
        }
    }

    /// All bands with their names, data rectangle last.
    pub fn bands(&self) -> [(&'static str, Rect); 8] {
        [
            ("title", self.title),
            ("y_label", self.y_label),
            ("y2_label", self.y2_label),
            ("x_label", self.x_label),
            ("y_scale", self.y_scale),
            ("y2_scale", self.y2_scale),
            ("x_scale", self.x_scale),
            ("data", self.data),
        ]
    }
}

fn band(size: f64) -> f64 {
    if size.is_finite() { size.max(0.0) } else { 0.0 }
}

/// Scales `bands` down so they leave at least `min_data` (capped to `available`) free.
fn fit_bands<const N: usize>(bands: [f64; N], available: f64, min_data: f64) -> [f64; N] {
    let total: f64 = bands.iter().sum();
    let room = (available - min_data.min(available)).max(0.0);
    if total <= room {
        return bands;
    }
    let scale = if total > 0.0 { room / total } else { 0.0 };
    tracing::trace!(total, room, scale, "shrinking layout bands");
    bands.map(|b| b * scale)
}
