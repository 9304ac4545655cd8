// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderable data series.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{BezPath, Point};
use peniko::Brush;

use crate::axes::{PixelMapping, YAxis};
use crate::canvas::{Canvas, StrokeStyle};
use crate::error::{PlotError, Result};
use crate::range::DataExtent;
use crate::style::Style;

/// A series a [`Plot`](crate::Plot) can scale to and draw.
///
/// Plots hold plottables as `Box<dyn Plottable>` in insertion order; later ones draw on top.
pub trait Plottable: Debug {
    /// Bounding box of the series' own samples, or `None` when it has none.
    fn data_extent(&self) -> Option<DataExtent>;

    /// Draws the series through `mapping`. The canvas is already clipped to the data rect.
    fn render(&self, canvas: &mut dyn Canvas, mapping: &PixelMapping);

    /// The vertical axis this series maps against.
    fn y_axis(&self) -> YAxis {
        YAxis::Primary
    }

    /// Number of samples.
    fn len(&self) -> usize;

    /// Whether there are no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An X/Y series drawn as markers, a connecting line, or both.
#[derive(Clone, Debug, PartialEq)]
pub struct Scatter {
    xs: Vec<f64>,
    ys: Vec<f64>,
    style: Style,
}

impl Scatter {
    /// Creates a series from paired samples.
    ///
    /// Fails with [`PlotError::InvalidInput`] when the lengths differ and with
    /// [`PlotError::InvalidData`] when any sample is NaN or infinite.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, style: Style) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(PlotError::InvalidInput {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        check_finite("x", &xs)?;
        check_finite("y", &ys)?;
        Ok(Self { xs, ys, style })
    }

    /// X samples.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Y samples.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// The series style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    fn render_line(&self, canvas: &mut dyn Canvas, mapping: &PixelMapping) {
        let Some(width) = self.style.line_width.filter(|w| *w > 0.0) else {
            return;
        };
        if self.xs.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        for (i, (&x, &y)) in self.xs.iter().zip(&self.ys).enumerate() {
            let p = (mapping.x_to_pixel(x), mapping.y_to_pixel(y));
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        canvas.stroke_path(&path, &StrokeStyle::solid(self.style.color, width));
    }

    fn render_markers(&self, canvas: &mut dyn Canvas, mapping: &PixelMapping) {
        let Some(marker) = self.style.marker.filter(|m| m.size > 0.0) else {
            return;
        };
        let visible = mapping.rect().inflate(marker.size, marker.size);
        let mut path = BezPath::new();
        for (&x, &y) in self.xs.iter().zip(&self.ys) {
            let (px, py) = (mapping.x_to_pixel(x), mapping.y_to_pixel(y));
            if !visible.contains(Point::new(px, py)) {
                continue;
            }
            let glyph = marker.symbol.path(px, py, marker.size);
            path.extend(glyph.elements().iter().copied());
        }
        if path.elements().is_empty() {
            return;
        }
        if marker.symbol.is_stroked() {
            canvas.stroke_path(&path, &StrokeStyle::solid(self.style.color, 1.0));
        } else {
            canvas.fill_path(&path, &Brush::Solid(self.style.color));
        }
    }
}

impl Plottable for Scatter {
    fn data_extent(&self) -> Option<DataExtent> {
        DataExtent::of_points(&self.xs, &self.ys)
    }

    fn render(&self, canvas: &mut dyn Canvas, mapping: &PixelMapping) {
        self.render_line(canvas, mapping);
        self.render_markers(canvas, mapping);
    }

    fn y_axis(&self) -> YAxis {
        self.style.y_axis
    }

    fn len(&self) -> usize {
        self.xs.len()
    }
}

fn check_finite(axis: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(PlotError::InvalidData {
            axis,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::{Rect, Shape};

    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::range::AxisRange;
    use crate::style::{Marker, Symbol};

    fn mapping() -> PixelMapping {
        PixelMapping::new(
            AxisRange::new(0.0, 2.0),
            AxisRange::new(0.0, 1.0),
            Rect::new(0.0, 0.0, 200.0, 100.0),
        )
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = Scatter::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0], Style::indexed(0));
        assert_eq!(err, Err(PlotError::InvalidInput { xs: 3, ys: 2 }), "length check");
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let err = Scatter::new(vec![0.0, 1.0], vec![0.0, f64::INFINITY], Style::indexed(0));
        assert!(
            matches!(err, Err(PlotError::InvalidData { axis: "y", index: 1, .. })),
            "finiteness check: {err:?}"
        );
    }

    #[test]
    fn extent_covers_samples() {
        let s = Scatter::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0], Style::indexed(0))
            .expect("valid series");
        assert_eq!(s.data_extent(), Some(DataExtent::new(0.0, 2.0, 0.0, 1.0)), "extent");
    }

    #[test]
    fn empty_series_draws_nothing() {
        let s = Scatter::new(vec![], vec![], Style::indexed(0)).expect("empty is valid");
        assert!(s.data_extent().is_none(), "no extent");
        let mut canvas = RecordingCanvas::new();
        s.render(&mut canvas, &mapping());
        assert!(canvas.commands().is_empty(), "nothing drawn");
    }

    #[test]
    fn line_and_markers_land_on_mapped_points() {
        let s = Scatter::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0], Style::indexed(2))
            .expect("valid series");
        let mut canvas = RecordingCanvas::new();
        s.render(&mut canvas, &mapping());

        let [line, markers] = canvas.commands() else {
            panic!("expected a line and a marker batch: {:?}", canvas.commands());
        };
        let DrawCommand::StrokePath { path, .. } = line else {
            panic!("line first: {line:?}");
        };
        assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 200.0, 100.0), "line spans rect");
        assert!(
            matches!(markers, DrawCommand::FillPath { .. }),
            "circle markers are filled"
        );
    }

    #[test]
    fn scatter_only_style_skips_the_line() {
        let style = Style::indexed(0)
            .with_line_width(None)
            .with_marker(Some(Marker::new(Symbol::Cross, 4.0)));
        let s = Scatter::new(vec![0.5, 1.5], vec![0.5, 0.5], style).expect("valid series");
        let mut canvas = RecordingCanvas::new();
        s.render(&mut canvas, &mapping());
        assert_eq!(canvas.commands().len(), 1, "one marker batch");
        assert!(
            matches!(canvas.commands()[0], DrawCommand::StrokePath { .. }),
            "crosses are stroked"
        );
    }

    #[test]
    fn markers_far_outside_the_data_rect_are_culled() {
        let style = Style::indexed(0)
            .with_line_width(None)
            .with_marker(Some(Marker::new(Symbol::Square, 4.0)));
        let s = Scatter::new(vec![0.5, 100.0], vec![0.5, 0.5], style).expect("valid series");
        let mut canvas = RecordingCanvas::new();
        s.render(&mut canvas, &mapping());
        let [DrawCommand::FillPath { path, .. }] = canvas.commands() else {
            panic!("expected one marker batch: {:?}", canvas.commands());
        };
        let bounds = path.bounding_box();
        assert!(
            (bounds.center().x - 50.0).abs() < 1e-9 && bounds.x1 <= 52.0 + 1e-9,
            "only the visible marker is drawn: {bounds:?}"
        );
    }
}
