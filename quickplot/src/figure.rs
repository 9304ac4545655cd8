// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A grid of subplots sharing one drawing surface.

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::{Brush, Color};

use crate::canvas::Canvas;
use crate::error::{PlotError, Result};
use crate::interaction::MouseButton;
use crate::layout::PlotLayout;
use crate::plot::Plot;

/// A `rows` by `cols` grid of [`Plot`]s, stored row-major.
///
/// Rendering splits the target rectangle into equal cells. Pointer events go to the plot
/// whose last rendered cell contains the pointer; once a button is down, events stay with
/// that plot until every button is released.
#[derive(Debug)]
pub struct Figure {
    rows: usize,
    cols: usize,
    plots: Vec<Plot>,
    cells: Vec<Rect>,
    captured: Option<usize>,
    /// Fill behind the whole figure, if any.
    pub background: Option<Color>,
}

impl Figure {
    /// Creates a grid of default plots. Zero rows or columns are treated as one.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            plots: (0..rows * cols).map(|_| Plot::new()).collect(),
            cells: Vec::new(),
            captured: None,
            background: None,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// All plots, row-major.
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    /// The plot at `row`, `col`.
    pub fn subplot(&self, row: usize, col: usize) -> Result<&Plot> {
        let i = self.index(row, col)?;
        Ok(&self.plots[i])
    }

    /// The plot at `row`, `col`, mutably.
    pub fn subplot_mut(&mut self, row: usize, col: usize) -> Result<&mut Plot> {
        let i = self.index(row, col)?;
        Ok(&mut self.plots[i])
    }

    /// Shares axes between subplots, like [`Plot::share_axis`].
    pub fn share_axis(
        &mut self,
        target: (usize, usize),
        sharex: Option<(usize, usize)>,
        sharey: Option<(usize, usize)>,
    ) -> Result<()> {
        let t = self.index(target.0, target.1)?;
        let x = sharex.map(|(r, c)| self.index(r, c)).transpose()?;
        let y = sharey.map(|(r, c)| self.index(r, c)).transpose()?;
        if let Some(s) = x.filter(|&s| s != t) {
            let (target, source) = pair_mut(&mut self.plots, t, s);
            target.share_axis(Some(source), None);
        }
        if let Some(s) = y.filter(|&s| s != t) {
            let (target, source) = pair_mut(&mut self.plots, t, s);
            target.share_axis(None, Some(source));
        }
        Ok(())
    }

    /// The cell of `row`, `col` when the figure fills `rect`.
    pub fn cell_rect(&self, rect: Rect, row: usize, col: usize) -> Rect {
        let rect = rect.abs();
        let x = |c: usize| rect.x0 + rect.width() * c as f64 / self.cols as f64;
        let y = |r: usize| rect.y0 + rect.height() * r as f64 / self.rows as f64;
        Rect::new(x(col), y(row), x(col + 1), y(row + 1))
    }

    /// Renders every subplot into its cell and returns their layouts, row-major.
    pub fn render(&mut self, canvas: &mut dyn Canvas, rect: Rect) -> Result<Vec<PlotLayout>> {
        if let Some(background) = self.background {
            canvas.fill_rect(rect.abs(), &Brush::Solid(background));
        }
        let cells: Vec<Rect> = (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .map(|(r, c)| self.cell_rect(rect, r, c))
            .collect();
        let mut layouts = Vec::with_capacity(cells.len());
        for (plot, cell) in self.plots.iter_mut().zip(&cells) {
            layouts.push(plot.render(canvas, *cell)?);
        }
        self.cells = cells;
        Ok(layouts)
    }

    /// Routes a button press to the subplot under `at`.
    pub fn mouse_down(&mut self, button: MouseButton, at: Point) {
        let Some(i) = self.captured.or_else(|| self.hit(at)) else {
            return;
        };
        self.captured = Some(i);
        self.plots[i].mouse_down(button, at);
    }

    /// Routes pointer motion to the subplot holding the drag.
    pub fn mouse_move(&mut self, at: Point) {
        if let Some(i) = self.captured {
            self.plots[i].mouse_move(at);
        }
    }

    /// Routes a button release to the subplot holding the drag.
    pub fn mouse_up(&mut self, button: MouseButton, at: Point) -> Result<()> {
        let Some(i) = self.captured else {
            return Ok(());
        };
        let result = self.plots[i].mouse_up(button, at);
        if self.plots[i].is_mouse_idle() {
            self.captured = None;
        }
        result
    }

    fn hit(&self, at: Point) -> Option<usize> {
        self.cells.iter().position(|cell| cell.contains(at))
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(PlotError::NoSuchSubplot { row, col })
        }
    }
}

/// Mutable access to `v[a]` alongside shared access to `v[b]`, for `a != b`.
fn pair_mut<T>(v: &mut [T], a: usize, b: usize) -> (&mut T, &T) {
    if a < b {
        let (head, tail) = v.split_at_mut(b);
        (&mut head[a], &tail[0])
    } else {
        let (head, tail) = v.split_at_mut(a);
        (&mut tail[0], &head[b])
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::canvas::RecordingCanvas;

    #[test]
    fn cells_tile_the_rect() {
        let f = Figure::new(2, 3);
        let rect = Rect::new(0.0, 0.0, 300.0, 200.0);
        let mut area = 0.0;
        for r in 0..2 {
            for c in 0..3 {
                area += f.cell_rect(rect, r, c).area();
            }
        }
        assert!((area - rect.area()).abs() < 1e-9, "cells cover the rect");
        assert_eq!(f.cell_rect(rect, 1, 2), Rect::new(200.0, 100.0, 300.0, 200.0), "last");
    }

    #[test]
    fn out_of_range_subplot_is_an_error() {
        let mut f = Figure::new(1, 2);
        assert!(f.subplot(0, 1).is_ok(), "in range");
        assert_eq!(
            f.subplot_mut(1, 0).err(),
            Some(PlotError::NoSuchSubplot { row: 1, col: 0 }),
            "row out of range"
        );
    }

    #[test]
    fn drags_go_to_the_plot_under_the_pointer() {
        let mut f = Figure::new(1, 2);
        for c in 0..2 {
            f.subplot_mut(0, c)
                .expect("subplot")
                .add_scatter(&[0.0, 1.0], &[0.0, 1.0], None)
                .expect("valid data");
        }
        let mut canvas = RecordingCanvas::new();
        f.render(&mut canvas, Rect::new(0.0, 0.0, 800.0, 400.0))
            .expect("render");
        let right_before = f.subplot(0, 1).expect("subplot").x_range().get();
        let left_before = f.subplot(0, 0).expect("subplot").x_range().get();

        let start = f.subplot(0, 1).expect("subplot").layout().data.center();
        f.mouse_down(MouseButton::Left, start);
        // Leaving the cell mid-drag does not change the target.
        f.mouse_move(Point::new(10.0, start.y));
        f.mouse_up(MouseButton::Left, Point::new(10.0, start.y))
            .expect("mouse up");

        assert_ne!(
            f.subplot(0, 1).expect("subplot").x_range().get(),
            right_before,
            "right plot panned"
        );
        assert_eq!(
            f.subplot(0, 0).expect("subplot").x_range().get(),
            left_before,
            "left plot untouched"
        );
    }

    #[test]
    fn shared_subplots_follow_each_other() {
        let mut f = Figure::new(2, 1);
        f.share_axis((1, 0), Some((0, 0)), None).expect("share");
        f.subplot_mut(0, 0)
            .expect("subplot")
            .set_axis(-5.0, 5.0, 0.0, 1.0);
        assert_eq!(
            f.subplot(1, 0).expect("subplot").x_range().get().low(),
            -5.0,
            "x follows"
        );
        assert!(
            !f.subplot(1, 0).expect("subplot").y_range().get().is_valid(),
            "y stays private"
        );
    }
}
