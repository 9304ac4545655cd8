// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The plot orchestrator.
//!
//! A [`Plot`] owns its series, axes, labels and tick collections and renders them on demand:
//!
//! 1. auto-scale if the axes were never set,
//! 2. arrange the bands, generate ticks, and widen scale bands that are too thin for the
//!    tick labels (at most [`LAYOUT_MAX_PASSES`] times),
//! 3. assign the data rectangle to the axes,
//! 4. draw the background, grid and ticks, then every series clipped to the data rectangle,
//! 5. draw the labels and the frame.
//!
//! Nothing from one render is needed by the next; resizing simply renders into another
//! rectangle.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Line, Point, Rect};
use peniko::color::palette::css;
use peniko::{Brush, Color};

use crate::axes::{Axes, AxesSnapshot, PixelMapping, YAxis};
use crate::canvas::{Canvas, StrokeStyle};
use crate::error::{PlotError, Result};
use crate::interaction::{Gesture, MouseButton, MouseState};
use crate::layout::{LAYOUT_MAX_PASSES, LayoutSpec, PlotLayout};
use crate::plottable::{Plottable, Scatter};
use crate::range::{AxisRange, DataExtent, RangeHandle};
use crate::style::Style;
use crate::text::{FontWeight, TextAnchor, TextBaseline, TextStyle};
use crate::ticks::{Side, TickCollection, TickDensity};

/// Margin used when rendering or a middle click triggers auto-axis.
pub const DEFAULT_MARGIN: f64 = 0.1;

/// Largest accepted auto-axis margin fraction.
pub const MAX_MARGIN: f64 = 0.99;

/// Text and style of a plot label.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// The text. Empty labels are not drawn and reserve no space.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Bold text.
    pub bold: bool,
    /// Text color.
    pub color: Color,
}

impl Label {
    /// Creates a 14px, regular, black label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 14.0,
            bold: false,
            color: css::BLACK,
        }
    }

    /// Sets the font size.
    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets bold text.
    #[must_use]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the text color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Centered text style for this label.
    pub fn text_style(&self) -> TextStyle {
        let weight = if self.bold {
            FontWeight::BOLD
        } else {
            FontWeight::NORMAL
        };
        TextStyle::new(self.font_size)
            .with_weight(weight)
            .with_color(self.color)
            .with_alignment(TextAnchor::Middle, TextBaseline::Middle)
    }
}

/// Colors and strokes of the non-data parts of a plot.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    /// Fill behind the whole plot, if any.
    pub background: Option<Color>,
    /// Fill behind the data rectangle.
    pub data_background: Color,
    /// Outline of the data rectangle.
    pub frame: StrokeStyle,
    /// Tick marks.
    pub tick: StrokeStyle,
    /// Tick length in pixels, outward from the data rectangle.
    pub tick_length: f64,
    /// Gap between a tick mark and its label.
    pub tick_label_padding: f64,
    /// Tick label text.
    pub tick_label: TextStyle,
    /// Grid lines at tick positions, if any.
    pub grid: Option<StrokeStyle>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: None,
            data_background: css::WHITE,
            frame: StrokeStyle::solid(css::BLACK, 1.0),
            tick: StrokeStyle::solid(css::BLACK, 1.0),
            tick_length: 4.0,
            tick_label_padding: 3.0,
            tick_label: TextStyle::new(11.0),
            grid: Some(StrokeStyle::solid(css::GAINSBORO, 1.0)),
        }
    }
}

/// A single 2D plot.
#[derive(Debug)]
pub struct Plot {
    plottables: Vec<Box<dyn Plottable>>,
    axes: Axes,
    layout: PlotLayout,
    x_ticks: TickCollection,
    y_ticks: TickCollection,
    y2_ticks: TickCollection,
    mouse: MouseState,
    /// Title above the data.
    pub title: Label,
    /// Label left of the Y scale.
    pub y_label: Label,
    /// Label right of the Y2 scale.
    pub y2_label: Label,
    /// Label below the X scale.
    pub x_label: Label,
    /// Reserved band sizes.
    pub layout_spec: LayoutSpec,
    /// Tick density targets.
    pub tick_density: TickDensity,
    /// Colors and strokes.
    pub theme: Theme,
}

impl Default for Plot {
    fn default() -> Self {
        Self::new()
    }
}

impl Plot {
    /// Creates an empty plot with default labels and unset axes.
    pub fn new() -> Self {
        Self {
            plottables: Vec::new(),
            axes: Axes::new(),
            layout: PlotLayout::default(),
            x_ticks: TickCollection::new(Side::Bottom),
            y_ticks: TickCollection::new(Side::Left),
            y2_ticks: TickCollection::new(Side::Right),
            mouse: MouseState::new(),
            title: Label::new("Title").with_font_size(16.0).with_bold(true),
            y_label: Label::new("Vertical Label"),
            y2_label: Label::new(""),
            x_label: Label::new("Horizontal Label"),
            layout_spec: LayoutSpec::default(),
            tick_density: TickDensity::default(),
            theme: Theme::default(),
        }
    }

    /// Adds an X/Y series.
    ///
    /// Without an explicit style, the series gets palette slot [`Plot::len`]. Invalid input
    /// leaves the plot unchanged.
    pub fn add_scatter(&mut self, xs: &[f64], ys: &[f64], style: Option<Style>) -> Result<()> {
        let style = style.unwrap_or_else(|| Style::indexed(self.plottables.len()));
        let scatter = Scatter::new(xs.to_vec(), ys.to_vec(), style)?;
        tracing::trace!(points = xs.len(), index = self.plottables.len(), "adding scatter");
        self.plottables.push(Box::new(scatter));
        Ok(())
    }

    /// Adds any plottable. It draws above those added before.
    pub fn add(&mut self, plottable: Box<dyn Plottable>) {
        self.plottables.push(plottable);
    }

    /// Removes all plottables. Axes and labels are kept.
    pub fn clear(&mut self) {
        self.plottables.clear();
    }

    /// Number of plottables.
    pub fn len(&self) -> usize {
        self.plottables.len()
    }

    /// Whether there are no plottables.
    pub fn is_empty(&self) -> bool {
        self.plottables.is_empty()
    }

    /// Plottables in draw order.
    pub fn plottables(&self) -> impl Iterator<Item = &dyn Plottable> + '_ {
        self.plottables.iter().map(|p| &**p)
    }

    /// Fits the axes to the union of all plottable extents.
    ///
    /// `margin_x` and `margin_y` are the fractions of each final span left empty around the
    /// data (clamped to `0..=0.99`). Series on the secondary axis fit `y2`; X always covers
    /// every series. With no samples at all the axes are left untouched.
    ///
    /// Fails with [`PlotError::NonFiniteExtent`] if a plottable reports a NaN or infinite
    /// extent.
    pub fn auto_axis(&mut self, margin_x: f64, margin_y: f64) -> Result<()> {
        let mut primary: Option<DataExtent> = None;
        let mut secondary: Option<DataExtent> = None;
        for plottable in &self.plottables {
            let Some(extent) = plottable.data_extent() else {
                continue;
            };
            if !extent.is_finite() {
                return Err(PlotError::NonFiniteExtent {
                    x_min: extent.x_min,
                    x_max: extent.x_max,
                    y_min: extent.y_min,
                    y_max: extent.y_max,
                });
            }
            let slot = match plottable.y_axis() {
                YAxis::Primary => &mut primary,
                YAxis::Secondary => &mut secondary,
            };
            *slot = Some(slot.map_or(extent, |e| e.union(extent)));
        }

        let all = match (primary, secondary) {
            (Some(a), Some(b)) => a.union(b),
            (Some(e), None) | (None, Some(e)) => e,
            (None, None) => {
                tracing::debug!("auto-axis without data; axes unchanged");
                return Ok(());
            }
        };

        self.axes.x().set(padded(all.x_min, all.x_max, margin_x));
        if let Some(e) = primary.or(secondary) {
            self.axes.y().set(padded(e.y_min, e.y_max, margin_y));
        }
        if let Some(e) = secondary {
            self.axes.y2().set(padded(e.y_min, e.y_max, margin_y));
        }
        tracing::debug!(
            x_low = self.axes.x().get().low(),
            x_high = self.axes.x().get().high(),
            y_low = self.axes.y().get().low(),
            y_high = self.axes.y().get().high(),
            "auto-axis"
        );
        Ok(())
    }

    /// Sets X and primary Y explicitly.
    pub fn set_axis(&mut self, x_low: f64, x_high: f64, y_low: f64, y_high: f64) {
        self.axes.x().update(|r| r.set(x_low, x_high));
        self.axes.y().update(|r| r.set(y_low, y_high));
    }

    /// Sets the secondary Y range explicitly.
    pub fn set_y2_axis(&mut self, low: f64, high: f64) {
        self.axes.y2().update(|r| r.set(low, high));
    }

    /// Makes this plot observe another plot's X and/or Y range.
    ///
    /// After sharing, mutating either plot's shared range is visible to both.
    pub fn share_axis(&mut self, sharex: Option<&Self>, sharey: Option<&Self>) {
        if let Some(other) = sharex {
            self.axes.share_x(&other.axes);
        }
        if let Some(other) = sharey {
            self.axes.share_y(&other.axes);
        }
    }

    /// Replaces shared ranges with private copies of their current values.
    pub fn unshare_axis(&mut self, unshare_x: bool, unshare_y: bool) {
        if unshare_x {
            self.axes.unshare_x();
        }
        if unshare_y {
            self.axes.unshare_y();
        }
    }

    /// The X range handle.
    pub fn x_range(&self) -> &RangeHandle {
        self.axes.x()
    }

    /// The primary Y range handle.
    pub fn y_range(&self) -> &RangeHandle {
        self.axes.y()
    }

    /// The secondary Y range handle.
    pub fn y2_range(&self) -> &RangeHandle {
        self.axes.y2()
    }

    /// Committed axis state.
    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    /// Mutable committed axis state, for programmatic pan/zoom.
    pub fn axes_mut(&mut self) -> &mut Axes {
        &mut self.axes
    }

    /// The layout of the last render.
    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    /// X ticks of the last render.
    pub fn x_ticks(&self) -> &TickCollection {
        &self.x_ticks
    }

    /// Primary Y ticks of the last render.
    pub fn y_ticks(&self) -> &TickCollection {
        &self.y_ticks
    }

    /// Secondary Y ticks of the last render (empty when the Y2 axis is unused).
    pub fn y2_ticks(&self) -> &TickCollection {
        &self.y2_ticks
    }

    /// Records a button press at `at` (pixels).
    pub fn mouse_down(&mut self, button: MouseButton, at: Point) {
        self.mouse.press(button, at);
    }

    /// Records pointer motion.
    pub fn mouse_move(&mut self, at: Point) {
        self.mouse.move_to(at);
    }

    /// Records a button release, committing a finished drag or auto-scaling on a middle
    /// click.
    pub fn mouse_up(&mut self, button: MouseButton, at: Point) -> Result<()> {
        self.mouse.move_to(at);
        let preview = self.preview_axes();
        match self.mouse.release(button, at) {
            Some(Gesture::Pan(delta) | Gesture::Zoom(delta)) => {
                self.axes.commit(preview);
                self.mouse.rebase();
                tracing::debug!(?button, dx = delta.x, dy = delta.y, "committed drag");
            }
            Some(Gesture::Click(MouseButton::Middle)) => {
                self.auto_axis(DEFAULT_MARGIN, DEFAULT_MARGIN)?;
            }
            Some(Gesture::Click(_)) | None => {}
        }
        Ok(())
    }

    /// The axes as they should be drawn now: committed state plus any drag in progress.
    pub fn preview_axes(&self) -> AxesSnapshot {
        self.mouse.preview(self.axes.snapshot())
    }

    /// Whether a pan or zoom drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.mouse.is_dragging()
    }

    /// Whether no mouse button is held over this plot.
    pub fn is_mouse_idle(&self) -> bool {
        self.mouse.is_idle()
    }

    /// Renders into `rect` and returns the layout used.
    ///
    /// Unset axes are auto-scaled first; without data they fall back to `[0, 1]`.
    pub fn render(&mut self, canvas: &mut dyn Canvas, rect: Rect) -> Result<PlotLayout> {
        let rect = rect.abs();
        if !self.axes.is_valid() {
            self.auto_axis(DEFAULT_MARGIN, DEFAULT_MARGIN)?;
        }

        let mut view = self.preview_axes();
        let use_y2 = view.y2.is_valid() || !self.y2_label.is_empty();
        let layout = self.arrange(canvas, rect, &view, use_y2);
        self.axes.set_rect(layout.data);
        view.rect = layout.data;
        self.layout = layout;

        if let Some(background) = self.theme.background {
            canvas.fill_rect(rect, &Brush::Solid(background));
        }
        canvas.fill_rect(layout.data, &Brush::Solid(self.theme.data_background));
        self.render_grid(canvas, &view);
        self.render_ticks(canvas, &view, use_y2);

        canvas.save();
        canvas.clip_rect(layout.data);
        for plottable in &self.plottables {
            plottable.render(canvas, &view.mapping(plottable.y_axis()));
        }
        canvas.restore();

        self.render_labels(canvas, &layout, use_y2);
        canvas.stroke_rect(layout.data, &self.theme.frame);
        tracing::trace!(
            width = rect.width(),
            height = rect.height(),
            plottables = self.plottables.len(),
            "rendered plot"
        );
        Ok(layout)
    }

    /// Fills every layout band of the last render with a translucent color.
    pub fn render_layout_debug(&self, canvas: &mut dyn Canvas) {
        let title = Brush::Solid(Color::from_rgba8(0, 0, 0, 0x55));
        let label = Brush::Solid(Color::from_rgba8(0, 0, 0xff, 0x55));
        let scale = Brush::Solid(Color::from_rgba8(0, 0xff, 0, 0x55));
        let data = Brush::Solid(Color::from_rgba8(0xff, 0, 0, 0x55));
        let l = &self.layout;
        canvas.fill_rect(l.title, &title);
        for r in [l.y_label, l.y2_label, l.x_label] {
            canvas.fill_rect(r, &label);
        }
        for r in [l.y_scale, l.y2_scale, l.x_scale] {
            canvas.fill_rect(r, &scale);
        }
        canvas.fill_rect(l.data, &data);
    }

    /// Runs the layout passes, leaving tick collections in sync with the returned layout.
    fn arrange(
        &mut self,
        canvas: &dyn Canvas,
        rect: Rect,
        view: &AxesSnapshot,
        use_y2: bool,
    ) -> PlotLayout {
        let mut spec = self.effective_spec(use_y2);
        let outward = self.theme.tick_length.max(0.0) + self.theme.tick_label_padding.max(0.0);
        let mut layout = PlotLayout::arrange(&spec, rect);
        for pass in 1..=LAYOUT_MAX_PASSES {
            self.regenerate_ticks(canvas, view, &layout, use_y2);
            let need_y = self.y_ticks.widest_label() + outward;
            let need_y2 = if use_y2 {
                self.y2_ticks.widest_label() + outward
            } else {
                0.0
            };
            let need_x = self.x_ticks.widest_label() + outward;
            if !spec.fit_scale_bands(need_y, need_y2, need_x) {
                return layout;
            }
            tracing::debug!(
                pass,
                y_scale = spec.y_scale_width,
                y2_scale = spec.y2_scale_width,
                x_scale = spec.x_scale_height,
                "widened scale bands for tick labels"
            );
            layout = PlotLayout::arrange(&spec, rect);
        }
        tracing::debug!(
            passes = LAYOUT_MAX_PASSES,
            "layout pass bound reached; keeping last layout"
        );
        self.regenerate_ticks(canvas, view, &layout, use_y2);
        layout
    }

    /// The configured spec with empty labels and an unused Y2 axis collapsed.
    fn effective_spec(&self, use_y2: bool) -> LayoutSpec {
        let mut spec = if use_y2 {
            self.layout_spec
        } else {
            self.layout_spec.without_y2()
        };
        if self.title.is_empty() {
            spec.title_height = 0.0;
        }
        if self.x_label.is_empty() {
            spec.x_label_height = 0.0;
        }
        if self.y_label.is_empty() {
            spec.y_label_width = 0.0;
        }
        if self.y2_label.is_empty() {
            spec.y2_label_width = 0.0;
        }
        spec
    }

    fn regenerate_ticks(
        &mut self,
        canvas: &dyn Canvas,
        view: &AxesSnapshot,
        layout: &PlotLayout,
        use_y2: bool,
    ) {
        let density = self.tick_density;
        let style = self.theme.tick_label;
        let data = layout.data;
        self.x_ticks
            .regenerate(view.x, data.width(), &density, canvas, &style);
        self.y_ticks
            .regenerate(view.y, data.height(), &density, canvas, &style);
        if use_y2 {
            self.y2_ticks
                .regenerate(view.y2, data.height(), &density, canvas, &style);
        } else {
            self.y2_ticks.clear();
        }
        for ticks in [&self.x_ticks, &self.y_ticks, &self.y2_ticks] {
            if ticks.is_degraded() {
                tracing::warn!(side = ?ticks.side(), "using best-effort ticks");
            }
        }
    }

    fn render_grid(&self, canvas: &mut dyn Canvas, view: &AxesSnapshot) {
        let Some(grid) = &self.theme.grid else {
            return;
        };
        let m = view.mapping(YAxis::Primary);
        let data = m.rect();
        let mut path = BezPath::new();
        for tick in self.x_ticks.ticks() {
            let x = m.x_to_pixel(tick.value);
            path.move_to((x, data.y0));
            path.line_to((x, data.y1));
        }
        for tick in self.y_ticks.ticks() {
            let y = m.y_to_pixel(tick.value);
            path.move_to((data.x0, y));
            path.line_to((data.x1, y));
        }
        if !path.elements().is_empty() {
            canvas.stroke_path(&path, grid);
        }
    }

    fn render_ticks(&self, canvas: &mut dyn Canvas, view: &AxesSnapshot, use_y2: bool) {
        let len = self.theme.tick_length.max(0.0);
        let gap = len + self.theme.tick_label_padding.max(0.0);
        let base = self.theme.tick_label;

        let m = view.mapping(YAxis::Primary);
        let data = m.rect();
        let mut marks = BezPath::new();

        let style = base.with_alignment(TextAnchor::Middle, TextBaseline::Hanging);
        for tick in self.x_ticks.ticks() {
            let x = m.x_to_pixel(tick.value);
            marks.move_to((x, data.y1));
            marks.line_to((x, data.y1 + len));
            canvas.draw_text(&tick.label, Point::new(x, data.y1 + gap), &style);
        }

        let style = base.with_alignment(TextAnchor::End, TextBaseline::Middle);
        for tick in self.y_ticks.ticks() {
            let y = m.y_to_pixel(tick.value);
            marks.move_to((data.x0, y));
            marks.line_to((data.x0 - len, y));
            canvas.draw_text(&tick.label, Point::new(data.x0 - gap, y), &style);
        }

        if use_y2 {
            let m2: PixelMapping = view.mapping(YAxis::Secondary);
            let style = base.with_alignment(TextAnchor::Start, TextBaseline::Middle);
            for tick in self.y2_ticks.ticks() {
                let y = m2.y_to_pixel(tick.value);
                marks.move_to((data.x1, y));
                marks.line_to((data.x1 + len, y));
                canvas.draw_text(&tick.label, Point::new(data.x1 + gap, y), &style);
            }
        }

        if !marks.elements().is_empty() {
            canvas.stroke_path(&marks, &self.theme.tick);
        }
    }

    fn render_labels(&self, canvas: &mut dyn Canvas, layout: &PlotLayout, use_y2: bool) {
        let data = layout.data;
        if !self.title.is_empty() {
            let t = layout.title;
            let y = t.center().y;
            canvas.draw_text_along(
                &self.title.text,
                Line::new((t.x0, y), (t.x1, y)),
                &self.title.text_style(),
            );
        }
        if !self.y_label.is_empty() {
            let x = layout.y_label.center().x;
            canvas.draw_text_along(
                &self.y_label.text,
                Line::new((x, data.y1), (x, data.y0)),
                &self.y_label.text_style(),
            );
        }
        if use_y2 && !self.y2_label.is_empty() {
            let x = layout.y2_label.center().x;
            canvas.draw_text_along(
                &self.y2_label.text,
                Line::new((x, data.y0), (x, data.y1)),
                &self.y2_label.text_style(),
            );
        }
        if !self.x_label.is_empty() {
            let y = layout.x_label.center().y;
            canvas.draw_text_along(
                &self.x_label.text,
                Line::new((data.x0, y), (data.x1, y)),
                &self.x_label.text_style(),
            );
        }
    }
}

/// Widens `[low, high]` so the data fills `1 - margin` of the span.
fn padded(low: f64, high: f64, margin: f64) -> AxisRange {
    let margin = if margin.is_nan() {
        0.0
    } else {
        margin.clamp(0.0, MAX_MARGIN)
    };
    let (low, high) = if high > low {
        (low, high)
    } else {
        (low - 0.5, high + 0.5)
    };
    let half = (0.5 * high - 0.5 * low) / (1.0 - margin);
    let center = 0.5 * low + 0.5 * high;
    // Saturate at the f64 limits; the padded range still contains `[low, high]`.
    AxisRange::new((center - half).max(-f64::MAX), (center + half).min(f64::MAX))
}
