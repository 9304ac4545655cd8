// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive 2D scatter/line plots onto any drawing surface.
//!
//! This crate is the layout-and-axis core of a plotting engine:
//! - **Ticks** pick "nice" spacings and labels for an axis range and pixel span.
//! - **Axes** hold the visible ranges and map between data and pixel coordinates.
//! - **Layout** cuts a pixel rectangle into title, label, scale and data bands.
//! - **Plots** own their series, auto-scale, share axes and render through a [`Canvas`].
//!
//! Rendering goes through the small [`Canvas`] trait; the crate never owns pixels, shapes
//! text or reads window sizes. Hosts feed data arrays, pixel rectangles and raw mouse
//! events, and receive draw calls.
//!
//! ```
//! use kurbo::Rect;
//! use quickplot::{Plot, RecordingCanvas};
//!
//! let mut plot = Plot::new();
//! plot.add_scatter(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], None)?;
//! plot.auto_axis(0.0, 0.0)?;
//! assert_eq!(plot.x_range().get().high(), 2.0);
//!
//! let mut canvas = RecordingCanvas::new();
//! let layout = plot.render(&mut canvas, Rect::new(0.0, 0.0, 640.0, 480.0))?;
//! assert!(layout.data.width() > 0.0);
//! # Ok::<(), quickplot::PlotError>(())
//! ```
//!
//! Axis ranges are shared explicitly: [`Plot::share_axis`] makes two plots observe the
//! same [`RangeHandle`], and [`Plot::unshare_axis`] gives a plot a private copy again.
//!
//! The crate is `no_std` + `alloc`. Enable `std` or `libm` (the default) for float math.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod axes;
mod canvas;
mod error;
mod figure;
#[cfg(not(feature = "std"))]
mod float;
mod interaction;
mod layout;
mod plot;
mod plottable;
mod range;
mod style;
mod text;
mod ticks;

pub use axes::{
    Axes, AxesSnapshot, MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR, PixelMapping, YAxis,
    zoom_factor_from_drag,
};
pub use canvas::{Canvas, DrawCommand, RecordingCanvas, StrokeStyle};
pub use error::{PlotError, Result};
pub use figure::Figure;
pub use interaction::{CLICK_SLOP_PX, Gesture, MouseButton, MouseState};
pub use layout::{LAYOUT_MAX_PASSES, LayoutSpec, PlotLayout};
pub use plot::{DEFAULT_MARGIN, Label, MAX_MARGIN, Plot, Theme};
pub use plottable::{Plottable, Scatter};
pub use range::{AxisRange, DataExtent, MIN_SPAN, RangeHandle};
pub use style::{Marker, PALETTE, Style, Symbol};
pub use text::{
    FontWeight, HeuristicTextMeasurer, TextAnchor, TextBaseline, TextMeasurer, TextMetrics,
    TextStyle,
};
pub use ticks::{
    MAX_TICK_COUNT, MAX_TICK_SEARCH_STEPS, Side, Tick, TickCollection, TickDensity, TickSearch,
    find_ticks, format_tick,
};
