// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only malformed caller input surfaces as an error. Numeric trouble inside the pipeline
//! (zero spans, invalid axes, tick or layout searches that hit their bounds) is recovered
//! locally and logged.

use thiserror::Error;

/// Errors reported by plot operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PlotError {
    /// X and Y sample arrays have different lengths.
    #[error("invalid input: {xs} x values but {ys} y values")]
    InvalidInput {
        /// Number of X samples.
        xs: usize,
        /// Number of Y samples.
        ys: usize,
    },
    /// A sample is NaN or infinite.
    #[error("invalid data: non-finite {axis} value {value} at index {index}")]
    InvalidData {
        /// Which array held the sample (`"x"` or `"y"`).
        axis: &'static str,
        /// Index of the offending sample.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// A plottable reported a data extent with non-finite bounds.
    #[error("invalid data: non-finite extent x=[{x_min}, {x_max}] y=[{y_min}, {y_max}]")]
    NonFiniteExtent {
        /// Reported minimum X.
        x_min: f64,
        /// Reported maximum X.
        x_max: f64,
        /// Reported minimum Y.
        y_min: f64,
        /// Reported maximum Y.
        y_max: f64,
    },
    /// A figure was addressed outside its subplot grid.
    #[error("no subplot at row {row}, column {col}")]
    NoSuchSubplot {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}

/// Result alias for plot operations.
pub type Result<T, E = PlotError> = core::result::Result<T, E>;
