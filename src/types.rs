// src/types.rs
// Type aliases shared across the loaders, analysis and plot functions.

use std::error::Error;

/// Velocity vector `[vx, vy, vz]` of one probe sample.
pub type Velocity = [f64; 3];

/// `(x, y)` points of one plotted line.
pub type SeriesPoints = Vec<(f64, f64)>;

/// Result type of every figure-producing function.
pub type PlotResult = Result<(), Box<dyn Error>>;
