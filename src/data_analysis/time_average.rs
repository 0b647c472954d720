// src/data_analysis/time_average.rs

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use ndarray::{s, Array1};

use crate::data_input::time_series::TimeSeries;
use crate::error::AnalysisError;

/// Time-weighted mean of a quantity and the number of samples it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageResult {
    pub average: f64,
    pub count: usize,
}

/// Trapezoidal time-average over every sample of `series`.
///
/// Each segment contributes `(v_i + v_{i+1}) / 2 * (t_{i+1} - t_i)`; the sum is
/// divided by `t_last - t_first`. Segment widths are kept per segment, so
/// non-uniform sampling is weighted correctly.
pub fn weighted_time_average(series: &TimeSeries) -> Result<AverageResult, AnalysisError> {
    let count = series.len();
    let times = Array1::from(series.times());
    let values = Array1::from(series.values());

    let insufficient = || AnalysisError::InsufficientSamples {
        found: count,
        time_min: series.points.first().map_or(f64::NAN, |p| p.0),
        time_max: series.points.last().map_or(f64::NAN, |p| p.0),
    };

    if count < 2 {
        return Err(insufficient());
    }
    let span = times[count - 1] - times[0];
    if !span.is_finite() || span <= 0.0 {
        return Err(insufficient());
    }

    let dt = &times.slice(s![1..]) - &times.slice(s![..-1]);
    let mid_values = (&values.slice(s![1..]) + &values.slice(s![..-1])) * 0.5;
    let integral = (&mid_values * &dt).sum();

    Ok(AverageResult {
        average: integral / span,
        count,
    })
}

/// Restrict `series` to `[time_min, time_max]` and average it.
pub fn windowed_time_average(
    series: &TimeSeries,
    time_min: f64,
    time_max: f64,
) -> Result<AverageResult, AnalysisError> {
    let window = series.window(time_min, time_max);
    weighted_time_average(&window).map_err(|e| match e {
        AnalysisError::InsufficientSamples { found, .. } => AnalysisError::InsufficientSamples {
            found,
            time_min,
            time_max,
        },
        other => other,
    })
}

/// One line item of the statistics log.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageEntry {
    pub file: String,
    pub quantity: String,
    pub result: AverageResult,
}

pub fn format_average_report(entries: &[AverageEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "File: {}, {}:", entry.file, entry.quantity);
        let _ = writeln!(out, "  Average: {}", entry.result.average);
        let _ = writeln!(out, "  Count: {}", entry.result.count);
        let _ = writeln!(out);
    }
    out
}

pub fn write_average_report(path: &Path, entries: &[AverageEntry]) -> Result<(), AnalysisError> {
    fs::write(path, format_average_report(entries))?;
    Ok(())
}
