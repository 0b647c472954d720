// src/plot_functions/plot_parallel_scaling.rs

use std::path::Path;

use crate::constants::{
    COLOR_CORNFLOWERBLUE, COLOR_INDICATOR, COLOR_SLATEGREY, MARKER_SIZE, STACKED_PLOT_HEIGHT,
    STACKED_PLOT_WIDTH,
};
use crate::data_analysis::parallel_scaling::ScalingPoint;
use crate::plot_framework::{
    calculate_range, draw_figure, HorizontalLine, LegendPosition, PlotConfig, PlotSeries,
};
use crate::series_style::LineStyle;
use crate::types::PlotResult;

/// Speedup (with the ideal `S = n` line) above efficiency (with the 100 % line).
pub fn plot_parallel_scaling(points: &[ScalingPoint], output_path: &Path) -> PlotResult {
    let cpus: Vec<f64> = points.iter().map(|p| f64::from(p.cpus)).collect();
    let x_max = cpus.iter().copied().fold(1.0, f64::max);
    let (x_lo, x_hi) = calculate_range(0.0, x_max);

    let speedup: Vec<(f64, f64)> = points.iter().map(|p| (f64::from(p.cpus), p.speedup)).collect();
    let ideal: Vec<(f64, f64)> = cpus.iter().map(|&n| (n, n)).collect();
    let efficiency: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.cpus), p.efficiency))
        .collect();

    let max_speedup = speedup
        .iter()
        .chain(ideal.iter())
        .map(|p| p.1)
        .fold(1.0, f64::max);
    let max_efficiency = efficiency.iter().map(|p| p.1).fold(1.0, f64::max);

    draw_figure(
        output_path,
        "Parallel performance",
        "Scaling",
        (2, 1),
        (STACKED_PLOT_WIDTH, STACKED_PLOT_HEIGHT),
        move |panel| match panel {
            0 => {
                let (y_lo, y_hi) = calculate_range(0.0, max_speedup);
                let mut config = PlotConfig::new(
                    "Speedup vs. Number of CPUs",
                    x_lo..x_hi,
                    y_lo..y_hi,
                    "Number of CPUs",
                    "Speedup",
                );
                config.legend_position = LegendPosition::UpperLeft;
                config.series = vec![
                    PlotSeries::new(speedup.clone(), "Measured Speedup", COLOR_CORNFLOWERBLUE)
                        .with_marker(MARKER_SIZE),
                    PlotSeries::new(ideal.clone(), "Ideal Speedup (S=n)", COLOR_SLATEGREY)
                        .with_line(LineStyle::Dashed),
                ];
                Some(config)
            }
            1 => {
                let (y_lo, y_hi) = calculate_range(0.0, max_efficiency);
                let mut config = PlotConfig::new(
                    "Parallel Efficiency vs. Number of CPUs",
                    x_lo..x_hi,
                    y_lo..y_hi,
                    "Number of CPUs",
                    "Efficiency",
                );
                config.series = vec![PlotSeries::new(
                    efficiency.clone(),
                    "Parallel Efficiency",
                    COLOR_CORNFLOWERBLUE,
                )
                .with_marker(MARKER_SIZE)];
                config.horizontal_lines = vec![HorizontalLine {
                    y: 1.0,
                    label: "100% Efficiency".to_string(),
                    color: COLOR_INDICATOR,
                    line: LineStyle::Dashed,
                }];
                Some(config)
            }
            _ => None,
        },
    )
}
