// src/plot_functions/plot_waves.rs

use std::path::Path;

use crate::config::WavesConfig;
use crate::constants::{
    COLOR_CORNFLOWERBLUE, COLOR_DARKVIOLET, STACKED_PLOT_HEIGHT, STACKED_PLOT_WIDTH,
};
use crate::plot_framework::{draw_figure, value_range_of, PlotConfig, PlotSeries};
use crate::series_style::{tableau_color, LineStyle};
use crate::types::PlotResult;

/// Snapshot times as fractions of the period.
const SNAPSHOT_FRACTIONS: [f64; 4] = [0.0, 0.25, 0.5, 0.75];
const SNAPSHOT_POINTS: usize = 500;

fn panel_x_range(series: &[PlotSeries]) -> std::ops::Range<f64> {
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.data.iter().map(|p| p.0))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    if lo < hi {
        lo..hi
    } else {
        0.0..1.0
    }
}

/// Three stacked panels: oscillating wave in time, travelling-wave snapshots
/// in space, and the convected sine / one-minus-cosine gust pair.
pub fn plot_waves(config: &WavesConfig, output_path: &Path) -> PlotResult {
    let travelling = &config.travelling;
    let period = 1.0 / travelling.frequency_hz;

    let oscillating = vec![PlotSeries::new(
        travelling.oscillating(),
        "Oscillating: A sin(2pi f t) + offset",
        COLOR_CORNFLOWERBLUE,
    )];

    let snapshots: Vec<PlotSeries> = SNAPSHOT_FRACTIONS
        .iter()
        .enumerate()
        .map(|(i, &frac)| {
            PlotSeries::new(
                travelling.travelling_snapshot(frac * period, SNAPSHOT_POINTS),
                format!("t = {frac:.2} T"),
                tableau_color(i),
            )
        })
        .collect();

    let (sine, one_minus_cos) = config.spatial.curves();
    let spatial = vec![
        PlotSeries::new(sine, "A sin(wt + k y)", COLOR_CORNFLOWERBLUE),
        PlotSeries::new(one_minus_cos, "A (1 - cos(wt + k y))", COLOR_DARKVIOLET)
            .with_line(LineStyle::Dashed),
    ];

    let panels = [
        ("Oscillating wave", "Time (s)", "Amplitude", oscillating),
        ("Travelling wave snapshots", "x", "Amplitude", snapshots),
        ("Convected gust", "x = U cos(a) t", "Amplitude", spatial),
    ];

    draw_figure(
        output_path,
        "Oscillating vs. travelling waves",
        "Wave",
        (panels.len(), 1),
        (STACKED_PLOT_WIDTH, STACKED_PLOT_HEIGHT),
        move |i| {
            let (title, x_label, y_label, series) = panels.get(i)?;
            let mut plot = PlotConfig::new(
                *title,
                panel_x_range(series),
                value_range_of(series)?,
                *x_label,
                *y_label,
            );
            plot.series = series.clone();
            Some(plot)
        },
    )
}
