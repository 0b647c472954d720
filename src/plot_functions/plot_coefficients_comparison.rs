// src/plot_functions/plot_coefficients_comparison.rs

use std::path::Path;

use crate::data_input::time_series::Dataset;
use crate::plot_framework::{draw_single_plot, value_range_of, PlotConfig, PlotSeries};
use crate::quantity::Quantity;
use crate::series_style::StyleRules;
use crate::types::PlotResult;

/// Overlay of `quantity` from every dataset, styled by `rules`.
///
/// Skipped datasets are left out, datasets without the column are skipped
/// with a warning. The x-range spans `[0, max Time]` over the plotted sets.
pub fn plot_coefficients_comparison(
    datasets: &[Dataset],
    quantity: Quantity,
    rules: &StyleRules,
    title: &str,
    output_path: &Path,
) -> PlotResult {
    let names: Vec<String> = datasets.iter().map(|d| d.name.clone()).collect();
    let styles = rules.resolve(&names);

    let mut series = Vec::new();
    let mut max_time: Option<f64> = None;
    for (name, style) in styles {
        let Some(dataset) = datasets.iter().find(|d| d.name == name) else {
            continue;
        };
        let Some(ts) = dataset.get(quantity) else {
            log::warn!("'{name}' has no '{quantity}' column; skipping");
            continue;
        };
        if let Some(t) = dataset.max_time() {
            max_time = Some(max_time.map_or(t, |m: f64| m.max(t)));
        }
        series.push(PlotSeries::styled(ts.points.clone(), name, style));
    }

    let x_max = max_time.unwrap_or(1.0);
    log::info!("Dynamically calculated x-range: [0, {x_max}]");

    let y_range = value_range_of(&series).unwrap_or_else(|| {
        let (lo, hi) = quantity.default_range();
        lo..hi
    });

    let mut config = PlotConfig::new(title, 0.0..x_max, y_range, "Time (s)", quantity.label());
    config.series = series;
    draw_single_plot(output_path, "Coefficient comparison", config)
}
