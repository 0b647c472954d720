// src/plot_functions/plot_velocity_probes.rs

use std::path::Path;

use crate::constants::LINE_WIDTH_THIN;
use crate::data_input::probe_parser::ProbeData;
use crate::plot_framework::{draw_single_plot, value_range_of, PlotConfig, PlotSeries};
use crate::quantity::VelocityComponent;
use crate::series_style::tableau_color;
use crate::types::PlotResult;

/// One velocity component of every probe, one colour per probe.
pub fn plot_velocity_probes(
    probes: &[ProbeData],
    component: VelocityComponent,
    x_label: &str,
    output_path: &Path,
) -> PlotResult {
    let quantity = component.quantity();
    let series: Vec<PlotSeries> = probes
        .iter()
        .enumerate()
        .map(|(i, probe)| {
            PlotSeries::new(probe.component(component).points, &probe.name, tableau_color(i))
                .with_width(LINE_WIDTH_THIN + 1)
        })
        .collect();

    let (x_lo, x_hi) = probes
        .iter()
        .filter_map(|p| p.component(component).time_range())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });
    let x_range = if x_lo < x_hi { x_lo..x_hi } else { 0.0..1.0 };
    let y_range = value_range_of(&series).unwrap_or_else(|| {
        let (lo, hi) = quantity.default_range();
        lo..hi
    });

    let title = format!("Probe velocity, {}-direction", component.name());
    let mut config = PlotConfig::new(title, x_range, y_range, x_label, quantity.label());
    config.series = series;
    draw_single_plot(output_path, "Probe velocity", config)
}
