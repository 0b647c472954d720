// src/plot_functions/plot_gust_comparison.rs

use std::path::Path;

use plotters::style::RGBColor;

use crate::constants::{
    COLOR_GENERATED_WAVE, COLOR_GREY, COLOR_REFERENCE_WAVE, LINE_WIDTH_THIN, MARKER_SIZE,
};
use crate::data_analysis::gust::{GustParameters, GustWaveform};
use crate::data_analysis::interpolate::VariationBand;
use crate::data_input::probe_parser::ProbeData;
use crate::data_input::time_series::TimeSeries;
use crate::plot_framework::{
    draw_single_plot, value_range_of, FillBand, HorizontalLine, PlotConfig, PlotSeries,
};
use crate::quantity::VelocityComponent;
use crate::series_style::{tableau_color, LineStyle};
use crate::types::PlotResult;

/// Probe lines are drawn faint so the experiment markers stay readable.
const PROBE_ALPHA: f64 = 0.2;
const WAVE_ALPHA: f64 = 0.5;
const BAND_OPACITY: f64 = 0.2;

const COLOR_FIRST_SERIES: RGBColor = RGBColor(0, 128, 0);

/// Colour of series `index`: green first, then the tableau cycle.
fn gust_color(index: usize) -> RGBColor {
    if index == 0 {
        COLOR_FIRST_SERIES
    } else {
        tableau_color(index - 1)
    }
}

pub struct GustComparison<'a> {
    /// Normalized probe logs.
    pub probes: &'a [ProbeData],
    pub component: VelocityComponent,
    /// Experiment amplitude series, `(name, series)` with time in t/T.
    pub experiments: &'a [(String, TimeSeries)],
    pub waveform: GustWaveform,
    pub params: GustParameters,
    pub band: Option<VariationBand>,
}

/// Normalized probe velocities against experiment data and the synthetic gust,
/// with peak reference lines and an optional experimental variation band.
pub fn plot_gust_comparison(input: &GustComparison, output_path: &Path) -> PlotResult {
    let mut series = Vec::new();

    for (i, probe) in input.probes.iter().enumerate() {
        series.push(
            PlotSeries::new(
                probe.component(input.component).points,
                format!("Inlet gust: {}", probe.name),
                gust_color(i),
            )
            .with_width(LINE_WIDTH_THIN + 1)
            .with_alpha(PROBE_ALPHA)
            .with_marker(1),
        );
    }

    for (i, (name, exp)) in input.experiments.iter().enumerate() {
        series.push(
            PlotSeries::new(exp.points.clone(), format!("Experiment: {name}"), gust_color(i))
                .with_line(LineStyle::Dotted)
                .with_marker(MARKER_SIZE + 2),
        );
    }

    let (shifted, reference) = input.waveform.sample_normalized(input.params.sampling_rate);
    series.push(
        PlotSeries::new(shifted, input.waveform.describe(), COLOR_GENERATED_WAVE)
            .with_alpha(WAVE_ALPHA),
    );
    series.push(
        PlotSeries::new(reference, "A sin(wt)", COLOR_REFERENCE_WAVE).with_alpha(WAVE_ALPHA),
    );

    let x_range = series
        .iter()
        .flat_map(|s| s.data.iter().map(|p| p.0))
        .filter(|x| x.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, x| {
            Some(acc.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x))))
        })
        .filter(|(lo, hi)| hi > lo)
        .map_or(0.0..1.0, |(lo, hi)| lo..hi);
    let y_range = value_range_of(&series).unwrap_or(-0.2..0.2);

    let mut config = PlotConfig::new(
        "Comparison of Velocity Data",
        x_range,
        y_range,
        "t/T",
        format!("v/U for {}-direction", input.component.name()),
    );
    config.series = series;
    config.horizontal_lines = vec![
        HorizontalLine {
            y: input.params.positive_peak,
            label: "Positive Peak".to_string(),
            color: COLOR_GREY,
            line: LineStyle::Dashed,
        },
        HorizontalLine {
            y: input.params.negative_peak,
            label: "Negative Peak".to_string(),
            color: COLOR_GREY,
            line: LineStyle::DashDot,
        },
    ];
    if let Some(band) = &input.band {
        config.bands.push(FillBand {
            outline: band.polygon(),
            color: COLOR_GREY,
            opacity: BAND_OPACITY,
            label: "Experimental variation".to_string(),
        });
    }

    draw_single_plot(output_path, "Gust comparison", config)
}
