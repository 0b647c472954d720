// src/plot_functions/plot_coefficients.rs

use std::path::Path;

use crate::config::IndicatorConfig;
use crate::constants::{COLOR_CORNFLOWERBLUE, COLOR_INDICATOR};
use crate::data_input::time_series::Dataset;
use crate::error::AnalysisError;
use crate::plot_framework::{draw_single_plot, PlotConfig, PlotSeries, VerticalLine};
use crate::quantity::Quantity;
use crate::series_style::LineStyle;
use crate::types::PlotResult;

/// Dashed vertical markers labelled `CFL=<label>`, or nothing when disabled.
pub fn indicator_lines(indicators: &IndicatorConfig) -> Vec<VerticalLine> {
    if !indicators.show {
        return Vec::new();
    }
    indicators
        .lines
        .iter()
        .map(|ind| VerticalLine {
            x: ind.x,
            text: Some(format!("CFL={}", ind.label)),
            color: COLOR_INDICATOR,
            line: LineStyle::Dashed,
            text_offset: (indicators.text_xoffset, indicators.text_yoffset),
        })
        .collect()
}

/// Time history of one force coefficient with optional CFL indicator lines.
pub fn plot_coefficients(
    dataset: &Dataset,
    quantity: Quantity,
    indicators: &IndicatorConfig,
    title: &str,
    output_path: &Path,
) -> PlotResult {
    let series = dataset
        .get(quantity)
        .ok_or_else(|| AnalysisError::MissingColumn {
            file: dataset.name.clone(),
            column: quantity.column_name().to_string(),
        })?;

    let x_max = dataset.max_time().unwrap_or(1.0);
    // Default range, widened if the data leaves it.
    let (mut y_min, mut y_max) = quantity.default_range();
    if let Some((lo, hi)) = series.min_max() {
        y_min = y_min.min(lo);
        y_max = y_max.max(hi);
    }

    let mut config = PlotConfig::new(title, 0.0..x_max, y_min..y_max, "Time (s)", quantity.label());
    config.series.push(PlotSeries::new(
        series.points.clone(),
        quantity.short_name(),
        COLOR_CORNFLOWERBLUE,
    ));
    config.vertical_lines = indicator_lines(indicators);

    draw_single_plot(output_path, quantity.label(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorLine;

    #[test]
    fn test_indicator_lines_toggle() {
        let mut indicators = IndicatorConfig {
            lines: vec![
                IndicatorLine { label: "0.5".to_string(), x: 0.8 },
                IndicatorLine { label: "1".to_string(), x: 1.6 },
            ],
            ..Default::default()
        };
        let lines = indicator_lines(&indicators);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text.as_deref(), Some("CFL=0.5"));
        assert_eq!(lines[1].x, 1.6);

        indicators.show = false;
        assert!(indicator_lines(&indicators).is_empty());
    }
}
