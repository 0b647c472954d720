// src/plot_functions/plot_percent_difference.rs

use std::path::Path;

use crate::config::ComparisonConfig;
use crate::constants::{COLOR_HIGH_DEVIATION, COLOR_NORMAL_DEVIATION, MARKER_SIZE};
use crate::data_analysis::percent_diff::{Deviation, PercentDifference};
use crate::data_input::time_series::TimeSeries;
use crate::plot_framework::{
    draw_single_plot, value_range_of, LegendPosition, PlotConfig, PlotSeries, TextAnnotation,
};
use crate::series_style::tableau_color;
use crate::types::PlotResult;

/// One `AoA`/`Cl` table and, for candidates, its differences to the reference.
pub struct ComparedTable<'a> {
    pub name: &'a str,
    pub series: &'a TimeSeries,
    /// `None` for the reference table itself.
    pub differences: Option<&'a [PercentDifference]>,
}

/// Label text and colour for one percentage difference.
pub fn annotation_for(diff: &PercentDifference, config: &ComparisonConfig) -> TextAnnotation {
    TextAnnotation {
        x: diff.key + config.label_x_offset,
        y: diff.candidate + config.label_y_offset,
        text: format!("{:.1}%", diff.percent),
        color: match diff.deviation {
            Deviation::HighDeviation => COLOR_HIGH_DEVIATION,
            Deviation::Normal => COLOR_NORMAL_DEVIATION,
        },
    }
}

/// Lift coefficient vs. angle of attack for every table, candidates annotated
/// with their percentage difference to the reference.
pub fn plot_percent_difference(
    tables: &[ComparedTable],
    config: &ComparisonConfig,
    output_path: &Path,
) -> PlotResult {
    let mut plot = PlotConfig::new(
        "Lift Coefficient (Cl) vs Angle of Attack (AoA)",
        0.0..1.0,
        0.0..1.0,
        "AoA (deg)",
        "Cl",
    );
    plot.legend_position = LegendPosition::LowerRight;

    let mut x_lo = f64::INFINITY;
    let mut x_hi = f64::NEG_INFINITY;
    for (i, table) in tables.iter().enumerate() {
        if let Some((lo, hi)) = table.series.time_range() {
            x_lo = x_lo.min(lo);
            x_hi = x_hi.max(hi);
        }
        plot.series.push(
            PlotSeries::new(table.series.points.clone(), table.name, tableau_color(i))
                .with_marker(MARKER_SIZE + 2),
        );
        if let Some(diffs) = table.differences {
            plot.annotations
                .extend(diffs.iter().map(|d| annotation_for(d, config)));
        }
    }

    if x_lo <= x_hi {
        // Room on the right for the last label.
        plot.x_range = (x_lo - 1.0).min(0.0)..(x_hi + 2.0);
    }
    if let Some(y_range) = value_range_of(&plot.series) {
        plot.y_range = y_range.start.min(0.0)..(y_range.end + config.label_y_offset * 2.0);
    }

    draw_single_plot(output_path, "Percentage difference", plot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_placement_and_colour() {
        let config = ComparisonConfig::default();
        let high = PercentDifference {
            key: 4.0,
            candidate: 0.5,
            reference: 0.4,
            percent: 25.0,
            deviation: Deviation::HighDeviation,
        };
        let a = annotation_for(&high, &config);
        assert!((a.x - 4.1).abs() < 1e-12);
        assert!((a.y - 0.55).abs() < 1e-12);
        assert_eq!(a.text, "25.0%");
        assert_eq!(a.color, COLOR_HIGH_DEVIATION);

        let normal = PercentDifference {
            percent: -2.04,
            deviation: Deviation::Normal,
            ..high
        };
        let b = annotation_for(&normal, &config);
        assert_eq!(b.text, "-2.0%");
        assert_eq!(b.color, COLOR_NORMAL_DEVIATION);
    }
}
