// src/plot_framework.rs

use plotters::backend::{BitMapBackend, DrawingBackend, SVGBackend};
use plotters::chart::{ChartBuilder, ChartContext, SeriesLabelPosition};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Polygon, Text};
use plotters::prelude::Cartesian2d;
use plotters::series::{DashedLineSeries, LineSeries};
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor, ShapeStyle};

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::constants::{
    COLOR_GREY, COLOR_LEGEND_BACKGROUND, LINE_WIDTH_LEGEND, LINE_WIDTH_PLOT, LINE_WIDTH_THIN,
    PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::font_config::{
    FONT_TUPLE_ANNOTATION, FONT_TUPLE_AXIS_LABEL, FONT_TUPLE_CHART_TITLE, FONT_TUPLE_LEGEND,
    FONT_TUPLE_MAIN_TITLE, FONT_TUPLE_MESSAGE,
};
use crate::series_style::{LineStyle, SeriesStyle};
use crate::types::PlotResult;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Padded range over the finite y values of every series, or `None` if there are none.
pub fn value_range_of(series: &[PlotSeries]) -> Option<Range<f64>> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(_, y) in series.iter().flat_map(|s| s.data.iter()) {
        if y.is_finite() {
            lo = lo.min(y);
            hi = hi.max(y);
        }
    }
    if lo > hi {
        return None;
    }
    let (min, max) = calculate_range(lo, hi);
    Some(min..max)
}

/// Tick label for an axis value; precision follows the visible span.
pub fn format_axis_value(value: f64, span: f64) -> String {
    let span = span.abs();
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 10_000.0 {
        format!("{:.0}k", value / 1000.0)
    } else if span >= 10.0 {
        format!("{value:.0}")
    } else if span >= 1.0 {
        format!("{value:.1}")
    } else if span >= 0.1 {
        format!("{value:.2}")
    } else {
        format!("{value:.3}")
    }
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    plot_type: &str,
    reason: &str,
) -> PlotResult
where
    DB::ErrorType: 'static,
{
    // Approximate character width relative to font size
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{plot_type} Data Unavailable:\n{reason}");

    let (family, font_size) = FONT_TUPLE_MESSAGE;
    let estimated_char_width = (font_size as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = font_size + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;

    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let mut y = height as i32 / 2 - (lines.len() as i32 * estimated_line_height) / 2;
    for line in lines {
        let text_style = (family, font_size).into_font().color(&RED);
        area.draw(&Text::new(line.to_string(), (center_x, y), text_style))?;
        y += estimated_line_height;
    }
    Ok(())
}

/// One polyline (optionally with hollow circle markers) on a chart.
#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
    pub line: LineStyle,
    pub alpha: f64,
    /// Marker radius in pixels; `None` draws the line only.
    pub marker: Option<u32>,
}

impl PlotSeries {
    pub fn new(data: Vec<(f64, f64)>, label: impl Into<String>, color: RGBColor) -> Self {
        Self {
            data,
            label: label.into(),
            color,
            stroke_width: LINE_WIDTH_PLOT,
            line: LineStyle::Solid,
            alpha: 1.0,
            marker: None,
        }
    }

    pub fn styled(data: Vec<(f64, f64)>, label: impl Into<String>, style: SeriesStyle) -> Self {
        Self {
            line: style.line,
            alpha: style.alpha,
            ..Self::new(data, label, style.color)
        }
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_width(mut self, stroke_width: u32) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn with_marker(mut self, radius: u32) -> Self {
        self.marker = Some(radius);
        self
    }

    fn shape_style(&self, width: u32) -> ShapeStyle {
        self.color.mix(self.alpha).stroke_width(width)
    }
}

/// Full-height vertical marker with optional text beside it.
#[derive(Clone)]
pub struct VerticalLine {
    pub x: f64,
    pub text: Option<String>,
    pub color: RGBColor,
    pub line: LineStyle,
    /// Text position relative to `(x, y_range.end)` in data units.
    pub text_offset: (f64, f64),
}

/// Full-width horizontal reference line, shown in the legend.
#[derive(Clone)]
pub struct HorizontalLine {
    pub y: f64,
    pub label: String,
    pub color: RGBColor,
    pub line: LineStyle,
}

/// Legend corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    UpperRight,
    UpperLeft,
    LowerRight,
    LowerLeft,
}

impl LegendPosition {
    fn to_series_label_position(self) -> SeriesLabelPosition {
        match self {
            LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
            LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
            LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        }
    }
}

/// Free text at a data coordinate.
#[derive(Clone)]
pub struct TextAnnotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: RGBColor,
}

/// Filled polygon drawn underneath the series.
#[derive(Clone)]
pub struct FillBand {
    pub outline: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub opacity: f64,
    pub label: String,
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
    pub vertical_lines: Vec<VerticalLine>,
    pub horizontal_lines: Vec<HorizontalLine>,
    pub annotations: Vec<TextAnnotation>,
    pub bands: Vec<FillBand>,
    pub legend_position: LegendPosition,
}

impl PlotConfig {
    pub fn new(
        title: impl Into<String>,
        x_range: Range<f64>,
        y_range: Range<f64>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_range,
            y_range,
            series: Vec::new(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            vertical_lines: Vec::new(),
            horizontal_lines: Vec::new(),
            annotations: Vec::new(),
            bands: Vec::new(),
            legend_position: LegendPosition::UpperRight,
        }
    }

    pub fn has_data(&self) -> bool {
        self.series.iter().any(|s| !s.data.is_empty())
    }

    pub fn has_valid_ranges(&self) -> bool {
        self.x_range.end > self.x_range.start && self.y_range.end > self.y_range.start
    }
}

fn draw_styled_path<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    points: Vec<(f64, f64)>,
    line: LineStyle,
    style: ShapeStyle,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    match line.dash_pattern() {
        None => {
            chart.draw_series(LineSeries::new(points, style))?;
        }
        Some((dash, gap)) => {
            chart.draw_series(DashedLineSeries::new(points, dash, gap, style))?;
        }
    }
    Ok(())
}

fn legend_entry(line: LineStyle, style: ShapeStyle) -> impl Fn((i32, i32)) -> PathElement<(i32, i32)> {
    move |(x, y)| {
        // Short gaps hint at the dash pattern inside the legend swatch.
        let points = match line {
            LineStyle::Solid => vec![(x, y), (x + 20, y)],
            _ => vec![(x, y), (x + 8, y)],
        };
        PathElement::new(points, style)
    }
}

/// Draws one chart with every decoration of `plot_config` onto `area`.
pub fn draw_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    plot_config: &PlotConfig,
) -> PlotResult
where
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, FONT_TUPLE_CHART_TITLE)
        .margin(10)
        .x_label_area_size(55)
        .y_label_area_size(70)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    let x_span = plot_config.x_range.end - plot_config.x_range.start;
    let y_span = plot_config.y_range.end - plot_config.y_range.start;
    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(15)
        .y_labels(10)
        .x_label_formatter(&|x| format_axis_value(*x, x_span))
        .y_label_formatter(&|y| format_axis_value(*y, y_span))
        .light_line_style(WHITE.mix(0.7))
        .bold_line_style(COLOR_GREY.mix(0.3))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .axis_desc_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    let mut legend_series_count = 0;

    // Bands first so lines stay on top.
    for band in &plot_config.bands {
        if band.outline.len() < 3 {
            continue;
        }
        let fill = band.color.mix(band.opacity).filled();
        let drawn = chart.draw_series(std::iter::once(Polygon::new(band.outline.clone(), fill)))?;
        if !band.label.is_empty() {
            drawn
                .label(&band.label)
                .legend(move |(x, y)| {
                    Polygon::new(vec![(x, y - 5), (x + 20, y - 5), (x + 20, y + 5), (x, y + 5)], fill)
                });
            legend_series_count += 1;
        }
    }

    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let line_style = s.shape_style(s.stroke_width);
        draw_styled_path(&mut chart, s.data.clone(), s.line, line_style)?;
        if let Some(radius) = s.marker {
            let marker_style = s.color.mix(s.alpha.max(0.6)).stroke_width(LINE_WIDTH_THIN);
            chart.draw_series(
                s.data
                    .iter()
                    .filter(|p| p.0.is_finite() && p.1.is_finite())
                    .map(|&p| Circle::new(p, radius, marker_style)),
            )?;
        }
        if !s.label.is_empty() {
            // Invisible anchor carrying the legend entry.
            let legend_style = s.shape_style(LINE_WIDTH_LEGEND);
            chart
                .draw_series(std::iter::once(PathElement::new(
                    Vec::<(f64, f64)>::new(),
                    legend_style,
                )))?
                .label(&s.label)
                .legend(legend_entry(s.line, legend_style));
            legend_series_count += 1;
        }
    }

    for h in &plot_config.horizontal_lines {
        let style = h.color.stroke_width(LINE_WIDTH_THIN + 1);
        draw_styled_path(
            &mut chart,
            vec![(plot_config.x_range.start, h.y), (plot_config.x_range.end, h.y)],
            h.line,
            style,
        )?;
        if !h.label.is_empty() {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    Vec::<(f64, f64)>::new(),
                    style,
                )))?
                .label(&h.label)
                .legend(legend_entry(h.line, style));
            legend_series_count += 1;
        }
    }

    for v in &plot_config.vertical_lines {
        if !v.x.is_finite() {
            continue; // skip malformed input
        }
        let style = v.color.stroke_width(LINE_WIDTH_THIN + 1);
        draw_styled_path(
            &mut chart,
            vec![(v.x, plot_config.y_range.start), (v.x, plot_config.y_range.end)],
            v.line,
            style,
        )?;
        if let Some(text) = &v.text {
            let (dx, dy) = v.text_offset;
            let font = FONT_TUPLE_ANNOTATION.into_font().color(&v.color);
            chart.draw_series(std::iter::once(Text::new(
                text.clone(),
                (v.x + dx, plot_config.y_range.end - dy),
                font,
            )))?;
        }
    }

    for note in &plot_config.annotations {
        if !(note.x.is_finite() && note.y.is_finite()) {
            continue;
        }
        let font = FONT_TUPLE_ANNOTATION.into_font().color(&note.color);
        chart.draw_series(std::iter::once(Text::new(
            note.text.clone(),
            (note.x, note.y),
            font,
        )))?;
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(plot_config.legend_position.to_series_label_position())
            .background_style(COLOR_LEGEND_BACKGROUND.mix(0.8))
            .border_style(BLACK)
            .label_font(FONT_TUPLE_LEGEND)
            .draw()?;
    }

    Ok(())
}

/// Title band plus a grid of charts; returns whether any chart was drawn.
fn draw_panels<DB, F>(
    root_area: &DrawingArea<DB, Shift>,
    figure_title: &str,
    plot_type_name: &str,
    layout: (usize, usize),
    get_panel: &mut F,
) -> Result<bool, Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    F: FnMut(usize) -> Option<PlotConfig>,
{
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        figure_title.to_string(),
        (10, 10),
        FONT_TUPLE_MAIN_TITLE.into_font().color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly(layout);
    let mut any_panel_plotted = false;

    for (panel_index, area) in sub_plot_areas.iter().enumerate() {
        match get_panel(panel_index) {
            Some(plot_config) => {
                let has_data = plot_config.has_data();
                if has_data && plot_config.has_valid_ranges() {
                    draw_chart(area, &plot_config)?;
                    any_panel_plotted = true;
                } else {
                    let reason = if !has_data {
                        "No data points"
                    } else {
                        "Invalid ranges"
                    };
                    draw_unavailable_message(area, plot_type_name, reason)?;
                }
            }
            None => {
                draw_unavailable_message(area, plot_type_name, "Calculation/Data Extraction Failed")?;
            }
        }
    }
    Ok(any_panel_plotted)
}

/// Whether `path` asks for vector output.
pub fn is_vector_output(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Render a `layout.0` x `layout.1` grid of charts to `output_path`.
///
/// `.svg` paths are written as vector graphics, anything else as PNG. Panels
/// for which `get_panel` returns `None` (or that have no data) show a
/// placeholder message instead.
pub fn draw_figure<F>(
    output_path: &Path,
    figure_title: &str,
    plot_type_name: &str,
    layout: (usize, usize),
    size: (u32, u32),
    mut get_panel: F,
) -> PlotResult
where
    F: FnMut(usize) -> Option<PlotConfig>,
{
    let any_panel_plotted = if is_vector_output(output_path) {
        let root_area = SVGBackend::new(output_path, size).into_drawing_area();
        let drawn = draw_panels(&root_area, figure_title, plot_type_name, layout, &mut get_panel)?;
        root_area.present()?;
        drawn
    } else {
        let root_area = BitMapBackend::new(output_path, size).into_drawing_area();
        let drawn = draw_panels(&root_area, figure_title, plot_type_name, layout, &mut get_panel)?;
        root_area.present()?;
        drawn
    };

    if any_panel_plotted {
        println!("  Plot saved as '{}'.", output_path.display());
    } else {
        println!(
            "  '{}' saved with placeholder messages only: no data available to plot.",
            output_path.display()
        );
    }
    Ok(())
}

/// Single-chart figure at the default 16:9 size.
pub fn draw_single_plot(output_path: &Path, plot_type_name: &str, plot_config: PlotConfig) -> PlotResult {
    let mut config = Some(plot_config);
    draw_figure(
        output_path,
        "",
        plot_type_name,
        (1, 1),
        (PLOT_WIDTH, PLOT_HEIGHT),
        move |_| config.take(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_range_pads() {
        let (lo, hi) = calculate_range(0.0, 1.0);
        assert!((lo + 0.15).abs() < 1e-12);
        assert!((hi - 1.15).abs() < 1e-12);
        assert_eq!(calculate_range(2.0, 2.0), (1.5, 2.5));
        assert_eq!(calculate_range(1.0, 0.0), calculate_range(0.0, 1.0));
    }

    #[test]
    fn test_value_range_ignores_non_finite() {
        let series = vec![PlotSeries::new(
            vec![(0.0, 1.0), (1.0, f64::NAN), (2.0, 3.0)],
            "a",
            BLACK,
        )];
        let r = value_range_of(&series).unwrap();
        assert!(r.start < 1.0 && r.end > 3.0);
        assert!(value_range_of(&[]).is_none());
    }

    #[test]
    fn test_series_builders() {
        let s = PlotSeries::new(vec![(0.0, 1.0)], "exp", RED)
            .with_line(LineStyle::Dotted)
            .with_marker(6)
            .with_alpha(0.4);
        assert_eq!(s.marker, Some(6));
        assert_eq!(s.line, LineStyle::Dotted);
        assert_eq!(s.stroke_width, LINE_WIDTH_PLOT);

        let styled = PlotSeries::styled(vec![], "run", SeriesStyle::cyclic(1));
        assert_eq!(styled.marker, None);
        assert_eq!(styled.alpha, SeriesStyle::cyclic(1).alpha);
    }

    #[test]
    fn test_vector_output_by_extension() {
        assert!(is_vector_output(Path::new("out/figure.svg")));
        assert!(is_vector_output(Path::new("FIG.SVG")));
        assert!(!is_vector_output(Path::new("figure.png")));
        assert!(!is_vector_output(Path::new("figure")));
    }

    #[test]
    fn test_plot_config_checks() {
        let mut config = PlotConfig::new("t", 0.0..1.0, 0.0..1.0, "x", "y");
        assert!(!config.has_data());
        config.series.push(PlotSeries::new(vec![(0.0, 0.5)], "s", RED));
        assert!(config.has_data());
        assert!(config.has_valid_ranges());
        config.y_range = 1.0..1.0;
        assert!(!config.has_valid_ranges());
    }
}

// src/plot_framework.rs
