// src/constants.rs

use plotters::style::RGBColor;

// Figure dimensions (16:9).
pub const PLOT_WIDTH: u32 = 1600;
pub const PLOT_HEIGHT: u32 = 900;

// Stacked two-panel figures (scaling curves, wave demos).
pub const STACKED_PLOT_WIDTH: u32 = 1000;
pub const STACKED_PLOT_HEIGHT: u32 = 1250;

// Font sizes.
pub const FONT_SIZE_MAIN_TITLE: i32 = 28;
pub const FONT_SIZE_CHART_TITLE: i32 = 24;
pub const FONT_SIZE_AXIS_LABEL: i32 = 18;
pub const FONT_SIZE_LEGEND: i32 = 15;
pub const FONT_SIZE_ANNOTATION: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_THIN: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Marker radius in pixels for series drawn with point markers.
pub const MARKER_SIZE: u32 = 4;

// Named colors used by the original figures.
pub const COLOR_CORNFLOWERBLUE: RGBColor = RGBColor(100, 149, 237);
pub const COLOR_LIGHTSTEELBLUE: RGBColor = RGBColor(176, 196, 222);
pub const COLOR_SLATEGREY: RGBColor = RGBColor(112, 128, 144);
pub const COLOR_DARKVIOLET: RGBColor = RGBColor(148, 0, 211);
pub const COLOR_ORANGE: RGBColor = RGBColor(255, 165, 0);
pub const COLOR_GREY: RGBColor = RGBColor(128, 128, 128);
pub const COLOR_INDICATOR: RGBColor = RGBColor(220, 20, 20);
pub const COLOR_HIGH_DEVIATION: RGBColor = RGBColor(214, 39, 40);
pub const COLOR_NORMAL_DEVIATION: RGBColor = RGBColor(44, 160, 44);
pub const COLOR_GENERATED_WAVE: RGBColor = RGBColor(255, 0, 0);
pub const COLOR_REFERENCE_WAVE: RGBColor = RGBColor(0, 0, 0);
pub const COLOR_LEGEND_BACKGROUND: RGBColor = RGBColor(255, 255, 224);

// Default cyclic styling for comparison overlays.
pub const DEFAULT_SERIES_COLORS: [RGBColor; 5] = [
    COLOR_CORNFLOWERBLUE,
    COLOR_LIGHTSTEELBLUE,
    COLOR_SLATEGREY,
    COLOR_DARKVIOLET,
    COLOR_ORANGE,
];
pub const DEFAULT_SERIES_ALPHA: f64 = 0.5;

// Time window for averaging (seconds).
pub const DEFAULT_TIME_MIN: f64 = 1.58;
pub const DEFAULT_TIME_MAX: f64 = 2.33;

// Probe normalization.
pub const DEFAULT_FREESTREAM_VELOCITY: f64 = 20.0; // m/s
pub const DEFAULT_TIME_NORMALIZATION: f64 = 0.5; // oscillation period (s)

// Gust waveform.
pub const DEFAULT_POSITIVE_PEAK: f64 = 0.085;
pub const DEFAULT_NEGATIVE_PEAK: f64 = -0.11;
pub const DEFAULT_GUST_FREQUENCY_HZ: f64 = 2.0;
pub const DEFAULT_SAMPLING_RATE: f64 = 1000.0; // samples per second

// Percentage difference above which a point is flagged.
pub const DEFAULT_DEVIATION_THRESHOLD_PERCENT: f64 = 10.0;
// Annotation offsets for percentage labels (data units).
pub const PERCENT_LABEL_X_OFFSET: f64 = 0.1;
pub const PERCENT_LABEL_Y_OFFSET: f64 = 0.05;

// Points on the common grid used for the experimental variation band.
pub const VARIATION_GRID_POINTS: usize = 1000;
pub const DEFAULT_VARIATION_LOWER: &str = "sinwave_exp_0.5c";
pub const DEFAULT_VARIATION_UPPER: &str = "sinwave_exp_2.5c";

// Parallel scaling defaults (CPUs, wall time in seconds).
pub const DEFAULT_SCALING_CPUS: [u32; 5] = [1, 300, 600, 900, 1200];
pub const DEFAULT_SCALING_TIMES_S: [f64; 5] = [102951.0, 552.0, 329.0, 273.0, 232.0];

// Output file names.
pub const AVERAGE_REPORT_FILE: &str = "output_info.txt";
pub const SHIFTED_DATA_FILE: &str = "shifted_data.txt";

// src/constants.rs
