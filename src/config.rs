// src/config.rs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DEVIATION_THRESHOLD_PERCENT, DEFAULT_SCALING_CPUS, DEFAULT_SCALING_TIMES_S,
    DEFAULT_TIME_MAX, DEFAULT_TIME_MIN, DEFAULT_VARIATION_LOWER, DEFAULT_VARIATION_UPPER,
};
use crate::data_analysis::gust::{GustParameters, SpatialGustParameters, TravellingWaveParameters};
use crate::data_analysis::normalize::NormalizationParameters;
use crate::error::AnalysisError;
use crate::series_style::StyleRules;

/// Every tunable of one invocation. Built once in `main` and passed down.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub window: TimeWindow,
    pub normalization: NormalizationParameters,
    pub waveform: GustParameters,
    pub comparison: ComparisonConfig,
    pub styles: StyleRules,
    pub indicators: IndicatorConfig,
    pub scaling: ScalingConfig,
    pub gust_plot: GustPlotConfig,
    pub waves: WavesConfig,
}

/// Inclusive `[time_min, time_max]` used for averaging.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeWindow {
    pub time_min: f64,
    pub time_max: f64,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            time_min: DEFAULT_TIME_MIN,
            time_max: DEFAULT_TIME_MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Dataset name to difference against; first file in sorted order when unset.
    pub reference: Option<String>,
    pub threshold_percent: f64,
    pub label_x_offset: f64,
    pub label_y_offset: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            reference: None,
            threshold_percent: DEFAULT_DEVIATION_THRESHOLD_PERCENT,
            label_x_offset: crate::constants::PERCENT_LABEL_X_OFFSET,
            label_y_offset: crate::constants::PERCENT_LABEL_Y_OFFSET,
        }
    }
}

/// One vertical marker, e.g. a CFL change.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IndicatorLine {
    pub label: String,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub show: bool,
    pub lines: Vec<IndicatorLine>,
    pub text_xoffset: f64,
    pub text_yoffset: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            show: true,
            lines: Vec::new(),
            text_xoffset: 0.1,
            text_yoffset: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScalingConfig {
    pub cpus: Vec<u32>,
    pub wall_times: Vec<f64>,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            cpus: DEFAULT_SCALING_CPUS.to_vec(),
            wall_times: DEFAULT_SCALING_TIMES_S.to_vec(),
        }
    }
}

/// Experiment datasets bounding the shaded variation band of the gust plot.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GustPlotConfig {
    pub variation_lower: String,
    pub variation_upper: String,
    pub show_variation: bool,
}

impl Default for GustPlotConfig {
    fn default() -> Self {
        Self {
            variation_lower: DEFAULT_VARIATION_LOWER.to_string(),
            variation_upper: DEFAULT_VARIATION_UPPER.to_string(),
            show_variation: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WavesConfig {
    pub travelling: TravellingWaveParameters,
    pub spatial: SpatialGustParameters,
}

impl RunConfig {
    /// Read a TOML file; absent sections take their defaults.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)
            .map_err(|e| AnalysisError::Config(format!("{}: {e}", path.display())))?;
        log::info!("Loaded configuration from '{}'", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(text).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.window.time_min <= self.window.time_max) {
            return Err(AnalysisError::Config(format!(
                "window.time_min ({}) must not exceed window.time_max ({})",
                self.window.time_min, self.window.time_max
            )));
        }
        self.normalization.validate()?;
        if !(self.comparison.threshold_percent >= 0.0) {
            return Err(AnalysisError::Config(
                "comparison.threshold_percent must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RunConfig::from_toml_str("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.window.time_min, 1.58);
        assert_eq!(config.normalization.freestream_velocity, 20.0);
        assert_eq!(config.scaling.cpus, vec![1, 300, 600, 900, 1200]);
        assert_eq!(config.gust_plot.variation_upper, "sinwave_exp_2.5c");
    }

    #[test]
    fn test_partial_sections() {
        let text = r#"
            [window]
            time_max = 3.0

            [styles]
            skip = ["omega15"]

            [styles.overrides.omega304]
            style = "-"
            color = "red"
            alpha = 1.0

            [[indicators.lines]]
            label = "0.5"
            x = 0.8
        "#;
        let config = RunConfig::from_toml_str(text).unwrap();
        assert_eq!(config.window.time_min, 1.58);
        assert_eq!(config.window.time_max, 3.0);
        assert_eq!(config.styles.skip, vec!["omega15".to_string()]);
        assert_eq!(
            config.styles.overrides["omega304"].color.as_deref(),
            Some("red")
        );
        assert_eq!(config.indicators.lines.len(), 1);
        assert!(config.indicators.show);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            RunConfig::from_toml_str("[window]\ntime_min = 5.0\ntime_max = 1.0"),
            Err(AnalysisError::Config(_))
        ));
        assert!(RunConfig::from_toml_str("[normalization]\nfreestream_velocity = 0.0").is_err());
        assert!(RunConfig::from_toml_str("window = 3").is_err());
    }
}
