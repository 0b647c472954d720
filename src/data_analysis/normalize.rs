// src/data_analysis/normalize.rs

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FREESTREAM_VELOCITY, DEFAULT_TIME_NORMALIZATION};
use crate::data_input::probe_parser::{ProbeData, ProbeSample};
use crate::error::AnalysisError;

/// Fixed per-run scaling applied to every probe dataset:
/// `t' = t / time_normalization + time_offset`,
/// `v' = v / freestream_velocity + axis_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizationParameters {
    pub freestream_velocity: f64,
    pub time_normalization: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
    pub time_offset: f64,
}

impl Default for NormalizationParameters {
    fn default() -> Self {
        Self {
            freestream_velocity: DEFAULT_FREESTREAM_VELOCITY,
            time_normalization: DEFAULT_TIME_NORMALIZATION,
            x_offset: 0.0,
            y_offset: 0.0,
            z_offset: 0.0,
            time_offset: 0.0,
        }
    }
}

impl NormalizationParameters {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, value) in [
            ("freestream_velocity", self.freestream_velocity),
            ("time_normalization", self.time_normalization),
        ] {
            if !value.is_finite() || value == 0.0 {
                return Err(AnalysisError::Config(format!(
                    "{name} must be finite and non-zero, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn offsets(&self) -> [f64; 3] {
        [self.x_offset, self.y_offset, self.z_offset]
    }

    pub fn time(&self, t: f64) -> f64 {
        t / self.time_normalization + self.time_offset
    }

    pub fn velocity(&self, v: f64, axis: usize) -> f64 {
        v / self.freestream_velocity + self.offsets()[axis]
    }

    pub fn apply(&self, probe: &ProbeData) -> ProbeData {
        ProbeData {
            name: probe.name.clone(),
            samples: probe
                .samples
                .iter()
                .map(|s| ProbeSample {
                    time: self.time(s.time),
                    velocity: [
                        self.velocity(s.velocity[0], 0),
                        self.velocity(s.velocity[1], 1),
                        self.velocity(s.velocity[2], 2),
                    ],
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_apply_normalizes_and_offsets() {
        let params = NormalizationParameters {
            freestream_velocity: 20.0,
            time_normalization: 0.5,
            x_offset: -1.0,
            y_offset: 0.0,
            z_offset: 0.01,
            time_offset: 0.25,
        };
        let probe = ProbeData {
            name: "U1".to_string(),
            samples: vec![ProbeSample { time: 1.0, velocity: [20.0, 2.0, -1.0] }],
        };
        let out = params.apply(&probe);
        let s = out.samples[0];
        assert_relative_eq!(s.time, 2.25);
        assert_relative_eq!(s.velocity[0], 0.0);
        assert_relative_eq!(s.velocity[1], 0.1);
        assert_relative_eq!(s.velocity[2], -0.04);
        assert_eq!(out.name, "U1");
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let params = NormalizationParameters {
            freestream_velocity: 0.0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(AnalysisError::Config(_))));
        assert!(NormalizationParameters::default().validate().is_ok());
    }
}
