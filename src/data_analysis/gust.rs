// src/data_analysis/gust.rs

use std::f64::consts::PI;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GUST_FREQUENCY_HZ, DEFAULT_NEGATIVE_PEAK, DEFAULT_POSITIVE_PEAK, DEFAULT_SAMPLING_RATE,
};
use crate::error::AnalysisError;
use crate::types::SeriesPoints;

/// Peaks and frequency of a synthetic sinusoidal gust.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GustParameters {
    pub positive_peak: f64,
    pub negative_peak: f64,
    pub frequency_hz: f64,
    /// Samples per second when the waveform is sampled.
    pub sampling_rate: f64,
}

impl Default for GustParameters {
    fn default() -> Self {
        Self {
            positive_peak: DEFAULT_POSITIVE_PEAK,
            negative_peak: DEFAULT_NEGATIVE_PEAK,
            frequency_hz: DEFAULT_GUST_FREQUENCY_HZ,
            sampling_rate: DEFAULT_SAMPLING_RATE,
        }
    }
}

/// `y(t) = A sin(2πft + φ) + offset`, phase chosen so that `y(0) = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GustWaveform {
    pub amplitude: f64,
    pub offset: f64,
    pub phase: f64,
    pub frequency_hz: f64,
}

impl GustWaveform {
    pub fn new(params: &GustParameters) -> Result<Self, AnalysisError> {
        let invalid = |reason: String| AnalysisError::InvalidWaveformParameters { reason };
        let GustParameters {
            positive_peak,
            negative_peak,
            frequency_hz,
            ..
        } = *params;

        if !(positive_peak.is_finite() && negative_peak.is_finite() && frequency_hz.is_finite()) {
            return Err(invalid("peaks and frequency must be finite".to_string()));
        }
        if frequency_hz <= 0.0 {
            return Err(invalid(format!("frequency must be positive, got {frequency_hz}")));
        }

        let amplitude = (positive_peak - negative_peak) / 2.0;
        if amplitude <= 0.0 {
            return Err(invalid(format!(
                "positive peak {positive_peak} must exceed negative peak {negative_peak}"
            )));
        }
        let offset = (positive_peak + negative_peak) / 2.0;
        let ratio = -offset / amplitude;
        if ratio.abs() > 1.0 {
            return Err(invalid(format!(
                "|offset / amplitude| = {} is outside the arcsin domain",
                ratio.abs()
            )));
        }

        Ok(Self {
            amplitude,
            offset,
            phase: ratio.asin(),
            frequency_hz,
        })
    }

    pub fn period(&self) -> f64 {
        1.0 / self.frequency_hz
    }

    pub fn value_at(&self, t: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency_hz * t + self.phase).sin() + self.offset
    }

    /// Zero-mean reference `A sin(2πft)` without phase or offset.
    pub fn unshifted_value_at(&self, t: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency_hz * t).sin()
    }

    /// Sample one period at `sampling_rate`, endpoint excluded.
    pub fn sample_times(&self, sampling_rate: f64) -> Array1<f64> {
        let period = self.period();
        let n = (sampling_rate * period) as usize;
        Array1::from_iter((0..n).map(|i| i as f64 * period / n as f64))
    }

    /// `(t/T, y)` over one period plus the unshifted reference curve.
    pub fn sample_normalized(&self, sampling_rate: f64) -> (SeriesPoints, SeriesPoints) {
        let period = self.period();
        let t = self.sample_times(sampling_rate);
        let shifted = t.iter().map(|&ti| (ti / period, self.value_at(ti))).collect();
        let reference = t
            .iter()
            .map(|&ti| (ti / period, self.unshifted_value_at(ti)))
            .collect();
        (shifted, reference)
    }

    /// Legend text describing the reconstructed waveform.
    pub fn describe(&self) -> String {
        format!(
            "Reconstructed: {:.4} sin(wt + {:.6}) {:+.4}",
            self.amplitude, self.phase, self.offset
        )
    }
}

/// Parameters for the oscillating vs. travelling wave demonstration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TravellingWaveParameters {
    pub positive_peak: f64,
    pub negative_peak: f64,
    pub frequency_hz: f64,
    pub wavelength: f64,
    pub duration: f64,
    pub sampling_rate: f64,
}

impl Default for TravellingWaveParameters {
    fn default() -> Self {
        Self {
            positive_peak: DEFAULT_POSITIVE_PEAK,
            negative_peak: -0.12,
            frequency_hz: DEFAULT_GUST_FREQUENCY_HZ,
            wavelength: 1.0,
            duration: 1.0,
            sampling_rate: DEFAULT_SAMPLING_RATE,
        }
    }
}

impl TravellingWaveParameters {
    fn amplitude_offset(&self) -> (f64, f64) {
        (
            (self.positive_peak - self.negative_peak) / 2.0,
            (self.positive_peak + self.negative_peak) / 2.0,
        )
    }

    /// `A sin(2πft) + offset` over `duration`, endpoint excluded.
    pub fn oscillating(&self) -> SeriesPoints {
        let (amplitude, offset) = self.amplitude_offset();
        let n = (self.sampling_rate * self.duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f64 * self.duration / n as f64;
                (t, amplitude * (2.0 * PI * self.frequency_hz * t).sin() + offset)
            })
            .collect()
    }

    /// Snapshot `A sin(2πft - kx) + offset` over two wavelengths at time `t`.
    pub fn travelling_snapshot(&self, t: f64, points: usize) -> SeriesPoints {
        let (amplitude, offset) = self.amplitude_offset();
        let k = 2.0 * PI / self.wavelength;
        Array1::linspace(0.0, 2.0 * self.wavelength, points)
            .iter()
            .map(|&x| (x, amplitude * (2.0 * PI * self.frequency_hz * t - k * x).sin() + offset))
            .collect()
    }
}

/// Freestream-convected gust pair `A sin(ωt + k y)` and `A(1 - cos(ωt + k y))`,
/// with the probe carried along `(U cos α, U sin α)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpatialGustParameters {
    pub freestream_velocity: f64,
    pub angle_deg: f64,
    pub amplitude: f64,
    pub period: f64,
    pub wavenumber: f64,
    pub duration: f64,
    pub points: usize,
}

impl Default for SpatialGustParameters {
    fn default() -> Self {
        Self {
            freestream_velocity: 20.0,
            angle_deg: 10.0,
            amplitude: 2.0,
            period: 0.5,
            wavenumber: 1.0,
            duration: 2.0,
            points: 1000,
        }
    }
}

impl SpatialGustParameters {
    /// Returns `(x, sine gust)` and `(x, one-minus-cosine gust)` curves.
    pub fn curves(&self) -> (SeriesPoints, SeriesPoints) {
        let angle = self.angle_deg.to_radians();
        let ux = self.freestream_velocity * angle.cos();
        let uy = self.freestream_velocity * angle.sin();
        let omega = 2.0 * PI / self.period;

        let t = Array1::linspace(0.0, self.duration, self.points);
        let mut sine = Vec::with_capacity(self.points);
        let mut one_minus_cos = Vec::with_capacity(self.points);
        for &ti in t.iter() {
            let x = ux * ti;
            let arg = omega * ti + self.wavenumber * uy * ti;
            sine.push((x, self.amplitude * arg.sin()));
            one_minus_cos.push((x, self.amplitude * (1.0 - arg.cos())));
        }
        (sine, one_minus_cos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_gust_hits_peaks_and_starts_at_zero() {
        let wave = GustWaveform::new(&GustParameters::default()).unwrap();
        assert_abs_diff_eq!(wave.value_at(0.0), 0.0, epsilon = 1e-12);

        let (shifted, _) = wave.sample_normalized(100_000.0);
        let max = shifted.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let min = shifted.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(max, 0.085, epsilon = 1e-6);
        assert_abs_diff_eq!(min, -0.11, epsilon = 1e-6);
    }

    #[test]
    fn test_sampling_excludes_endpoint() {
        let wave = GustWaveform::new(&GustParameters::default()).unwrap();
        let t = wave.sample_times(1000.0);
        assert_eq!(t.len(), 500);
        assert_eq!(t[0], 0.0);
        assert!(t[t.len() - 1] < wave.period());

        let (shifted, reference) = wave.sample_normalized(1000.0);
        assert_eq!(shifted.len(), reference.len());
        assert!(shifted.last().unwrap().0 < 1.0);
    }

    #[test]
    fn test_invalid_parameters() {
        // offset outside amplitude: both peaks positive and far apart from zero
        let params = GustParameters {
            positive_peak: 0.5,
            negative_peak: 0.2,
            ..Default::default()
        };
        assert!(matches!(
            GustWaveform::new(&params),
            Err(AnalysisError::InvalidWaveformParameters { .. })
        ));

        let inverted = GustParameters {
            positive_peak: -0.1,
            negative_peak: 0.1,
            ..Default::default()
        };
        assert!(GustWaveform::new(&inverted).is_err());

        let no_freq = GustParameters {
            frequency_hz: 0.0,
            ..Default::default()
        };
        assert!(GustWaveform::new(&no_freq).is_err());
    }

    #[test]
    fn test_boundary_offset_is_allowed() {
        // Negative peak at zero: |offset / A| == 1
        let params = GustParameters {
            positive_peak: 0.2,
            negative_peak: 0.0,
            ..Default::default()
        };
        let wave = GustWaveform::new(&params).unwrap();
        assert_abs_diff_eq!(wave.value_at(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_travelling_wave_shapes() {
        let params = TravellingWaveParameters::default();
        assert_eq!(params.oscillating().len(), 1000);
        let snap = params.travelling_snapshot(0.0, 500);
        assert_eq!(snap.len(), 500);
        assert_abs_diff_eq!(snap[0].1, -0.0175, epsilon = 1e-12);
        assert_abs_diff_eq!(snap[499].0, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spatial_gust_curves() {
        let (sine, one_minus_cos) = SpatialGustParameters::default().curves();
        assert_eq!(sine.len(), 1000);
        assert_eq!(sine[0], (0.0, 0.0));
        assert_eq!(one_minus_cos[0], (0.0, 0.0));
        assert!(one_minus_cos.iter().all(|p| p.1 >= -1e-12 && p.1 <= 4.0 + 1e-12));
    }
}
