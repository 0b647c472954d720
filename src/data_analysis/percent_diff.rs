// src/data_analysis/percent_diff.rs

use std::collections::HashMap;

use crate::data_input::time_series::TimeSeries;
use crate::error::AnalysisError;

/// Two-bucket classification used to colour percentage labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deviation {
    Normal,
    HighDeviation,
}

impl Deviation {
    pub fn classify(percent: f64, threshold: f64) -> Self {
        if percent.abs() > threshold {
            Deviation::HighDeviation
        } else {
            Deviation::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentDifference {
    pub key: f64,
    pub candidate: f64,
    pub reference: f64,
    pub percent: f64,
    pub deviation: Deviation,
}

// -0.0 and 0.0 compare equal, so fold them onto one hash key.
fn key_bits(key: f64) -> u64 {
    (key + 0.0).to_bits()
}

/// Index a series by key, rejecting repeated keys.
fn unique_index(series: &TimeSeries, name: &str) -> Result<HashMap<u64, f64>, AnalysisError> {
    let mut index = HashMap::with_capacity(series.len());
    for &(key, value) in &series.points {
        if key.is_nan() {
            continue;
        }
        if index.insert(key_bits(key), value).is_some() {
            return Err(AnalysisError::DuplicateTimeKey {
                dataset: name.to_string(),
                key,
            });
        }
    }
    Ok(index)
}

/// Percentage difference of `candidate` against `reference` at every key
/// present in both (exact match, no interpolation), in candidate order:
/// `(candidate - reference) / reference * 100`.
///
/// Both series must have unique keys. A zero reference value at a shared key
/// is an error rather than an infinite percentage.
pub fn percent_differences(
    candidate: &TimeSeries,
    candidate_name: &str,
    reference: &TimeSeries,
    reference_name: &str,
    threshold: f64,
) -> Result<Vec<PercentDifference>, AnalysisError> {
    let reference_index = unique_index(reference, reference_name)?;
    // Validates uniqueness on the candidate side as well.
    unique_index(candidate, candidate_name)?;

    let mut out = Vec::new();
    for &(key, value) in &candidate.points {
        if key.is_nan() {
            continue;
        }
        let Some(&ref_value) = reference_index.get(&key_bits(key)) else {
            continue;
        };
        if ref_value == 0.0 {
            return Err(AnalysisError::ZeroReference { key });
        }
        let percent = (value - ref_value) / ref_value * 100.0;
        out.push(PercentDifference {
            key,
            candidate: value,
            reference: ref_value,
            percent,
            deviation: Deviation::classify(percent, threshold),
        });
    }

    log::debug!(
        "{} shared keys between '{}' and reference '{}'",
        out.len(),
        candidate_name,
        reference_name
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(points: &[(f64, f64)]) -> TimeSeries {
        TimeSeries::new(points.to_vec())
    }

    #[test]
    fn test_self_comparison_is_zero() {
        let s = series(&[(0.0, 0.1), (4.0, 0.5), (8.0, 0.9)]);
        let diffs = percent_differences(&s, "a", &s, "a", 10.0).unwrap();
        assert_eq!(diffs.len(), 3);
        assert!(diffs.iter().all(|d| d.percent == 0.0 && d.deviation == Deviation::Normal));
    }

    #[test]
    fn test_intersection_only() {
        let reference = series(&[(0.0, 1.0), (2.0, 2.0), (4.0, 4.0)]);
        let candidate = series(&[(2.0, 2.5), (3.0, 9.0), (4.0, 4.2)]);
        let diffs = percent_differences(&candidate, "c", &reference, "r", 10.0).unwrap();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].key, 2.0);
        assert_relative_eq!(diffs[0].percent, 25.0);
        assert_eq!(diffs[0].deviation, Deviation::HighDeviation);
        assert_relative_eq!(diffs[1].percent, 5.0, epsilon = 1e-9);
        assert_eq!(diffs[1].deviation, Deviation::Normal);
    }

    #[test]
    fn test_negative_deviation_is_high_by_magnitude() {
        assert_eq!(Deviation::classify(-12.0, 10.0), Deviation::HighDeviation);
        assert_eq!(Deviation::classify(10.0, 10.0), Deviation::Normal);
        assert_eq!(Deviation::classify(4.0, 3.0), Deviation::HighDeviation);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let reference = series(&[(0.0, 1.0), (0.0, 1.1)]);
        let candidate = series(&[(0.0, 1.0)]);
        match percent_differences(&candidate, "c", &reference, "ref", 10.0) {
            Err(AnalysisError::DuplicateTimeKey { dataset, key }) => {
                assert_eq!(dataset, "ref");
                assert_eq!(key, 0.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            percent_differences(&reference, "dup", &candidate, "c", 10.0),
            Err(AnalysisError::DuplicateTimeKey { .. })
        ));
    }

    #[test]
    fn test_zero_reference_rejected() {
        let reference = series(&[(1.0, 0.0)]);
        let candidate = series(&[(1.0, 0.3)]);
        assert!(matches!(
            percent_differences(&candidate, "c", &reference, "r", 10.0),
            Err(AnalysisError::ZeroReference { key }) if key == 1.0
        ));
    }
}
