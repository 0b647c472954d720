// src/data_input/time_series.rs

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::Array1;
use ndarray_stats::QuantileExt;

use crate::quantity::Quantity;

/// Ordered `(time, value)` samples of one quantity.
///
/// Times are kept in source order; monotonicity is expected but not enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub points: Vec<(f64, f64)>,
}

impl TimeSeries {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|&(t, _)| t).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }

    /// Samples with `time_min <= t <= time_max`, order preserved.
    pub fn window(&self, time_min: f64, time_max: f64) -> TimeSeries {
        TimeSeries {
            points: self
                .points
                .iter()
                .copied()
                .filter(|&(t, _)| t >= time_min && t <= time_max)
                .collect(),
        }
    }

    /// Smallest and largest finite value, or `None` for an empty/all-NaN series.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        finite_min_max(&self.values())
    }

    pub fn time_range(&self) -> Option<(f64, f64)> {
        finite_min_max(&self.times())
    }
}

fn finite_min_max(data: &[f64]) -> Option<(f64, f64)> {
    let finite: Array1<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let min = *finite.min().ok()?;
    let max = *finite.max().ok()?;
    Some((min, max))
}

/// All series loaded from one file, keyed by column name.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// File stem; legend label and key for style/skip overrides.
    pub name: String,
    pub series: BTreeMap<String, TimeSeries>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            series: BTreeMap::new(),
        }
    }

    /// Name a dataset after the stem of the file it was read from.
    pub fn name_from_path(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn insert(&mut self, column: impl Into<String>, series: TimeSeries) {
        self.series.insert(column.into(), series);
    }

    pub fn column(&self, column: &str) -> Option<&TimeSeries> {
        self.series.get(column)
    }

    pub fn get(&self, quantity: Quantity) -> Option<&TimeSeries> {
        self.column(quantity.column_name())
    }

    /// Largest time value over all series.
    pub fn max_time(&self) -> Option<f64> {
        self.series
            .values()
            .filter_map(|s| s.time_range().map(|(_, hi)| hi))
            .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_inclusive() {
        let ts = TimeSeries::new(vec![(0.0, 1.0), (0.5, 2.0), (1.0, 3.0), (1.5, 4.0)]);
        let w = ts.window(0.5, 1.0);
        assert_eq!(w.points, vec![(0.5, 2.0), (1.0, 3.0)]);
    }

    #[test]
    fn test_min_max_ignores_nan() {
        let ts = TimeSeries::new(vec![(0.0, f64::NAN), (1.0, -2.0), (2.0, 5.0)]);
        assert_eq!(ts.min_max(), Some((-2.0, 5.0)));
        assert_eq!(TimeSeries::default().min_max(), None);
    }

    #[test]
    fn test_dataset_lookup_and_max_time() {
        let mut ds = Dataset::new("omega50");
        ds.insert("Cl", TimeSeries::new(vec![(0.0, 0.1), (2.0, 0.2)]));
        ds.insert("Cd", TimeSeries::new(vec![(0.0, 0.01), (3.0, 0.02)]));
        assert!(ds.get(Quantity::Lift).is_some());
        assert!(ds.get(Quantity::Amplitude).is_none());
        assert_eq!(ds.max_time(), Some(3.0));
    }

    #[test]
    fn test_name_from_path() {
        assert_eq!(Dataset::name_from_path(Path::new("data/omega304.dat")), "omega304");
    }
}
