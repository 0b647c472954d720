// src/data_analysis/interpolate.rs

use ndarray::Array1;

use crate::data_input::time_series::TimeSeries;

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be ascending. Outside `[xp[0], xp[last]]` the end values are
/// returned unchanged. Returns `None` for empty input.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> Option<f64> {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return None;
    }
    if x <= xp[0] {
        return Some(fp[0]);
    }
    if x >= xp[n - 1] {
        return Some(fp[n - 1]);
    }
    // First index with xp[i] > x; guaranteed 1..n by the bounds checks above.
    let hi = xp[..n].partition_point(|&v| v <= x);
    let lo = hi - 1;
    let dx = xp[hi] - xp[lo];
    if dx == 0.0 {
        return Some(fp[hi]);
    }
    let frac = (x - xp[lo]) / dx;
    Some(fp[lo] + frac * (fp[hi] - fp[lo]))
}

/// Interpolate `series` onto every point of `grid`.
pub fn interp_series(series: &TimeSeries, grid: &Array1<f64>) -> Option<Array1<f64>> {
    let mut points = series.points.clone();
    points.retain(|p| p.0.is_finite() && p.1.is_finite());
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    let xp: Vec<f64> = points.iter().map(|p| p.0).collect();
    let fp: Vec<f64> = points.iter().map(|p| p.1).collect();

    if xp.is_empty() {
        return None;
    }
    Some(grid.mapv(|x| interp(x, &xp, &fp).unwrap_or(f64::NAN)))
}

/// Evenly spaced grid of `points` samples over the time range both series
/// cover. `None` when they do not overlap.
pub fn common_grid(a: &TimeSeries, b: &TimeSeries, points: usize) -> Option<Array1<f64>> {
    let (a_min, a_max) = a.time_range()?;
    let (b_min, b_max) = b.time_range()?;
    let lo = a_min.max(b_min);
    let hi = a_max.min(b_max);
    if hi <= lo || points < 2 {
        return None;
    }
    Some(Array1::linspace(lo, hi, points))
}

/// Lower/upper envelope between two series on a shared grid.
#[derive(Debug, Clone, PartialEq)]
pub struct VariationBand {
    pub grid: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
}

impl VariationBand {
    pub fn between(a: &TimeSeries, b: &TimeSeries, points: usize) -> Option<Self> {
        let grid = common_grid(a, b, points)?;
        let ya = interp_series(a, &grid)?;
        let yb = interp_series(b, &grid)?;
        let lower = ndarray::Zip::from(&ya).and(&yb).map_collect(|&p, &q| p.min(q));
        let upper = ndarray::Zip::from(&ya).and(&yb).map_collect(|&p, &q| p.max(q));
        Some(Self { grid, lower, upper })
    }

    /// Closed outline: upper edge left to right, then lower edge back.
    pub fn polygon(&self) -> Vec<(f64, f64)> {
        let upper = self.grid.iter().zip(self.upper.iter()).map(|(&x, &y)| (x, y));
        let lower = self
            .grid
            .iter()
            .zip(self.lower.iter())
            .rev()
            .map(|(&x, &y)| (x, y));
        upper.chain(lower).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interp_linear_and_clamped() {
        let xp = [0.0, 1.0, 3.0];
        let fp = [0.0, 10.0, 30.0];
        assert_relative_eq!(interp(0.5, &xp, &fp).unwrap(), 5.0);
        assert_relative_eq!(interp(2.0, &xp, &fp).unwrap(), 20.0);
        assert_eq!(interp(1.0, &xp, &fp), Some(10.0));
        assert_eq!(interp(-4.0, &xp, &fp), Some(0.0));
        assert_eq!(interp(9.0, &xp, &fp), Some(30.0));
        assert_eq!(interp(1.0, &[], &[]), None);
    }

    #[test]
    fn test_common_grid_uses_overlap() {
        let a = TimeSeries::new(vec![(0.0, 0.0), (2.0, 1.0)]);
        let b = TimeSeries::new(vec![(1.0, 0.0), (3.0, 1.0)]);
        let grid = common_grid(&a, &b, 11).unwrap();
        assert_eq!(grid.len(), 11);
        assert_relative_eq!(grid[0], 1.0);
        assert_relative_eq!(grid[10], 2.0);

        let disjoint = TimeSeries::new(vec![(5.0, 0.0), (6.0, 1.0)]);
        assert!(common_grid(&a, &disjoint, 11).is_none());
    }

    #[test]
    fn test_variation_band_orders_edges() {
        let a = TimeSeries::new(vec![(0.0, 1.0), (1.0, -1.0)]);
        let b = TimeSeries::new(vec![(0.0, 0.0), (1.0, 0.0)]);
        let band = VariationBand::between(&a, &b, 5).unwrap();
        for i in 0..5 {
            assert!(band.lower[i] <= band.upper[i]);
        }
        assert_relative_eq!(band.upper[0], 1.0);
        assert_relative_eq!(band.lower[4], -1.0);
        assert_eq!(band.polygon().len(), 10);
    }
}
