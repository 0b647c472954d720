// src/data_analysis/parallel_scaling.rs

use crate::error::AnalysisError;

/// Speedup and efficiency at one CPU count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPoint {
    pub cpus: u32,
    pub wall_time: f64,
    pub speedup: f64,
    pub efficiency: f64,
}

/// `S_i = t_0 / t_i`, `E_i = S_i / n_i`, relative to the first entry.
pub fn compute_scaling(cpus: &[u32], wall_times: &[f64]) -> Result<Vec<ScalingPoint>, AnalysisError> {
    let invalid = |reason: String| AnalysisError::InvalidScalingData { reason };

    if cpus.len() != wall_times.len() {
        return Err(invalid(format!(
            "{} CPU counts but {} wall times",
            cpus.len(),
            wall_times.len()
        )));
    }
    let Some(&base_time) = wall_times.first() else {
        return Err(invalid("no scaling data".to_string()));
    };
    if let Some(n) = cpus.iter().find(|&&n| n == 0) {
        return Err(invalid(format!("CPU count must be positive, got {n}")));
    }
    if let Some(t) = wall_times.iter().find(|&&t| !(t.is_finite() && t > 0.0)) {
        return Err(invalid(format!("wall time must be positive, got {t}")));
    }

    Ok(cpus
        .iter()
        .zip(wall_times)
        .map(|(&n, &t)| {
            let speedup = base_time / t;
            ScalingPoint {
                cpus: n,
                wall_time: t,
                speedup,
                efficiency: speedup / f64::from(n),
            }
        })
        .collect())
}
