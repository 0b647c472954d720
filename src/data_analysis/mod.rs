// src/data_analysis/mod.rs

pub mod gust;
pub mod interpolate;
pub mod normalize;
pub mod parallel_scaling;
pub mod percent_diff;
pub mod time_average;

// src/data_analysis/mod.rs
