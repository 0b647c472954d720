// src/plot_functions/mod.rs

pub mod plot_coefficients;
pub mod plot_coefficients_comparison;
pub mod plot_gust_comparison;
pub mod plot_parallel_scaling;
pub mod plot_percent_difference;
pub mod plot_velocity_probes;
pub mod plot_waves;

// src/plot_functions/mod.rs
