// src/lib.rs - Library interface for the post-processing tools

pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod font_config;
pub mod pipeline;
pub mod plot_framework;
pub mod plot_functions;
pub mod quantity;
pub mod series_style;
pub mod types;
