// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Named failure conditions of the loading and reduction pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No input files found in '{}'", dir.display())]
    NoInputFiles { dir: PathBuf },

    #[error("'{file}' has no '{column}' column")]
    MissingColumn { file: String, column: String },

    #[error(
        "Need at least 2 samples spanning a non-zero time in [{time_min}, {time_max}], found {found}"
    )]
    InsufficientSamples {
        found: usize,
        time_min: f64,
        time_max: f64,
    },

    #[error("Dataset '{dataset}' has more than one row at key {key}")]
    DuplicateTimeKey { dataset: String, key: f64 },

    #[error("Reference value is zero at key {key}")]
    ZeroReference { key: f64 },

    #[error("Invalid waveform parameters: {reason}")]
    InvalidWaveformParameters { reason: String },

    #[error("Invalid scaling data: {reason}")]
    InvalidScalingData { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

// src/error.rs
