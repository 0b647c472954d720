// src/data_input/mod.rs

pub mod discovery;
pub mod parse_report;
pub mod probe_parser;
pub mod table_parser;
pub mod time_series;

// src/data_input/mod.rs
