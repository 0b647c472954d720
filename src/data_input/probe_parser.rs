// src/data_input/probe_parser.rs

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::data_input::parse_report::{read_raw_lines, ParseReport, RowError};
use crate::data_input::time_series::{Dataset, TimeSeries};
use crate::error::AnalysisError;
use crate::quantity::VelocityComponent;
use crate::types::Velocity;

/// One probe sample: `<time> (<vx> <vy> <vz>)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    pub time: f64,
    pub velocity: Velocity,
}

/// All samples of one probe log, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeData {
    pub name: String,
    pub samples: Vec<ProbeSample>,
}

impl ProbeData {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn component(&self, component: VelocityComponent) -> TimeSeries {
        let idx = component.index();
        TimeSeries::new(
            self.samples
                .iter()
                .map(|s| (s.time, s.velocity[idx]))
                .collect(),
        )
    }
}

/// Header lines: comments (`# Probe 0 (...)`) and the `Time` column header.
fn is_header_line(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with("Time")
}

/// Parses a single data line of the probe log format.
pub fn parse_probe_line(line: &str) -> Result<ProbeSample, RowError> {
    let trimmed = line.trim();
    let (time_str, rest) = trimmed
        .split_once(char::is_whitespace)
        .ok_or(RowError::MissingVector)?;

    let time = time_str.parse::<f64>().map_err(|_| RowError::InvalidNumber {
        field: time_str.to_string(),
    })?;

    let vector_text = rest.trim().trim_start_matches('(').trim_end_matches(')');
    let fields: Vec<&str> = vector_text.split_whitespace().collect();
    if fields.is_empty() {
        return Err(RowError::MissingVector);
    }
    if fields.len() != 3 {
        return Err(RowError::FieldCount {
            expected: 3,
            found: fields.len(),
        });
    }

    let mut velocity = [0.0; 3];
    for (slot, field) in velocity.iter_mut().zip(fields) {
        *slot = field.parse::<f64>().map_err(|_| RowError::InvalidNumber {
            field: field.to_string(),
        })?;
    }

    Ok(ProbeSample { time, velocity })
}

/// Reads a probe log. Malformed lines are skipped with a warning and counted
/// in the [`ParseReport`]; they never abort the file.
pub fn parse_probe_file(path: &Path) -> Result<(ProbeData, ParseReport), AnalysisError> {
    let lines = read_raw_lines(BufReader::new(File::open(path)?))?;
    let mut report = ParseReport::new(path.display().to_string());
    let mut data = ProbeData {
        name: Dataset::name_from_path(path),
        samples: Vec::new(),
    };

    for (line_no, text) in lines {
        let Some(line) = report.decoded(line_no, text) else {
            continue;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || is_header_line(trimmed) {
            continue;
        }
        if let Some(sample) = report.record(line_no, parse_probe_line(trimmed)) {
            data.samples.push(sample);
        }
    }

    report.log_summary();
    Ok((data, report))
}

/// Scientific notation with a signed two-digit exponent (`1.234568e-02`),
/// the form the probe tools write.
fn format_scientific(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text; // inf / NaN
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        Err(_) => text,
    }
}

/// Writes probes back out in the probe log format, all files concatenated
/// under a single header.
pub fn write_probe_file(path: &Path, probes: &[ProbeData]) -> Result<usize, AnalysisError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# Probe 0 (-1 0 0)")?;
    writeln!(out, "# Time        0")?;

    let mut written = 0;
    for probe in probes {
        for s in &probe.samples {
            writeln!(
                out,
                "{:.7}     ({:.4} {} {:.6})",
                s.time,
                s.velocity[0],
                format_scientific(s.velocity[1], 6),
                s.velocity[2]
            )?;
            written += 1;
        }
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_line() {
        let s = parse_probe_line("0.0125   (20.1 -0.5 1.25e-1)").unwrap();
        assert_eq!(s.time, 0.0125);
        assert_eq!(s.velocity, [20.1, -0.5, 0.125]);
    }

    #[test]
    fn test_parse_probe_line_errors() {
        assert_eq!(parse_probe_line("0.1"), Err(RowError::MissingVector));
        assert_eq!(
            parse_probe_line("0.1 (1 2)"),
            Err(RowError::FieldCount { expected: 3, found: 2 })
        );
        assert_eq!(
            parse_probe_line("abc (1 2 3)"),
            Err(RowError::InvalidNumber { field: "abc".to_string() })
        );
        assert_eq!(
            parse_probe_line("0.1 (1 nan? 3)"),
            Err(RowError::InvalidNumber { field: "nan?".to_string() })
        );
    }

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(0.0, 6), "0.000000e+00");
        assert_eq!(format_scientific(0.012345678, 6), "1.234568e-02");
        assert_eq!(format_scientific(-250.0, 6), "-2.500000e+02");
        assert_eq!(format_scientific(1.5e-120, 2), "1.50e-120");
        assert_eq!(format_scientific(f64::NAN, 6), "NaN");
        assert_eq!("1.234568e-02".parse::<f64>().unwrap(), 0.01234568);
    }

    #[test]
    fn test_header_detection() {
        assert!(is_header_line("# Probe 0 (-1 0 0)"));
        assert!(is_header_line("Time        0"));
        assert!(!is_header_line("0.1 (1 2 3)"));
    }

    #[test]
    fn test_undecodable_line_is_skipped() {
        let dir = std::env::temp_dir().join(format!("cfd_postproc_probe_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("U1");
        std::fs::write(&path, b"# Time 0\n0.5 (20 0 2)\n1.0 (20 \xff 2)\n1.5 (20 0 -2)\n").unwrap();

        let (probe, report) = parse_probe_file(&path).unwrap();
        assert_eq!(probe.len(), 2);
        assert_eq!(report.parsed, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 3);
        assert_eq!(report.skipped[0].error, RowError::InvalidEncoding);
        assert_eq!(probe.samples[1].time, 1.5);
    }
}
