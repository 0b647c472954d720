// src/data_input/parse_report.rs

use std::io::BufRead;

use thiserror::Error;

/// Why a single data row was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("'{field}' is not a number")]
    InvalidNumber { field: String },
    #[error("missing '(vx vy vz)' vector")]
    MissingVector,
    #[error("CSV read error: {0}")]
    Csv(String),
    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

/// One physical line: 1-based number and its decoded text.
pub type RawLine = (usize, Result<String, RowError>);

/// Split `reader` into lines, decoding each one separately so a bad byte
/// only costs its own line. Line endings (`\n`, `\r\n`) are stripped.
pub fn read_raw_lines<R: BufRead>(mut reader: R) -> std::io::Result<Vec<RawLine>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        let text = String::from_utf8(buf.clone()).map_err(|_| RowError::InvalidEncoding);
        lines.push((lines.len() + 1, text));
    }
    Ok(lines)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: usize,
    pub error: RowError,
}

/// Outcome of parsing one file: how many rows made it and which were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub file: String,
    pub parsed: usize,
    pub skipped: Vec<SkippedRow>,
}

impl ParseReport {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }

    /// Record the per-row outcome, warning on rejection.
    pub fn record<T>(&mut self, line: usize, outcome: Result<T, RowError>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.parsed += 1;
                Some(value)
            }
            Err(error) => {
                self.skip(line, error);
                None
            }
        }
    }

    /// Pass a decoded line through without counting it as a parsed row; an
    /// undecodable one is recorded as skipped.
    pub fn decoded(&mut self, line: usize, text: Result<String, RowError>) -> Option<String> {
        match text {
            Ok(text) => Some(text),
            Err(error) => {
                self.skip(line, error);
                None
            }
        }
    }

    fn skip(&mut self, line: usize, error: RowError) {
        log::warn!("Skipping line {} in '{}': {}", line, self.file, error);
        self.skipped.push(SkippedRow { line, error });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "'{}': {} rows parsed, {} skipped",
            self.file,
            self.parsed,
            self.skipped_count()
        )
    }

    /// Log the summary, as a warning if any row was dropped.
    pub fn log_summary(&self) {
        if self.is_clean() {
            log::info!("{}", self.summary());
        } else {
            log::warn!("{}", self.summary());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_outcomes() {
        let mut report = ParseReport::new("U1");
        assert_eq!(report.record(1, Ok::<_, RowError>(1.0)), Some(1.0));
        assert_eq!(report.record::<f64>(2, Err(RowError::MissingVector)), None);
        assert_eq!(report.parsed, 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].line, 2);
        assert!(!report.is_clean());
        assert_eq!(report.summary(), "'U1': 1 rows parsed, 1 skipped");
    }

    #[test]
    fn test_raw_lines_isolate_bad_bytes() {
        let input: &[u8] = b"first\r\nbad \xff byte\n\nlast";
        let lines = read_raw_lines(input).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], (1, Ok("first".to_string())));
        assert_eq!(lines[1], (2, Err(RowError::InvalidEncoding)));
        assert_eq!(lines[2], (3, Ok(String::new())));
        assert_eq!(lines[3], (4, Ok("last".to_string())));
    }
}
