// src/data_input/table_parser.rs

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;

use crate::data_input::parse_report::{read_raw_lines, ParseReport, RowError};
use crate::data_input::time_series::{Dataset, TimeSeries};
use crate::error::AnalysisError;

/// Key column of force-coefficient and experiment tables.
pub const TIME_COLUMN: &str = "Time";
/// Key column of the angle-of-attack comparison tables.
pub const AOA_COLUMN: &str = "AoA";

/// Strip everything but ASCII letters, digits and underscores from a header,
/// so `"AoA ()"` matches `AoA` and `" Cl "` matches `Cl`.
pub fn clean_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Parses a delimited table into a [`Dataset`] keyed on `key_column`.
///
/// The delimiter is taken from the header line: a comma selects CSV parsing,
/// anything else is treated as whitespace separated (OpenFOAM `.dat` style).
/// Every other column becomes a [`TimeSeries`] of `(key, value)` pairs.
///
/// Rows with the wrong field count or an unparsable number are skipped and
/// recorded in the returned [`ParseReport`]. A missing key column is an error.
pub fn parse_table(
    path: &Path,
    key_column: &str,
) -> Result<(Dataset, ParseReport), AnalysisError> {
    let name = Dataset::name_from_path(path);
    let mut report = ParseReport::new(path.display().to_string());

    let mut lines = read_raw_lines(BufReader::new(File::open(path)?))?.into_iter();

    // First non-blank line is the header.
    let (header_line_no, header_line) = loop {
        match lines.next() {
            Some((line_no, text)) => {
                if let Some(line) = report.decoded(line_no, text) {
                    if !line.trim().is_empty() {
                        break (line_no, line);
                    }
                }
            }
            None => {
                return Err(AnalysisError::MissingColumn {
                    file: name,
                    column: key_column.to_string(),
                })
            }
        }
    };

    let comma_separated = header_line.contains(',');
    let header_text = header_line.trim().trim_start_matches('#');
    let headers: Vec<String> = if comma_separated {
        header_text.split(',').map(clean_column_name).collect()
    } else {
        header_text.split_whitespace().map(clean_column_name).collect()
    };
    log::debug!("Headers found in '{}': {:?}", name, headers);

    let key_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(key_column))
        .ok_or_else(|| AnalysisError::MissingColumn {
            file: name.clone(),
            column: key_column.to_string(),
        })?;

    let mut columns: Vec<Vec<(f64, f64)>> = vec![Vec::new(); headers.len()];
    let mut push_row = |row: Vec<f64>| {
        let key = row[key_idx];
        for (col_idx, value) in row.into_iter().enumerate() {
            if col_idx != key_idx {
                columns[col_idx].push((key, value));
            }
        }
    };

    if comma_separated {
        // Decodable lines go through the csv reader; `body` maps its line
        // positions back to file line numbers.
        let mut body: Vec<(usize, String)> = Vec::new();
        for (line_no, text) in lines {
            if let Some(line) = report.decoded(line_no, text) {
                body.push((line_no, line));
            }
        }
        let content = body
            .iter()
            .map(|(_, l)| l.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        for result in reader.records() {
            let position = match &result {
                Ok(record) => record.position().cloned(),
                Err(e) => e.position().cloned(),
            };
            let line_no = position
                .and_then(|p| body.get((p.line() as usize).saturating_sub(1)))
                .map_or(header_line_no, |(no, _)| *no);
            let outcome = match result {
                Ok(record) => {
                    if record.iter().all(|f| f.is_empty()) {
                        continue;
                    }
                    parse_fields(record.iter(), headers.len())
                }
                Err(e) => Err(RowError::Csv(e.to_string())),
            };
            if let Some(row) = report.record(line_no, outcome) {
                push_row(row);
            }
        }
    } else {
        for (line_no, text) in lines {
            let Some(line) = report.decoded(line_no, text) else {
                continue;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let outcome = parse_fields(trimmed.split_whitespace(), headers.len());
            if let Some(row) = report.record(line_no, outcome) {
                push_row(row);
            }
        }
    }

    let mut dataset = Dataset::new(name);
    for (col_idx, points) in columns.into_iter().enumerate() {
        if col_idx != key_idx && !headers[col_idx].is_empty() {
            dataset.insert(headers[col_idx].clone(), TimeSeries::new(points));
        }
    }

    report.log_summary();
    Ok((dataset, report))
}

fn parse_fields<'a, I>(fields: I, expected: usize) -> Result<Vec<f64>, RowError>
where
    I: Iterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields.collect();
    if fields.len() != expected {
        return Err(RowError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    fields
        .into_iter()
        .map(|f| {
            f.trim().parse::<f64>().map_err(|_| RowError::InvalidNumber {
                field: f.to_string(),
            })
        })
        .collect()
}

/// Convenience wrapper for `Time`-keyed tables.
pub fn parse_time_table(path: &Path) -> Result<(Dataset, ParseReport), AnalysisError> {
    parse_table(path, TIME_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: impl AsRef<[u8]>) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("cfd_postproc_table_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_ref()).unwrap();
        path
    }

    #[test]
    fn test_clean_column_name() {
        assert_eq!(clean_column_name("AoA (deg)"), "AoAdeg");
        assert_eq!(clean_column_name(" Cl "), "Cl");
        assert_eq!(clean_column_name("Velocity_X"), "Velocity_X");
    }

    #[test]
    fn test_whitespace_table() {
        let path = write_temp(
            "coefficient.dat",
            "Time   Cd   Cl\n0.0  0.01  0.5\n0.1  0.02  0.6\nbad row here\n0.2  0.03  0.7\n",
        );
        let (ds, report) = parse_time_table(&path).unwrap();
        assert_eq!(ds.name, "coefficient");
        assert_eq!(report.parsed, 3);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].line, 4);
        let cl = ds.column("Cl").unwrap();
        assert_eq!(cl.points, vec![(0.0, 0.5), (0.1, 0.6), (0.2, 0.7)]);
    }

    #[test]
    fn test_comma_table_with_dirty_headers() {
        let path = write_temp("Beihang.csv", "AoA (),Cl \n0,0.1\n4,0.5\n8,x\n");
        // "AoA ()" cleans to "AoA"
        let (ds, report) = parse_table(&path, AOA_COLUMN).unwrap();
        assert_eq!(report.parsed, 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(ds.column("Cl").unwrap().points, vec![(0.0, 0.1), (4.0, 0.5)]);
    }

    #[test]
    fn test_missing_key_column() {
        let path = write_temp("nokey.dat", "t Cl\n0 1\n");
        match parse_time_table(&path) {
            Err(AnalysisError::MissingColumn { column, .. }) => assert_eq!(column, "Time"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_undecodable_rows_are_skipped() {
        let path = write_temp("latin1.csv", b"AoA,Cl\n0,0.1\n4,0.\xff5\n8,0.9\n".as_slice());
        let (ds, report) = parse_table(&path, AOA_COLUMN).unwrap();
        assert_eq!(report.parsed, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 3);
        assert_eq!(report.skipped[0].error, RowError::InvalidEncoding);
        assert_eq!(ds.column("Cl").unwrap().points, vec![(0.0, 0.1), (8.0, 0.9)]);

        let path = write_temp("latin1.dat", b"Time Cl\n0.0 0.5\n0.1 \xe9\n0.2 0.7\n".as_slice());
        let (ds, report) = parse_time_table(&path).unwrap();
        assert_eq!(report.parsed, 2);
        assert_eq!(report.skipped[0].line, 3);
        assert_eq!(ds.column("Cl").unwrap().points, vec![(0.0, 0.5), (0.2, 0.7)]);
    }
}
