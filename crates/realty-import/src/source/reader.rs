use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::SourceError;

use super::record::CsvRecord;

/// Reads a whole CSV file into ordered records.
///
/// Any structural problem fails the file as a unit.
pub fn read_records(path: &Path) -> Result<Vec<CsvRecord>, SourceError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path.to_path_buf())
        } else {
            SourceError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let records = parse_records(file, path)?;
    debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parses CSV from any reader. `path` is only used in error messages.
///
/// The header row names the fields, blank lines are skipped, cells are
/// trimmed and kept as strings.
pub fn parse_records<R: Read>(reader: R, path: &Path) -> Result<Vec<CsvRecord>, SourceError> {
    let csv_error = |e: csv::Error| SourceError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').trim().to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut records: Vec<CsvRecord> = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(csv_error)?;

        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        if row.len() != headers.len() {
            return Err(SourceError::ColumnMismatch {
                path: path.to_path_buf(),
                line: row.position().map(|p| p.line()).unwrap_or(0),
                expected: headers.len(),
                found: row.len(),
            });
        }

        records.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.as_str(), v))
                .collect(),
        );
    }

    Ok(records)
}
