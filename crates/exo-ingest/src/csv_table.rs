use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use exo_model::Feature;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Raw CSV content with normalized headers and cells.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Cells keep their surrounding whitespace; numeric parsing trims on its own.
fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').to_string()
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header equal to `name`, ignoring ASCII case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name.trim()))
    }

    /// Cell values of one column; short rows yield empty strings.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    /// Feature columns present in the table, in canonical feature order.
    pub fn feature_columns(&self) -> Vec<(Feature, usize)> {
        Feature::ALL
            .into_iter()
            .filter_map(|feature| {
                self.column_index(feature.column_name())
                    .map(|index| (feature, index))
            })
            .collect()
    }
}

/// Read a CSV file from disk.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    read_csv_from(&path.display().to_string(), file)
}

/// Read CSV content already held in memory (e.g. an uploaded file).
///
/// `origin` names the source in errors and logs.
pub fn read_csv_bytes(origin: &str, bytes: &[u8]) -> Result<CsvTable> {
    read_csv_from(origin, bytes)
}

fn read_csv_from<R: Read>(origin: &str, source: R) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            origin: origin.to_string(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match &headers {
            None => headers = Some(record.iter().map(normalize_header).collect()),
            Some(header_row) => {
                let mut row = Vec::with_capacity(header_row.len());
                for idx in 0..header_row.len() {
                    row.push(normalize_cell(record.get(idx).unwrap_or("")));
                }
                if record.len() > header_row.len() {
                    warn!(
                        origin,
                        expected = header_row.len(),
                        found = record.len(),
                        "row has more cells than headers; extra cells ignored"
                    );
                }
                rows.push(row);
            }
        }
    }
    let Some(headers) = headers else {
        return Err(IngestError::EmptyCsv {
            origin: origin.to_string(),
        });
    };
    debug!(
        origin,
        columns = headers.len(),
        rows = rows.len(),
        "csv loaded"
    );
    Ok(CsvTable { headers, rows })
}
