//! Labelled training datasets.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use exo_model::{DISPOSITION_COLUMN, DispositionSummary, Feature, Label};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};
use crate::frame::parse_f64;

/// Buffer size for reading files during checksum computation.
const BUFFER_SIZE: usize = 65536;

/// Feature matrix and binary labels ready for training.
///
/// Invariant: `rows.len() == labels.len()` and every row has one slot per
/// entry of `features`.
#[derive(Debug, Clone)]
pub struct LabelledDataset {
    /// Feature columns present in the source, in canonical order.
    pub features: Vec<Feature>,
    pub rows: Vec<Vec<Option<f64>>>,
    pub labels: Vec<Label>,
    pub summary: DispositionSummary,
}

impl LabelledDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of missing cells per feature column.
    pub fn missing_counts(&self) -> Vec<(Feature, usize)> {
        self.features
            .iter()
            .enumerate()
            .map(|(col, feature)| {
                let missing = self.rows.iter().filter(|row| row[col].is_none()).count();
                (*feature, missing)
            })
            .collect()
    }
}

/// Load a labelled dataset from a CSV file.
///
/// Fails with [`IngestError::MissingColumn`] when the file has no
/// `disposition` column.
pub fn load_labelled_dataset(path: &Path) -> Result<LabelledDataset> {
    let table = read_csv_table(path)?;
    labelled_dataset_from_table(&path.display().to_string(), &table)
}

/// Map dispositions to labels and extract the feature matrix.
///
/// Rows whose disposition is outside the vocabulary are dropped.
pub fn labelled_dataset_from_table(origin: &str, table: &CsvTable) -> Result<LabelledDataset> {
    let disposition_index =
        table
            .column_index(DISPOSITION_COLUMN)
            .ok_or_else(|| IngestError::MissingColumn {
                column: DISPOSITION_COLUMN.to_string(),
                origin: origin.to_string(),
            })?;
    let feature_columns = table.feature_columns();
    let features: Vec<Feature> = feature_columns.iter().map(|(feature, _)| *feature).collect();

    let mut summary = DispositionSummary::default();
    let mut rows = Vec::with_capacity(table.len());
    let mut labels = Vec::with_capacity(table.len());
    let mut unparsed = vec![0usize; feature_columns.len()];
    for row in &table.rows {
        let disposition = row.get(disposition_index).map(String::as_str).unwrap_or("");
        let Some(label) = summary.record(disposition) else {
            continue;
        };
        let values: Vec<Option<f64>> = feature_columns
            .iter()
            .enumerate()
            .map(|(slot, (_, index))| {
                let raw = row.get(*index).map(String::as_str).unwrap_or("");
                let value = parse_f64(raw);
                if value.is_none() && !raw.is_empty() {
                    unparsed[slot] += 1;
                }
                value
            })
            .collect();
        rows.push(values);
        labels.push(label);
    }

    for ((feature, _), count) in feature_columns.iter().zip(&unparsed) {
        if *count > 0 {
            warn!(origin, feature = %feature, count, "non-numeric cells treated as missing");
        }
    }
    if summary.rows_dropped > 0 {
        warn!(
            origin,
            dropped = summary.rows_dropped,
            values = ?summary.unknown_values,
            "rows with unmapped disposition dropped"
        );
    }
    info!(
        origin,
        rows = summary.rows_retained,
        planets = summary.planets,
        non_planets = summary.non_planets,
        features = features.len(),
        "labelled dataset loaded"
    );
    Ok(LabelledDataset {
        features,
        rows,
        labels,
        summary,
    })
}

/// Compute the SHA256 hash of a file as lowercase hex.
pub fn file_sha256(path: &Path) -> Result<String> {
    let read_error = |source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    let hex_hash = hex::encode(hasher.finalize());
    debug!(path = %path.display(), sha256 = %hex_hash, "dataset fingerprint");
    Ok(hex_hash)
}
