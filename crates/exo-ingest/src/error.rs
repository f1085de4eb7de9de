//! Error types for candidate table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading candidate tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("failed to parse CSV {origin}: {source}")]
    CsvParse {
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// CSV has no header row.
    #[error("CSV is empty: {origin}")]
    EmptyCsv { origin: String },

    /// Required column not found.
    #[error("required column '{column}' not found in {origin}")]
    MissingColumn { column: String, origin: String },

    /// Building the polars frame failed.
    #[error("failed to build frame for {origin}: {source}")]
    Frame {
        origin: String,
        #[source]
        source: polars::error::PolarsError,
    },
}

impl IngestError {
    /// True when a required column is absent, as opposed to unreadable input.
    pub fn is_missing_column(&self) -> bool {
        matches!(self, IngestError::MissingColumn { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
