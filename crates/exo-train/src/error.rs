//! Error types for pipeline training and persistence.

use std::path::PathBuf;

use exo_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("invalid training options: {0}")]
    InvalidOptions(String),

    #[error("dataset has no feature columns (expected any of: {expected})")]
    NoFeatures { expected: String },

    #[error("training split has no {class} samples")]
    MissingClass { class: String },

    #[error("held-out split has no {class} samples; the dataset is too small to evaluate")]
    MissingTestClass { class: String },

    #[error("expected {expected} feature values per row, found {found}")]
    FeatureMismatch { expected: usize, found: usize },

    #[error("failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read artifact {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {path} is inconsistent: {reason}")]
    ArtifactInvalid { path: PathBuf, reason: String },

    #[error("artifact {path} is not a valid pipeline: {source}")]
    ArtifactFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TrainError>;
