//! The fitted three-stage pipeline and its on-disk artifact.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use exo_model::{Feature, Label};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TrainError};
use crate::forest::{ForestParams, RandomForest};
use crate::impute::MedianImputer;
use crate::scale::StandardScaler;

/// Provenance recorded alongside the learned state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// RFC 3339 UTC timestamp of the fit.
    pub trained_at: String,
    pub training_rows: usize,
    /// SHA256 of the source CSV, when trained from a file.
    pub dataset_sha256: Option<String>,
    pub crate_version: String,
}

/// Median imputation, then standardization, then a random forest.
///
/// Every stage is fitted on the training rows only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    pub features: Vec<Feature>,
    pub imputer: MedianImputer,
    pub scaler: StandardScaler,
    pub forest: RandomForest,
    pub metadata: ArtifactMetadata,
}

impl FittedPipeline {
    pub fn fit(
        features: &[Feature],
        rows: &[Vec<Option<f64>>],
        labels: &[Label],
        params: ForestParams,
    ) -> Result<Self> {
        let width = features.len();
        let imputer = MedianImputer::fit(rows, width)?;
        let imputed = imputer.transform(rows)?;
        let scaler = StandardScaler::fit(&imputed, width)?;
        let scaled = scaler.transform(&imputed)?;
        let classes: Vec<u8> = labels.iter().map(|label| label.class()).collect();
        let forest = RandomForest::fit(&scaled, &classes, params)?;
        Ok(Self {
            features: features.to_vec(),
            imputer,
            scaler,
            forest,
            metadata: ArtifactMetadata {
                trained_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                training_rows: rows.len(),
                dataset_sha256: None,
                crate_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    /// Planet probability for each row.
    pub fn predict_proba(&self, rows: &[Vec<Option<f64>>]) -> Result<Vec<f64>> {
        let imputed = self.imputer.transform(rows)?;
        let scaled = self.scaler.transform(&imputed)?;
        scaled
            .iter()
            .map(|row| self.forest.predict_proba(row))
            .collect()
    }

    pub fn predict(&self, rows: &[Vec<Option<f64>>]) -> Result<Vec<Label>> {
        Ok(self
            .predict_proba(rows)?
            .into_iter()
            .map(|p| if p > 0.5 { Label::Planet } else { Label::NonPlanet })
            .collect())
    }

    /// Atomically write the artifact as JSON, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_error = |source| TrainError::ArtifactWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let json = serde_json::to_vec_pretty(self).map_err(|source| TrainError::ArtifactFormat {
            path: path.to_path_buf(),
            source,
        })?;
        // Readers never observe a partially written artifact.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(write_error)?;
        fs::rename(&temp_path, path).map_err(write_error)?;
        info!(path = %path.display(), trees = self.forest.n_trees(), "pipeline saved");
        Ok(())
    }

    /// Read an artifact and check that its stages fit together.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| TrainError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        })?;
        let pipeline: Self =
            serde_json::from_slice(&bytes).map_err(|source| TrainError::ArtifactFormat {
                path: path.to_path_buf(),
                source,
            })?;
        pipeline
            .validate()
            .map_err(|reason| TrainError::ArtifactInvalid {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(pipeline)
    }

    /// Stage widths agree and every learned statistic is usable.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let width = self.features.len();
        let widths = [
            ("imputer", self.imputer.width()),
            ("scaler means", self.scaler.means.len()),
            ("scaler scales", self.scaler.scales.len()),
            ("forest", self.forest.n_features()),
        ];
        for (stage, found) in widths {
            if found != width {
                return Err(format!("{stage} expects {found} features, pipeline has {width}"));
            }
        }
        if self.imputer.medians.iter().any(|median| !median.is_finite()) {
            return Err("imputer holds a non-finite median".to_string());
        }
        if self.scaler.means.iter().any(|mean| !mean.is_finite())
            || self
                .scaler
                .scales
                .iter()
                .any(|scale| !scale.is_finite() || *scale <= 0.0)
        {
            return Err("scaler holds a non-finite mean or a non-positive scale".to_string());
        }
        self.forest.validate()
    }
}
