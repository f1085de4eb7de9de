//! Options controlling a training run.

use std::path::PathBuf;

use crate::error::{Result, TrainError};
use crate::forest::{DEFAULT_SEED, DEFAULT_TREE_COUNT, ForestParams};

/// Artifact location used when none is configured.
pub const DEFAULT_MODEL_PATH: &str = "model/pipeline.json";
/// Share of each class held out for evaluation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct TrainingOptions {
    /// Labelled CSV with a `disposition` column.
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    /// Seeds both the split and the forest.
    pub seed: u64,
    pub test_fraction: f64,
    pub n_trees: usize,
    pub max_depth: Option<usize>,
}

impl TrainingOptions {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            n_trees: DEFAULT_TREE_COUNT,
            max_depth: None,
        }
    }

    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    #[must_use]
    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(TrainError::InvalidOptions(
                "tree count must be at least 1".to_string(),
            ));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(TrainError::InvalidOptions(format!(
                "test fraction must be between 0 and 1 (exclusive), got {}",
                self.test_fraction
            )));
        }
        if self.max_depth == Some(0) {
            return Err(TrainError::InvalidOptions(
                "max depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn forest_params(&self) -> ForestParams {
        ForestParams::default()
            .with_trees(self.n_trees)
            .with_seed(self.seed)
            .with_max_depth(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let options = TrainingOptions::new("data/combined.csv");
        assert_eq!(options.seed, 42);
        assert_eq!(options.n_trees, 200);
        assert!((options.test_fraction - 0.2).abs() < f64::EPSILON);
        assert_eq!(options.model_path, PathBuf::from("model/pipeline.json"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let base = TrainingOptions::new("x.csv");
        assert!(base.clone().with_trees(0).validate().is_err());
        assert!(base.clone().with_test_fraction(0.0).validate().is_err());
        assert!(base.clone().with_test_fraction(1.0).validate().is_err());
        assert!(base.clone().with_test_fraction(f64::NAN).validate().is_err());
        assert!(base.with_max_depth(Some(0)).validate().is_err());
    }
}
