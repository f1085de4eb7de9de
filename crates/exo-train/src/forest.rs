//! Random forest ensemble.
//!
//! Each tree is grown on a bootstrap sample of the training rows and draws a
//! random subset of features at every split. Class probability is the mean
//! of the per-tree leaf planet fractions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrainError};
use crate::impute::check_width;
use crate::tree::{DecisionTree, TreeParams};

pub const DEFAULT_TREE_COUNT: usize = 200;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREE_COUNT,
            max_depth: None,
            min_samples_split: 2,
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestParams {
    #[must_use]
    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit the forest on a dense matrix with 0/1 labels.
    pub fn fit(rows: &[Vec<f64>], labels: &[u8], params: ForestParams) -> Result<Self> {
        if params.n_trees == 0 {
            return Err(TrainError::InvalidOptions(
                "forest needs at least one tree".to_string(),
            ));
        }
        if rows.len() != labels.len() {
            return Err(TrainError::InvalidOptions(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if rows.is_empty() {
            return Err(TrainError::InvalidOptions(
                "cannot fit a forest on zero rows".to_string(),
            ));
        }
        let n_features = rows[0].len();
        for row in rows {
            check_width(row.len(), n_features)?;
        }
        let tree_params = TreeParams {
            max_features: max_features(n_features),
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split.max(2),
        };
        let n = rows.len();
        let mut trees = Vec::with_capacity(params.n_trees);
        for index in 0..params.n_trees {
            // One ChaCha stream per tree keeps trees independent of fit order.
            let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
            rng.set_stream(index as u64);
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            let tree = DecisionTree::fit(rows, labels, bootstrap, &tree_params, &mut rng);
            debug!(
                tree = index,
                nodes = tree.node_count(),
                depth = tree.depth(),
                "tree fitted"
            );
            trees.push(tree);
        }
        Ok(Self {
            params,
            n_features,
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Structural check for a forest read back from disk.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|reason| format!("tree {index}: {reason}"))?;
        }
        Ok(())
    }

    /// Mean planet probability across trees.
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        check_width(row.len(), self.n_features)?;
        let total: f64 = self.trees.iter().map(|tree| tree.predict_proba(row)).sum();
        Ok(total / self.trees.len() as f64)
    }

    /// Class 1 when the averaged planet probability exceeds one half.
    pub fn predict(&self, row: &[f64]) -> Result<u8> {
        Ok(u8::from(self.predict_proba(row)? > 0.5))
    }
}

/// `floor(sqrt(n))`, never below one.
fn max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().floor() as usize).max(1)
}
