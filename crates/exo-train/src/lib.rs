//! Training for the exoplanet candidate classifier.
//!
//! The pipeline imputes missing features with training medians, standardizes
//! them, and fits a seeded random forest. [`run_training`] drives the whole
//! workflow from a labelled CSV to a JSON artifact on disk.

pub mod error;
pub mod forest;
pub mod impute;
pub mod options;
pub mod pipeline;
pub mod run;
pub mod scale;
pub mod split;
pub mod tree;

pub use error::{Result, TrainError};
pub use forest::{DEFAULT_SEED, DEFAULT_TREE_COUNT, ForestParams, RandomForest};
pub use impute::MedianImputer;
pub use options::{DEFAULT_MODEL_PATH, DEFAULT_TEST_FRACTION, TrainingOptions};
pub use pipeline::{ArtifactMetadata, FittedPipeline};
pub use run::{Evaluated, TrainingOutcome, run_training, train_and_evaluate};
pub use scale::StandardScaler;
pub use split::{SplitIndices, select, stratified_split};
pub use tree::{DecisionTree, Node, TreeParams};
