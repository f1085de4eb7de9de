pub mod feature;
pub mod label;
pub mod prediction;
pub mod report;

pub use feature::Feature;
pub use label::{DispositionSummary, Label, NON_PLANET_DISPOSITIONS, PLANET_DISPOSITIONS};
pub use prediction::{Prediction, PredictionResult};
pub use report::{ClassMetrics, ClassificationReport};

/// Column holding the free-text vetting outcome in training tables.
pub const DISPOSITION_COLUMN: &str = "disposition";
