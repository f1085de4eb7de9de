use serde::{Deserialize, Serialize};

use crate::label::Label;

/// A single row's predicted label and the confidence in that label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Confidence relative to `label`, in `[0, 1]`.
    pub confidence: f64,
}

/// Predictions for a batch of rows, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predictions: Vec<Prediction>,
}

impl PredictionResult {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self { predictions }
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn labels(&self) -> Vec<u8> {
        self.predictions.iter().map(|p| p.label.class()).collect()
    }

    pub fn confidences(&self) -> Vec<f64> {
        self.predictions.iter().map(|p| p.confidence).collect()
    }

    pub fn planet_count(&self) -> usize {
        self.predictions
            .iter()
            .filter(|p| p.label == Label::Planet)
            .count()
    }
}
