use std::path::PathBuf;

use exo_model::Prediction;

#[derive(Debug)]
pub struct PredictionReport {
    pub source: PathBuf,
    pub rows: Vec<PredictedRow>,
    /// Whether the input had an `snr` column at all.
    pub has_snr: bool,
    pub output: Option<PathBuf>,
}

impl PredictionReport {
    pub fn planet_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.prediction.label == exo_model::Label::Planet)
            .count()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PredictedRow {
    /// One-based data row number.
    pub row: usize,
    pub snr: Option<f64>,
    pub prediction: Prediction,
}
