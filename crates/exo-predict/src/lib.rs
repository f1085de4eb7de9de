//! Heuristic candidate classifier driven by the signal-to-noise ratio.
//!
//! A row is labelled a planet when its SNR exceeds [`SNR_THRESHOLD`]. The
//! confidence rescales SNR linearly against [`SNR_CEILING`] so that it rises
//! with SNR for planets and falls with SNR for non-planets, then clamps it to
//! [`MIN_CONFIDENCE`]..=[`MAX_CONFIDENCE`].
//!
//! This predictor does not read the trained pipeline artifact.

use std::io::Write;

use exo_ingest::{CsvTable, column_f64};
use exo_model::{Feature, Label, Prediction, PredictionResult};
use polars::prelude::DataFrame;
use tracing::{debug, warn};

/// SNR above which a row is labelled a planet.
pub const SNR_THRESHOLD: f64 = 100.0;
/// SNR mapped to full confidence.
pub const SNR_CEILING: f64 = 1000.0;
/// Confidence reported for every row when SNR is unavailable.
pub const UNCERTAIN_CONFIDENCE: f64 = 0.5;
pub const MIN_CONFIDENCE: f64 = 0.01;
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Classify a single SNR value.
///
/// A missing value yields a non-planet at maximal uncertainty.
pub fn predict_snr(snr: Option<f64>) -> Prediction {
    let Some(snr) = snr.filter(|v| !v.is_nan()) else {
        return Prediction {
            label: Label::NonPlanet,
            confidence: UNCERTAIN_CONFIDENCE,
        };
    };
    let label = if snr > SNR_THRESHOLD {
        Label::Planet
    } else {
        Label::NonPlanet
    };
    let scaled = (snr / SNR_CEILING).clamp(0.0, 1.0);
    let confidence = match label {
        Label::Planet => 0.5 + scaled / 2.0,
        Label::NonPlanet => 0.5 - scaled / 2.0,
    };
    Prediction {
        label,
        confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
    }
}

/// Classify a column of SNR values.
pub fn predict_rows(snr: &[Option<f64>]) -> PredictionResult {
    PredictionResult::new(snr.iter().map(|value| predict_snr(*value)).collect())
}

/// Classify every row of a frame.
///
/// Without an `snr` column every row is a non-planet at confidence 0.5.
pub fn predict_frame(df: &DataFrame) -> PredictionResult {
    match column_f64(df, Feature::Snr.column_name()) {
        Some(snr) => {
            let result = predict_rows(&snr);
            debug!(
                rows = result.len(),
                planets = result.planet_count(),
                "heuristic predictions computed"
            );
            result
        }
        None => {
            warn!(
                rows = df.height(),
                "'snr' column missing; returning default non-planet predictions"
            );
            uncertain(df.height())
        }
    }
}

fn uncertain(rows: usize) -> PredictionResult {
    PredictionResult::new(vec![
        Prediction {
            label: Label::NonPlanet,
            confidence: UNCERTAIN_CONFIDENCE,
        };
        rows
    ])
}

/// Write the source table with `prediction` and `probability` columns appended.
pub fn write_predictions_csv<W: Write>(
    writer: W,
    table: &CsvTable,
    result: &PredictionResult,
) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    header.push("prediction");
    header.push("probability");
    out.write_record(&header)?;
    for (row, prediction) in table.rows.iter().zip(&result.predictions) {
        let mut record: Vec<String> = row.clone();
        record.push(prediction.label.class().to_string());
        record.push(format!("{:.4}", prediction.confidence));
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exo_ingest::{read_csv_bytes, table_frame};
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reference_rows() {
        let result = predict_rows(&[Some(50.0), Some(250.0), Some(120.0)]);
        assert_eq!(result.labels(), vec![0, 1, 1]);
        let confidences = result.confidences();
        assert!(close(confidences[0], 0.475));
        assert!(close(confidences[1], 0.625));
        assert!(close(confidences[2], 0.56));
    }

    #[test]
    fn threshold_is_exclusive() {
        let at = predict_snr(Some(100.0));
        assert_eq!(at.label, Label::NonPlanet);
        assert!(close(at.confidence, 0.45));
        assert_eq!(predict_snr(Some(100.0001)).label, Label::Planet);
    }

    #[test]
    fn confidence_is_clamped() {
        assert!(close(predict_snr(Some(5000.0)).confidence, MAX_CONFIDENCE));
        assert!(close(predict_snr(Some(0.0)).confidence, 0.5));
        // Negative SNR scales to zero rather than above 0.5.
        assert!(close(predict_snr(Some(-40.0)).confidence, 0.5));
    }

    #[test]
    fn missing_cell_is_uncertain() {
        let prediction = predict_snr(None);
        assert_eq!(prediction.label, Label::NonPlanet);
        assert!(close(prediction.confidence, UNCERTAIN_CONFIDENCE));
    }

    #[test]
    fn frame_without_snr_is_uncertain() {
        let df = DataFrame::new(vec![
            Series::new("orbital_period".into(), &[1.0, 50.0, 10.0]).into_column(),
        ])
        .unwrap();
        let result = predict_frame(&df);
        assert_eq!(result.labels(), vec![0, 0, 0]);
        assert!(result.confidences().iter().all(|c| close(*c, 0.5)));
    }

    #[test]
    fn integer_snr_column_is_accepted() {
        let df = DataFrame::new(vec![Series::new("SNR".into(), &[50i64, 250]).into_column()])
            .unwrap();
        assert_eq!(predict_frame(&df).labels(), vec![0, 1]);
    }

    #[test]
    fn writes_prediction_columns() {
        let table = read_csv_bytes("inline", b"id,snr\na,50\nb,250\n").unwrap();
        let df = table_frame("inline", &table).unwrap();
        let result = predict_frame(&df);
        let mut buffer = Vec::new();
        write_predictions_csv(&mut buffer, &table, &result).unwrap();
        let written = String::from_utf8(buffer).unwrap();
        assert_eq!(
            written,
            "id,snr,prediction,probability\na,50,0,0.4750\nb,250,1,0.6250\n"
        );
    }
}
