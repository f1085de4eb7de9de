//! Median imputation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TrainError};

/// Replaces missing cells with the per-column median of the fitted data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    pub medians: Vec<f64>,
}

impl MedianImputer {
    /// Learn per-column medians from the observed (non-missing) values.
    ///
    /// A column with no observed values imputes `0.0`.
    pub fn fit(rows: &[Vec<Option<f64>>], width: usize) -> Result<Self> {
        let mut medians = Vec::with_capacity(width);
        for col in 0..width {
            let mut observed = Vec::with_capacity(rows.len());
            for row in rows {
                check_width(row.len(), width)?;
                if let Some(value) = row[col] {
                    observed.push(value);
                }
            }
            let median = median(&mut observed).unwrap_or_else(|| {
                warn!(column = col, "no observed values; imputing 0.0");
                0.0
            });
            medians.push(median);
        }
        Ok(Self { medians })
    }

    pub fn width(&self) -> usize {
        self.medians.len()
    }

    pub fn transform(&self, rows: &[Vec<Option<f64>>]) -> Result<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                check_width(row.len(), self.width())?;
                Ok(row
                    .iter()
                    .zip(&self.medians)
                    .map(|(value, median)| value.unwrap_or(*median))
                    .collect())
            })
            .collect()
    }
}

pub(crate) fn check_width(found: usize, expected: usize) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(TrainError::FeatureMismatch { expected, found })
    }
}

/// Median of the values; the mean of the two middle values for even counts.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
