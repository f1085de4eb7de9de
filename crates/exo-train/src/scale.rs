//! Standardization to zero mean and unit variance.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::impute::check_width;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    /// Population standard deviations; zero-variance columns store `1.0`.
    pub scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>], width: usize) -> Result<Self> {
        let n = rows.len() as f64;
        let mut sums = vec![0.0; width];
        for row in rows {
            check_width(row.len(), width)?;
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum += value;
            }
        }
        let means: Vec<f64> = sums
            .iter()
            .map(|sum| if rows.is_empty() { 0.0 } else { sum / n })
            .collect();
        let mut squares = vec![0.0; width];
        for row in rows {
            for ((acc, value), mean) in squares.iter_mut().zip(row).zip(&means) {
                *acc += (value - mean).powi(2);
            }
        }
        let scales = squares
            .iter()
            .zip(&means)
            .map(|(acc, mean)| {
                let variance = if rows.is_empty() { 0.0 } else { acc / n };
                if is_constant(variance, *mean, n) {
                    1.0
                } else {
                    variance.sqrt()
                }
            })
            .collect();
        Ok(Self { means, scales })
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                check_width(row.len(), self.means.len())?;
                Ok(row
                    .iter()
                    .zip(self.means.iter().zip(&self.scales))
                    .map(|(value, (mean, scale))| (value - mean) / scale)
                    .collect())
            })
            .collect()
    }
}

/// Variance indistinguishable from rounding error in the mean.
fn is_constant(variance: f64, mean: f64, n: f64) -> bool {
    let bound = n * f64::EPSILON * variance + (n * mean * f64::EPSILON).powi(2);
    variance <= bound
}
