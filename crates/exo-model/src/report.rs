//! Per-class evaluation report for a binary classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::label::Label;

/// Precision, recall and F1 for one class (or one average row).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Evaluation of predictions against held-out labels.
///
/// Undefined ratios (no predicted or no true samples for a class) are
/// reported as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub non_planet: ClassMetrics,
    pub planet: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

#[derive(Debug, Default, Clone, Copy)]
struct Confusion {
    tp: usize,
    fp: usize,
    tn: usize,
    fn_count: usize,
}

impl ClassificationReport {
    /// Build a report from aligned truth and prediction slices.
    ///
    /// Pairs beyond the shorter slice are ignored.
    pub fn from_predictions(truth: &[Label], predicted: &[Label]) -> Self {
        let mut confusion = Confusion::default();
        for (&actual, &guess) in truth.iter().zip(predicted) {
            match (guess, actual) {
                (Label::Planet, Label::Planet) => confusion.tp += 1,
                (Label::Planet, Label::NonPlanet) => confusion.fp += 1,
                (Label::NonPlanet, Label::NonPlanet) => confusion.tn += 1,
                (Label::NonPlanet, Label::Planet) => confusion.fn_count += 1,
            }
        }
        let planet = class_metrics(confusion.tp, confusion.fp, confusion.fn_count);
        // Class 0 is the mirror image: its true positives are our true negatives.
        let non_planet = class_metrics(confusion.tn, confusion.fn_count, confusion.fp);
        let total = planet.support + non_planet.support;
        let accuracy = ratio(confusion.tp + confusion.tn, total);
        // Only classes seen in the truth or the predictions enter the macro average.
        let present: Vec<&ClassMetrics> = [
            (&non_planet, confusion.tn + confusion.fn_count),
            (&planet, confusion.tp + confusion.fp),
        ]
        .into_iter()
        .filter(|(metrics, predicted)| metrics.support > 0 || *predicted > 0)
        .map(|(metrics, _)| metrics)
        .collect();
        let mean = |pick: fn(&ClassMetrics) -> f64| {
            if present.is_empty() {
                0.0
            } else {
                present.iter().map(|m| pick(m)).sum::<f64>() / present.len() as f64
            }
        };
        let macro_avg = ClassMetrics {
            precision: mean(|m| m.precision),
            recall: mean(|m| m.recall),
            f1: mean(|m| m.f1),
            support: total,
        };
        let weighted = |pick: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                (pick(&planet) * planet.support as f64
                    + pick(&non_planet) * non_planet.support as f64)
                    / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };
        Self {
            non_planet,
            planet,
            accuracy,
            macro_avg,
            weighted_avg,
        }
    }

    pub fn class(&self, label: Label) -> &ClassMetrics {
        match label {
            Label::NonPlanet => &self.non_planet,
            Label::Planet => &self.planet,
        }
    }

    pub fn support(&self) -> usize {
        self.macro_avg.support
    }
}

fn class_metrics(tp: usize, fp: usize, fn_count: usize) -> ClassMetrics {
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_count);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    ClassMetrics {
        precision,
        recall,
        f1,
        support: tp + fn_count,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, metrics) in [("0", &self.non_planet), ("1", &self.planet)] {
            write_row(f, name, metrics)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support()
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, metrics: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name, metrics.precision, metrics.recall, metrics.f1, metrics.support
    )
}
