//! Binary planet label and the disposition vocabulary that produces it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Disposition values (upper case) that mark a confirmed or candidate planet.
pub const PLANET_DISPOSITIONS: [&str; 4] = ["CONFIRMED", "CANDIDATE", "PC", "KP"];

/// Disposition values (upper case) that mark a false positive.
pub const NON_PLANET_DISPOSITIONS: [&str; 2] = ["FALSE POSITIVE", "FP"];

/// Binary training target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    NonPlanet,
    Planet,
}

impl Label {
    /// Map a free-text disposition to a label.
    ///
    /// Matching is case-insensitive but otherwise exact: padded values such
    /// as `" CONFIRMED"` fall outside the vocabulary and yield `None`.
    pub fn from_disposition(raw: &str) -> Option<Self> {
        let normalized = raw.to_uppercase();
        if PLANET_DISPOSITIONS.contains(&normalized.as_str()) {
            Some(Label::Planet)
        } else if NON_PLANET_DISPOSITIONS.contains(&normalized.as_str()) {
            Some(Label::NonPlanet)
        } else {
            None
        }
    }

    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(Label::NonPlanet),
            1 => Some(Label::Planet),
            _ => None,
        }
    }

    /// Numeric class: 1 for planet, 0 otherwise.
    pub fn class(self) -> u8 {
        match self {
            Label::NonPlanet => 0,
            Label::Planet => 1,
        }
    }

    /// Class name shown to users.
    pub fn display_name(self) -> &'static str {
        match self {
            Label::NonPlanet => "Not a Planet",
            Label::Planet => "Exoplanet Candidate",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::NonPlanet => f.write_str("non-planet"),
            Label::Planet => f.write_str("planet"),
        }
    }
}

/// Outcome of mapping a disposition column to labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispositionSummary {
    pub rows_read: usize,
    pub rows_retained: usize,
    pub rows_dropped: usize,
    pub planets: usize,
    pub non_planets: usize,
    /// Distinct raw disposition values that matched neither bucket.
    pub unknown_values: BTreeSet<String>,
}

impl DispositionSummary {
    /// Record one row's disposition, returning its label when retained.
    pub fn record(&mut self, raw: &str) -> Option<Label> {
        self.rows_read += 1;
        match Label::from_disposition(raw) {
            Some(label) => {
                self.rows_retained += 1;
                match label {
                    Label::Planet => self.planets += 1,
                    Label::NonPlanet => self.non_planets += 1,
                }
                Some(label)
            }
            None => {
                self.rows_dropped += 1;
                self.unknown_values.insert(raw.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_full_vocabulary() {
        for value in ["CONFIRMED", "candidate", "Pc", "kp"] {
            assert_eq!(Label::from_disposition(value), Some(Label::Planet), "{value}");
        }
        for value in ["FALSE POSITIVE", "false positive", "fp"] {
            assert_eq!(
                Label::from_disposition(value),
                Some(Label::NonPlanet),
                "{value}"
            );
        }
    }

    #[test]
    fn unknown_values_are_unlabelled() {
        assert_eq!(Label::from_disposition("REFUTED"), None);
        assert_eq!(Label::from_disposition(""), None);
        assert_eq!(Label::from_disposition("FALSE_POSITIVE"), None);
    }

    #[test]
    fn padded_values_are_not_in_the_vocabulary() {
        assert_eq!(Label::from_disposition(" CONFIRMED"), None);
        assert_eq!(Label::from_disposition("fp "), None);
        let mut summary = DispositionSummary::default();
        assert_eq!(summary.record(" PC"), None);
        assert!(summary.unknown_values.contains(" PC"));
    }

    #[test]
    fn summary_counts_dropped_rows() {
        let mut summary = DispositionSummary::default();
        for raw in ["CONFIRMED", "FP", "APC", "CANDIDATE", "APC", "unknown"] {
            summary.record(raw);
        }
        assert_eq!(summary.rows_read, 6);
        assert_eq!(summary.rows_retained, 3);
        assert_eq!(summary.rows_dropped, 3);
        assert_eq!(summary.planets, 2);
        assert_eq!(summary.non_planets, 1);
        assert_eq!(summary.unknown_values.len(), 2);
    }
}
