//! Transit feature columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five transit features a candidate table may carry.
///
/// The declaration order is the canonical column order used for training
/// matrices and artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Orbital period in days.
    OrbitalPeriod,
    /// Transit duration in hours.
    TransitDuration,
    /// Planet radius in Earth radii.
    PlanetRadius,
    /// Transit depth in ppm.
    TransitDepth,
    /// Signal-to-noise ratio of the transit signal.
    Snr,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::OrbitalPeriod,
        Feature::TransitDuration,
        Feature::PlanetRadius,
        Feature::TransitDepth,
        Feature::Snr,
    ];

    /// Column name as it appears in CSV headers and form fields.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::OrbitalPeriod => "orbital_period",
            Feature::TransitDuration => "transit_duration",
            Feature::PlanetRadius => "planet_radius",
            Feature::TransitDepth => "transit_depth",
            Feature::Snr => "snr",
        }
    }

    /// Human-readable label with unit, used by the form and summaries.
    pub fn label(self) -> &'static str {
        match self {
            Feature::OrbitalPeriod => "Orbital period (days)",
            Feature::TransitDuration => "Transit duration (hours)",
            Feature::PlanetRadius => "Planet radius (Earth radii)",
            Feature::TransitDepth => "Transit depth (ppm)",
            Feature::Snr => "Signal-to-noise ratio",
        }
    }

    /// Match a header case-insensitively, ignoring surrounding whitespace.
    pub fn from_column_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|feature| feature.column_name().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
