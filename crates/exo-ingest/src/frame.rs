//! Polars frames over candidate tables.
//!
//! Feature columns become `Float64` (unparseable cells are null); every other
//! column is carried through as a string column so row counts survive tables
//! that carry no feature at all.

use std::collections::BTreeSet;

use exo_model::Feature;
use polars::prelude::*;
use tracing::warn;

use crate::csv_table::CsvTable;
use crate::error::{IngestError, Result};

/// Converts a Polars AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Parses a string as f64, returning None for invalid, empty, or non-finite strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Name of the frame column matching `name` case-insensitively.
pub fn find_column(df: &DataFrame, name: &str) -> Option<String> {
    df.get_column_names()
        .into_iter()
        .find(|column| column.as_str().eq_ignore_ascii_case(name))
        .map(|column| column.to_string())
}

/// Values of a column as optional floats, or `None` when the column is absent.
///
/// Lookup is case-insensitive; non-numeric cells become `None`.
pub fn column_f64(df: &DataFrame, name: &str) -> Option<Vec<Option<f64>>> {
    let column = df.column(&find_column(df, name)?).ok()?;
    let series = column.as_materialized_series();
    match series.cast(&DataType::Float64) {
        Ok(cast) => {
            let values = cast.f64().ok()?;
            Some(
                values
                    .into_iter()
                    .map(|value| value.filter(|v| v.is_finite()))
                    .collect(),
            )
        }
        Err(_) => Some(series.iter().map(any_to_f64).collect()),
    }
}

/// Build a frame from a parsed CSV table.
pub fn table_frame(origin: &str, table: &CsvTable) -> Result<DataFrame> {
    let mut seen = BTreeSet::new();
    let mut columns: Vec<Column> = Vec::with_capacity(table.headers.len());
    for (index, header) in table.headers.iter().enumerate() {
        if !seen.insert(header.to_lowercase()) {
            warn!(origin, column = %header, "duplicate column ignored");
            continue;
        }
        let column = match Feature::from_column_name(header) {
            Some(feature) => {
                let values: Vec<Option<f64>> = table.column_values(index).map(parse_f64).collect();
                Series::new(feature.column_name().into(), values).into_column()
            }
            None => {
                let values: Vec<&str> = table.column_values(index).collect();
                Series::new(header.as_str().into(), values).into_column()
            }
        };
        columns.push(column);
    }
    DataFrame::new(columns).map_err(|source| IngestError::Frame {
        origin: origin.to_string(),
        source,
    })
}

/// Build a one-row frame holding all five feature columns.
pub fn single_row_frame(values: &[(Feature, Option<f64>)]) -> Result<DataFrame> {
    let columns: Vec<Column> = Feature::ALL
        .into_iter()
        .map(|feature| {
            let value = values
                .iter()
                .find(|(candidate, _)| *candidate == feature)
                .and_then(|(_, value)| *value);
            Series::new(feature.column_name().into(), vec![value]).into_column()
        })
        .collect();
    DataFrame::new(columns).map_err(|source| IngestError::Frame {
        origin: "form".to_string(),
        source,
    })
}
