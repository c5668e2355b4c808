//! Row Filter Module
//! Predicates producing sub-tables for per-entity drill-down.

use polars::prelude::*;

use super::aggregate::AnalyticsError;
use crate::data::{frame, schema};

/// Rows where `column` equals `value` exactly.
pub fn equals(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame, AnalyticsError> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let filtered = df
        .clone()
        .lazy()
        .filter(col(column).eq(lit(value)))
        .collect()?;
    Ok(filtered)
}

/// Rows whose derived `Year` equals `year`; null years never match.
pub fn year(df: &DataFrame, year: i32) -> Result<DataFrame, AnalyticsError> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let filtered = df
        .clone()
        .lazy()
        .filter(col(schema::YEAR).eq(lit(year)))
        .collect()?;
    Ok(filtered)
}

/// Rows where `column` lies in the inclusive range `[low, high]`.
pub fn between(
    df: &DataFrame,
    column: &str,
    low: f64,
    high: f64,
) -> Result<DataFrame, AnalyticsError> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let filtered = df
        .clone()
        .lazy()
        .filter(col(column).gt_eq(lit(low)).and(col(column).lt_eq(lit(high))))
        .collect()?;
    Ok(filtered)
}

/// Rows where `column` contains `needle`, case-insensitively.
///
/// The funding table's investor column is free text that may list several
/// co-investors, so attribution falls back to this lossy heuristic: it can
/// over-match on substring collisions and under-match on spelling variants.
pub fn contains_ci(df: &DataFrame, column: &str, needle: &str) -> Result<DataFrame, AnalyticsError> {
    if df.height() == 0 {
        return Ok(df.clone());
    }

    let needle = needle.to_lowercase();
    let values = frame::string_values(df, column)?;
    let mask: Vec<bool> = values
        .iter()
        .map(|value| {
            value
                .as_deref()
                .map(|s| s.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .collect();

    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    Ok(df.filter(&mask)?)
}
