//! Aggregation Engine Module
//! Stateless group-by summaries over the loaded tables.
//!
//! Every operation is deterministic and side-effect-free, and an empty
//! input table yields an empty result, never an error.

use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

use crate::data::{frame, schema};

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Similar-entity lists stop at this many names.
pub const SIMILARITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: String,
    pub value: f64,
}

/// An ordered (group key, metric value) table. Rows are sorted by value
/// descending unless chronological order is requested; ties keep the
/// group's first appearance order in the source table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub rows: Vec<AggregateRow>,
}

impl AggregateResult {
    fn ranked(order: Vec<String>, totals: HashMap<String, f64>) -> Self {
        let mut rows: Vec<AggregateRow> = order
            .into_iter()
            .map(|key| {
                let value = totals[&key];
                AggregateRow { key, value }
            })
            .collect();
        // Stable sort keeps first-seen order between equal values
        rows.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        Self { rows }
    }

    fn chronological(order: Vec<String>, totals: HashMap<String, f64>) -> Self {
        let mut rows: Vec<AggregateRow> = order
            .into_iter()
            .map(|key| {
                let value = totals[&key];
                AggregateRow { key, value }
            })
            .collect();
        rows.sort_by(|a, b| label_order(&a.key, &b.key));
        Self { rows }
    }

    /// Keep the first `n` entries of the already-sorted result.
    pub fn top_n(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Re-sort by key ascending (chronological for ISO date keys).
    pub fn sorted_by_key(mut self) -> Self {
        self.rows.sort_by(|a, b| label_order(&a.key, &b.key));
        self
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|row| row.value).sum()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.key == key)
            .map(|row| row.value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Orders labels numerically when both parse as numbers (Month "2" before
/// "10"), lexicographically otherwise ("2020-01" before "2020-02").
pub fn label_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Sum `value_col` per distinct non-null value of `group_col`. A group
/// whose values are all null still appears, with a total of 0.
pub fn group_sum(
    df: &DataFrame,
    group_col: &str,
    value_col: &str,
) -> Result<AggregateResult, AnalyticsError> {
    if df.height() == 0 {
        return Ok(AggregateResult::default());
    }

    let keys = frame::string_values(df, group_col)?;
    let values = frame::f64_values(df, value_col)?;

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        let Some(key) = key else { continue };
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        *totals.entry(key).or_insert(0.0) += value.unwrap_or(0.0);
    }

    Ok(AggregateResult::ranked(order, totals))
}

/// Count rows per distinct non-null value of `group_col`.
pub fn group_count(df: &DataFrame, group_col: &str) -> Result<AggregateResult, AnalyticsError> {
    if df.height() == 0 {
        return Ok(AggregateResult::default());
    }

    let keys = frame::string_values(df, group_col)?;

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for key in keys.into_iter().flatten() {
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        *totals.entry(key).or_insert(0.0) += 1.0;
    }

    Ok(AggregateResult::ranked(order, totals))
}

/// A 2-D table of summed values indexed by (row label, column label).
/// Labels are ordered ascending; absent combinations take the fill value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PivotMatrix {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

impl PivotMatrix {
    pub fn cell_total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}

/// Sum `value_col` into a (row_col × col_col) matrix. Rows with a null key
/// on either axis are left out.
pub fn pivot(
    df: &DataFrame,
    row_col: &str,
    col_col: &str,
    value_col: &str,
    fill: f64,
) -> Result<PivotMatrix, AnalyticsError> {
    if df.height() == 0 {
        return Ok(PivotMatrix::default());
    }

    let row_keys = frame::string_values(df, row_col)?;
    let col_keys = frame::string_values(df, col_col)?;
    let values = frame::f64_values(df, value_col)?;

    let mut sums: HashMap<(String, String), f64> = HashMap::new();
    for ((row, col), value) in row_keys.into_iter().zip(col_keys).zip(values) {
        let (Some(row), Some(col)) = (row, col) else {
            continue;
        };
        *sums.entry((row, col)).or_insert(0.0) += value.unwrap_or(0.0);
    }

    let mut row_labels: Vec<String> = sums
        .keys()
        .map(|(row, _)| row.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    row_labels.sort_by(|a, b| label_order(a, b));

    let mut col_labels: Vec<String> = sums
        .keys()
        .map(|(_, col)| col.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    col_labels.sort_by(|a, b| label_order(a, b));

    let cells = row_labels
        .iter()
        .map(|row| {
            col_labels
                .iter()
                .map(|col| {
                    sums.get(&(row.clone(), col.clone()))
                        .copied()
                        .unwrap_or(fill)
                })
                .collect()
        })
        .collect();

    Ok(PivotMatrix {
        row_labels,
        col_labels,
        cells,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Month,
    Year,
}

/// Sum `value_col` per calendar bucket, sorted chronologically ascending,
/// the one aggregate not ranked by value. Rows whose date failed to parse
/// have a null bucket and are excluded.
pub fn time_series(
    df: &DataFrame,
    value_col: &str,
    granularity: Granularity,
) -> Result<AggregateResult, AnalyticsError> {
    if df.height() == 0 {
        return Ok(AggregateResult::default());
    }

    let key_col = match granularity {
        Granularity::Month => schema::MONTH_YEAR,
        Granularity::Year => schema::YEAR,
    };

    let keys = frame::string_values(df, key_col)?;
    let values = frame::f64_values(df, value_col)?;

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        let Some(key) = key else { continue };
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        *totals.entry(key).or_insert(0.0) += value.unwrap_or(0.0);
    }

    Ok(AggregateResult::chronological(order, totals))
}

/// Most frequent non-null value of `column`; ties resolve to the
/// lexicographically smallest. `None` when the column holds no values.
pub fn mode_value(df: &DataFrame, column: &str) -> Result<Option<String>, AnalyticsError> {
    if df.height() == 0 {
        return Ok(None);
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in frame::string_values(df, column)?.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    Ok(counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(value, _)| value))
}

/// Distinct entity names whose per-row value lies within
/// `[center·(1−tolerance), center·(1+tolerance)]`, excluding `exclude`,
/// ordered by value descending and capped at [`SIMILARITY_LIMIT`].
pub fn similarity_band(
    df: &DataFrame,
    entity_col: &str,
    value_col: &str,
    center: f64,
    tolerance: f64,
    exclude: &str,
) -> Result<Vec<String>, AnalyticsError> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let low = center * (1.0 - tolerance);
    let high = center * (1.0 + tolerance);

    let entities = frame::string_values(df, entity_col)?;
    let values = frame::f64_values(df, value_col)?;

    let mut in_band: Vec<(String, f64)> = entities
        .into_iter()
        .zip(values)
        .filter_map(|(entity, value)| Some((entity?, value?)))
        .filter(|(entity, value)| entity != exclude && *value >= low && *value <= high)
        .collect();
    in_band.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut seen = HashSet::new();
    Ok(in_band
        .into_iter()
        .map(|(entity, _)| entity)
        .filter(|entity| seen.insert(entity.clone()))
        .take(SIMILARITY_LIMIT)
        .collect())
}
