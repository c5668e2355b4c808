//! Column Access Module
//! Row-wise extraction of string and numeric columns from a DataFrame.

use polars::prelude::*;

/// Convert a cell to its string form; nulls become `None`.
pub fn opt_string(value: &AnyValue) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(value.to_string().trim_matches('"').to_string())
    }
}

/// Extract a column as per-row optional strings.
pub fn string_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(column)?;
    (0..df.height())
        .map(|i| Ok(opt_string(&series.get(i)?)))
        .collect()
}

/// Extract a column as per-row optional floats, casting to `Float64` first.
/// Cells that do not cast (and NaNs) become `None`.
pub fn f64_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<f64>>> {
    let cast = df.column(column)?.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Distinct non-null values of a column, sorted ascending.
pub fn distinct_sorted(df: &DataFrame, column: &str) -> PolarsResult<Vec<String>> {
    let values = string_values(df, column)?;
    let set: std::collections::BTreeSet<String> = values.into_iter().flatten().collect();
    Ok(set.into_iter().collect())
}
