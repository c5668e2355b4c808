//! Dataset Loader Module
//! Loads the funding and investor tables from CSV using Polars and derives
//! the calendar columns every time-based aggregate groups by.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::{frame, schema};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Source file not found: {0}")]
    SourceMissing(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: String, column: String },
}

/// Date shapes accepted by the loader; anything else nulls out.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// The two normalized tables, loaded once and read-only afterwards.
pub struct Dataset {
    funding: DataFrame,
    investors: DataFrame,
}

impl Dataset {
    /// Load both tables. A missing file or a missing required column is a
    /// hard failure; an unparsable date value is not (the row stays, with
    /// null date and calendar fields).
    pub fn load(funding_path: &Path, investors_path: &Path) -> Result<Self, LoaderError> {
        let funding = read_table(funding_path)?;
        require_columns(&funding, &schema::FUNDING_REQUIRED, "funding")?;
        let funding = normalize(funding, "funding")?;

        let investors = read_table(investors_path)?;
        require_columns(&investors, &schema::INVESTOR_REQUIRED, "investors")?;
        let investors = normalize(investors, "investors")?;

        info!(
            "loaded dataset: {} funding rows, {} investor rows",
            funding.height(),
            investors.height()
        );

        Ok(Self { funding, investors })
    }

    pub fn funding(&self) -> &DataFrame {
        &self.funding
    }

    pub fn investors(&self) -> &DataFrame {
        &self.investors
    }

    /// Sorted distinct startup names, for selection lists.
    pub fn startup_names(&self) -> Vec<String> {
        frame::distinct_sorted(&self.funding, schema::STARTUP).unwrap_or_default()
    }

    /// Sorted distinct investor names from the attribution table.
    pub fn investor_names(&self) -> Vec<String> {
        frame::distinct_sorted(&self.investors, schema::INVESTOR).unwrap_or_default()
    }
}

fn read_table(path: &Path) -> Result<DataFrame, LoaderError> {
    if !path.is_file() {
        return Err(LoaderError::SourceMissing(path.to_path_buf()));
    }

    // Lazy scan with inference, then collect; bad cells become nulls
    // instead of aborting the read.
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    Ok(df)
}

fn require_columns(df: &DataFrame, required: &[&str], table: &str) -> Result<(), LoaderError> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for column in required {
        if !present.iter().any(|name| name == column) {
            return Err(LoaderError::MissingColumn {
                table: table.to_string(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Rewrite `Date` to ISO strings, derive `Year`/`Month`/`MonthYear`, and
/// cast the amount column to `Float64`.
fn normalize(df: DataFrame, table: &str) -> Result<DataFrame, LoaderError> {
    let height = df.height();
    let raw_dates = frame::string_values(&df, schema::DATE)?;

    let mut dates: Vec<Option<String>> = Vec::with_capacity(height);
    let mut years: Vec<Option<i32>> = Vec::with_capacity(height);
    let mut months: Vec<Option<i32>> = Vec::with_capacity(height);
    let mut month_years: Vec<Option<String>> = Vec::with_capacity(height);
    let mut unparsable = 0usize;

    for raw in &raw_dates {
        match raw.as_deref().and_then(parse_date) {
            Some(date) => {
                dates.push(Some(date.format("%Y-%m-%d").to_string()));
                years.push(Some(date.year()));
                months.push(Some(date.month() as i32));
                month_years.push(Some(format!("{:04}-{:02}", date.year(), date.month())));
            }
            None => {
                if raw.is_some() {
                    unparsable += 1;
                }
                dates.push(None);
                years.push(None);
                months.push(None);
                month_years.push(None);
            }
        }
    }

    if unparsable > 0 {
        warn!("{table} table: {unparsable} unparsable date(s) set to null");
    }

    let amount = df.column(schema::AMOUNT)?.cast(&DataType::Float64)?;

    let df = df.drop(schema::DATE)?.drop(schema::AMOUNT)?;
    let df = df.hstack(&[
        Column::new(schema::DATE.into(), dates),
        Column::new(schema::YEAR.into(), years),
        Column::new(schema::MONTH.into(), months),
        Column::new(schema::MONTH_YEAR.into(), month_years),
        amount,
    ])?;

    Ok(df)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
