//! General Report Module
//! Aggregate view over the whole funding table.

use polars::prelude::DataFrame;

use super::sections::{DualSeries, Report, SectionValue};
use crate::analytics::{aggregate, filter, AnalyticsError, Granularity};
use crate::data::{frame, schema};

pub const MONTH_OVER_MONTH: &str = "Month over Month Funding & Deal Count";
pub const TOTAL_FUNDING: &str = "Total Funding";
pub const MAX_FUNDING: &str = "Max Funding in a Single Deal";
pub const AVERAGE_FUNDING: &str = "Average Funding per Deal";
pub const SECTOR_DISTRIBUTION: &str = "Sector Distribution";
pub const ROUND_DISTRIBUTION: &str = "Investment Round Distribution";
pub const TOP_CITIES: &str = "Top Cities by Funding";
pub const TOP_STARTUPS: &str = "Top Funded Startups";
pub const TOP_INVESTORS: &str = "Top Investors";
pub const FUNDING_HEATMAP: &str = "Funding by Year and Month";

/// Distribution sections keep this many groups.
const TOP_N: usize = 10;

/// How the sector distribution is weighted; picked by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectorMode {
    #[default]
    DealCount,
    TotalFunding,
}

#[derive(Debug, Clone, Default)]
pub struct GeneralOptions {
    pub sector_mode: SectorMode,
    /// Restrict the top-startups section to one calendar year.
    pub year: Option<i32>,
}

pub fn general_report(
    funding: &DataFrame,
    options: &GeneralOptions,
) -> Result<Report, AnalyticsError> {
    let mut report = Report::new("General Analysis");

    // Month over month: funding totals and deal counts on shared keys
    let monthly_totals = aggregate::time_series(funding, schema::AMOUNT, Granularity::Month)?;
    let monthly_counts = aggregate::group_count(funding, schema::MONTH_YEAR)?;
    let mut dual = DualSeries::default();
    for row in &monthly_totals.rows {
        dual.keys.push(row.key.clone());
        dual.primary.push(row.value);
        dual.secondary.push(monthly_counts.get(&row.key).unwrap_or(0.0));
    }
    report.push(MONTH_OVER_MONTH, SectionValue::DualSeries(dual));

    // Key funding metrics
    let amounts: Vec<f64> = if funding.height() == 0 {
        Vec::new()
    } else {
        frame::f64_values(funding, schema::AMOUNT)?
            .into_iter()
            .flatten()
            .collect()
    };
    let total: f64 = amounts.iter().sum();
    let max = amounts.iter().copied().reduce(f64::max);
    let mean = if amounts.is_empty() {
        None
    } else {
        Some(total / amounts.len() as f64)
    };
    report.push(TOTAL_FUNDING, SectionValue::Metric(Some(total)));
    report.push(MAX_FUNDING, SectionValue::Metric(max));
    report.push(AVERAGE_FUNDING, SectionValue::Metric(mean));

    // Sector distribution, weighted per the caller's pick
    let sectors = match options.sector_mode {
        SectorMode::DealCount => aggregate::group_count(funding, schema::VERTICAL)?,
        SectorMode::TotalFunding => {
            aggregate::group_sum(funding, schema::VERTICAL, schema::AMOUNT)?
        }
    };
    report.push(SECTOR_DISTRIBUTION, SectionValue::Table(sectors.top_n(TOP_N)));

    report.push(
        ROUND_DISTRIBUTION,
        SectionValue::Table(aggregate::group_count(funding, schema::ROUND)?.top_n(TOP_N)),
    );
    report.push(
        TOP_CITIES,
        SectionValue::Table(
            aggregate::group_sum(funding, schema::CITY, schema::AMOUNT)?.top_n(TOP_N),
        ),
    );

    let startup_pool = match options.year {
        Some(selected) => filter::year(funding, selected)?,
        None => funding.clone(),
    };
    report.push(
        TOP_STARTUPS,
        SectionValue::Table(
            aggregate::group_sum(&startup_pool, schema::STARTUP, schema::AMOUNT)?.top_n(TOP_N),
        ),
    );
    report.push(
        TOP_INVESTORS,
        SectionValue::Table(
            aggregate::group_sum(funding, schema::INVESTOR, schema::AMOUNT)?.top_n(TOP_N),
        ),
    );
    report.push(
        FUNDING_HEATMAP,
        SectionValue::Pivot(aggregate::pivot(
            funding,
            schema::YEAR,
            schema::MONTH,
            schema::AMOUNT,
            0.0,
        )?),
    );

    Ok(report)
}
