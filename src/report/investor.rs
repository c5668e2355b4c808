//! Investor Report Module
//! Per-investor profile, combining exact attribution rows with substring
//! matches against the funding table's free-text investor lists.

use polars::prelude::DataFrame;
use std::cmp::Ordering;

use super::sections::{Report, SectionValue, SubTable};
use crate::analytics::{aggregate, filter, AnalyticsError, Granularity};
use crate::data::{frame, schema};

pub const TOTAL_INVESTMENT: &str = "Total Investment";
pub const RECENT_INVESTMENTS: &str = "Recent Investments";
pub const BIGGEST_INVESTMENTS: &str = "Biggest Investments";
pub const SECTOR_DISTRIBUTION: &str = "Sector Distribution";
pub const STAGE_DISTRIBUTION: &str = "Stage Distribution";
pub const CITY_DISTRIBUTION: &str = "City Distribution";
pub const YEAR_OVER_YEAR: &str = "Year over Year Investment";
pub const SIMILAR_INVESTORS: &str = "Similar Investors";

/// Band half-width, as a fraction of the investor's total, used to find
/// comparably sized investors.
pub const SIMILARITY_TOLERANCE: f64 = 0.2;

const RECENT_LIMIT: usize = 5;
const BIGGEST_LIMIT: usize = 5;
const TOP_N: usize = 10;

pub fn investor_report(
    funding: &DataFrame,
    investors: &DataFrame,
    name: &str,
) -> Result<Report, AnalyticsError> {
    // Totals come from the attribution table (exact match); deal listings
    // come from the funding table, where the investor column is free text.
    let attributed = filter::equals(investors, schema::INVESTOR, name)?;
    let deals = filter::contains_ci(funding, schema::INVESTOR, name)?;

    let total: f64 = if attributed.height() == 0 {
        0.0
    } else {
        frame::f64_values(&attributed, schema::AMOUNT)?
            .into_iter()
            .flatten()
            .sum()
    };

    let mut report = Report::new("Investor Analysis");
    report.push(TOTAL_INVESTMENT, SectionValue::Metric(Some(total)));

    // Five most recent deals, newest first, undated rows last
    let dates: Vec<Option<String>> = if deals.height() == 0 {
        Vec::new()
    } else {
        frame::string_values(&deals, schema::DATE)?
    };
    let mut order: Vec<usize> = (0..deals.height()).collect();
    order.sort_by(|&i, &j| match (&dates[i], &dates[j]) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    order.truncate(RECENT_LIMIT);
    report.push(
        RECENT_INVESTMENTS,
        SectionValue::Records(SubTable::from_frame(
            &deals,
            &[
                schema::DATE,
                schema::STARTUP,
                schema::VERTICAL,
                schema::CITY,
                schema::ROUND,
                schema::AMOUNT,
            ],
            &order,
        )?),
    );

    report.push(
        BIGGEST_INVESTMENTS,
        SectionValue::Table(
            aggregate::group_sum(&deals, schema::STARTUP, schema::AMOUNT)?.top_n(BIGGEST_LIMIT),
        ),
    );
    report.push(
        SECTOR_DISTRIBUTION,
        SectionValue::Table(
            aggregate::group_sum(&deals, schema::VERTICAL, schema::AMOUNT)?.top_n(TOP_N),
        ),
    );
    report.push(
        STAGE_DISTRIBUTION,
        SectionValue::Table(
            aggregate::group_sum(&deals, schema::ROUND, schema::AMOUNT)?.top_n(TOP_N),
        ),
    );
    report.push(
        CITY_DISTRIBUTION,
        SectionValue::Table(
            aggregate::group_sum(&deals, schema::CITY, schema::AMOUNT)?.top_n(TOP_N),
        ),
    );
    report.push(
        YEAR_OVER_YEAR,
        SectionValue::Table(aggregate::time_series(
            &deals,
            schema::AMOUNT,
            Granularity::Year,
        )?),
    );

    // Investors whose attribution rows land near this investor's total
    let similar = if attributed.height() == 0 {
        Vec::new()
    } else {
        aggregate::similarity_band(
            investors,
            schema::INVESTOR,
            schema::AMOUNT,
            total,
            SIMILARITY_TOLERANCE,
            name,
        )?
    };
    report.push(SIMILAR_INVESTORS, SectionValue::TextList(similar));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn funding_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Startup".into(), vec!["Alpha", "Beta", "Gamma"]),
            Column::new("Vertical".into(), vec!["Fintech", "Edtech", "Fintech"]),
            Column::new("City".into(), vec!["Mumbai", "Pune", "Delhi"]),
            Column::new(
                "Investor".into(),
                vec![
                    "Acme Capital, Beta Fund",
                    "acme capital",
                    "Gamma Ventures",
                ],
            ),
            Column::new(
                "Investment Round".into(),
                vec!["Seed", "Series A", "Seed"],
            ),
            Column::new(
                "Date".into(),
                vec![Some("2020-01-15"), Some("2021-02-05"), Some("2020-03-01")],
            ),
            Column::new("Year".into(), vec![Some(2020_i32), Some(2021), Some(2020)]),
            Column::new("Month".into(), vec![Some(1_i32), Some(2), Some(3)]),
            Column::new(
                "MonthYear".into(),
                vec![Some("2020-01"), Some("2021-02"), Some("2020-03")],
            ),
            Column::new("Amount in INR".into(), vec![10.0_f64, 5.0, 20.0]),
        ])
        .unwrap()
    }

    fn investor_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "Investor".into(),
                vec![
                    "Acme Capital",
                    "Acme Capital",
                    "Beta Fund",
                    "Gamma Ventures",
                    "Delta Partners",
                ],
            ),
            Column::new(
                "Startup".into(),
                vec!["Alpha", "Beta", "Alpha", "Gamma", "Alpha"],
            ),
            Column::new(
                "Date".into(),
                vec![
                    Some("2020-01-15"),
                    Some("2021-02-05"),
                    Some("2020-01-15"),
                    Some("2020-03-01"),
                    Some("2020-05-01"),
                ],
            ),
            Column::new(
                "Year".into(),
                vec![Some(2020_i32), Some(2021), Some(2020), Some(2020), Some(2020)],
            ),
            Column::new("Month".into(), vec![Some(1_i32), Some(2), Some(1), Some(3), Some(5)]),
            Column::new(
                "MonthYear".into(),
                vec![
                    Some("2020-01"),
                    Some("2021-02"),
                    Some("2020-01"),
                    Some("2020-03"),
                    Some("2020-05"),
                ],
            ),
            Column::new(
                "Amount in INR".into(),
                vec![10.0_f64, 5.0, 14.0, 20.0, 16.0],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn total_comes_from_the_attribution_table() {
        let report = investor_report(&funding_frame(), &investor_frame(), "Acme Capital").unwrap();
        assert!(matches!(
            report.section(TOTAL_INVESTMENT),
            Some(SectionValue::Metric(Some(v))) if *v == 15.0
        ));
    }

    #[test]
    fn deal_listings_use_substring_attribution() {
        let report = investor_report(&funding_frame(), &investor_frame(), "Acme Capital").unwrap();

        // Both the co-investor list and the lowercase variant match
        let Some(SectionValue::Records(recent)) = report.section(RECENT_INVESTMENTS) else {
            panic!("expected records");
        };
        assert_eq!(recent.rows.len(), 2);
        // Newest first
        assert_eq!(recent.rows[0][0], "2021-02-05");
        assert_eq!(recent.rows[1][0], "2020-01-15");

        let Some(SectionValue::Table(biggest)) = report.section(BIGGEST_INVESTMENTS) else {
            panic!("expected table");
        };
        assert_eq!(biggest.get("Alpha"), Some(10.0));
        assert_eq!(biggest.get("Beta"), Some(5.0));
    }

    #[test]
    fn year_over_year_is_chronological() {
        let report = investor_report(&funding_frame(), &investor_frame(), "Acme Capital").unwrap();
        let Some(SectionValue::Table(yoy)) = report.section(YEAR_OVER_YEAR) else {
            panic!("expected table");
        };
        let keys: Vec<&str> = yoy.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["2020", "2021"]);
        assert_eq!(yoy.get("2020"), Some(10.0));
        assert_eq!(yoy.get("2021"), Some(5.0));
    }

    #[test]
    fn similar_investors_band_around_the_total() {
        let report = investor_report(&funding_frame(), &investor_frame(), "Acme Capital").unwrap();
        let Some(SectionValue::TextList(similar)) = report.section(SIMILAR_INVESTORS) else {
            panic!("expected text list");
        };
        // Band is [12, 18] around the total of 15: Beta Fund (14) and
        // Delta Partners (16) land inside, Gamma Ventures (20) does not.
        assert_eq!(similar, &["Delta Partners", "Beta Fund"]);
    }

    #[test]
    fn unmatched_investor_yields_zero_total_and_empty_sections() {
        let report = investor_report(&funding_frame(), &investor_frame(), "Nobody").unwrap();

        assert!(matches!(
            report.section(TOTAL_INVESTMENT),
            Some(SectionValue::Metric(Some(v))) if *v == 0.0
        ));
        let Some(SectionValue::Records(recent)) = report.section(RECENT_INVESTMENTS) else {
            panic!("expected records");
        };
        assert!(recent.is_empty());
        assert!(matches!(
            report.section(BIGGEST_INVESTMENTS),
            Some(SectionValue::Table(t)) if t.is_empty()
        ));
        assert!(matches!(
            report.section(SIMILAR_INVESTORS),
            Some(SectionValue::TextList(similar)) if similar.is_empty()
        ));
    }
}
