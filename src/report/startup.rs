//! Startup Report Module
//! Per-startup profile assembled from the funding table.

use polars::prelude::DataFrame;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::sections::{Report, SectionValue, SubTable};
use crate::analytics::{aggregate, filter, AnalyticsError, SIMILARITY_LIMIT};
use crate::data::{frame, schema};

pub const NAME: &str = "Name";
pub const INDUSTRY: &str = "Industry";
pub const LOCATION: &str = "Location";
pub const TOTAL_FUNDING: &str = "Total Funding";
pub const ROUND_COUNT: &str = "Number of Funding Rounds";
pub const EARLIEST_DATE: &str = "Earliest Funding Date";
pub const LATEST_DATE: &str = "Latest Funding Date";
pub const TIMELINE: &str = "Funding Timeline";
pub const ROUNDS: &str = "Funding Rounds";
pub const CITIES: &str = "Cities with Funding Rounds";
pub const SIMILAR_COMPANIES: &str = "Similar Companies";

pub fn startup_report(funding: &DataFrame, name: &str) -> Result<Report, AnalyticsError> {
    let rows = filter::equals(funding, schema::STARTUP, name)?;
    let matched = rows.height() > 0;

    // Industry and location are the most frequent labels across the
    // startup's deals; deals can disagree on either.
    let industry = aggregate::mode_value(&rows, schema::VERTICAL)?
        .unwrap_or_else(|| schema::UNKNOWN.to_string());
    let location = aggregate::mode_value(&rows, schema::CITY)?
        .unwrap_or_else(|| schema::UNKNOWN.to_string());

    let mut report = Report::new("Startup Analysis");
    report.push(NAME, SectionValue::Text(Some(name.to_string())));
    report.push(INDUSTRY, SectionValue::Text(Some(industry.clone())));
    report.push(LOCATION, SectionValue::Text(Some(location)));

    let total: f64 = if matched {
        frame::f64_values(&rows, schema::AMOUNT)?
            .into_iter()
            .flatten()
            .sum()
    } else {
        0.0
    };
    report.push(TOTAL_FUNDING, SectionValue::Metric(Some(total)));

    // Round count is the number of distinct funding dates
    let dates: Vec<Option<String>> = if matched {
        frame::string_values(&rows, schema::DATE)?
    } else {
        Vec::new()
    };
    let distinct_dates: BTreeSet<&String> = dates.iter().flatten().collect();
    report.push(
        ROUND_COUNT,
        SectionValue::Metric(Some(distinct_dates.len() as f64)),
    );
    report.push(
        EARLIEST_DATE,
        SectionValue::Text(distinct_dates.iter().next().map(|d| (*d).clone())),
    );
    report.push(
        LATEST_DATE,
        SectionValue::Text(distinct_dates.iter().next_back().map(|d| (*d).clone())),
    );

    // Per-date sums, oldest first
    let timeline = aggregate::group_sum(&rows, schema::DATE, schema::AMOUNT)?.sorted_by_key();
    report.push(TIMELINE, SectionValue::Table(timeline));

    // Full round listing, oldest first, undated rows at the end
    let mut order: Vec<usize> = (0..rows.height()).collect();
    order.sort_by(|&i, &j| match (&dates[i], &dates[j]) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    report.push(
        ROUNDS,
        SectionValue::Records(SubTable::from_frame(
            &rows,
            &[schema::DATE, schema::INVESTOR, schema::AMOUNT],
            &order,
        )?),
    );

    let cities = if matched {
        frame::distinct_sorted(&rows, schema::CITY)?
    } else {
        Vec::new()
    };
    report.push(CITIES, SectionValue::TextList(cities));

    // Other startups in the same industry, by name
    let similar: Vec<String> = if matched {
        let same_industry = filter::equals(funding, schema::VERTICAL, &industry)?;
        frame::distinct_sorted(&same_industry, schema::STARTUP)?
            .into_iter()
            .filter(|startup| startup != name)
            .take(SIMILARITY_LIMIT)
            .collect()
    } else {
        Vec::new()
    };
    report.push(SIMILAR_COMPANIES, SectionValue::TextList(similar));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn funding_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "Startup".into(),
                vec!["Alpha", "Alpha", "Beta", "Gamma", "Delta"],
            ),
            Column::new(
                "Vertical".into(),
                vec!["Fintech", "Fintech", "Fintech", "Edtech", "Fintech"],
            ),
            Column::new(
                "City".into(),
                vec!["Mumbai", "Delhi", "Pune", "Pune", "Mumbai"],
            ),
            Column::new(
                "Investor".into(),
                vec!["Acme Capital", "Beta Fund", "Acme Capital", "Beta Fund", "Acme Capital"],
            ),
            Column::new(
                "Investment Round".into(),
                vec!["Seed", "Series A", "Seed", "Seed", "Seed"],
            ),
            Column::new(
                "Date".into(),
                vec![
                    Some("2020-01-15"),
                    Some("2020-02-05"),
                    Some("2020-03-01"),
                    None,
                    Some("2021-06-01"),
                ],
            ),
            Column::new(
                "Year".into(),
                vec![Some(2020_i32), Some(2020), Some(2020), None, Some(2021)],
            ),
            Column::new(
                "Month".into(),
                vec![Some(1_i32), Some(2), Some(3), None, Some(6)],
            ),
            Column::new(
                "MonthYear".into(),
                vec![
                    Some("2020-01"),
                    Some("2020-02"),
                    Some("2020-03"),
                    None,
                    Some("2021-06"),
                ],
            ),
            Column::new(
                "Amount in INR".into(),
                vec![Some(10.0_f64), Some(5.0), Some(20.0), Some(3.0), Some(8.0)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn profile_summarizes_the_selected_startup() {
        let report = startup_report(&funding_frame(), "Alpha").unwrap();

        assert!(matches!(
            report.section(TOTAL_FUNDING),
            Some(SectionValue::Metric(Some(v))) if *v == 15.0
        ));
        assert!(matches!(
            report.section(ROUND_COUNT),
            Some(SectionValue::Metric(Some(v))) if *v == 2.0
        ));
        assert!(matches!(
            report.section(EARLIEST_DATE),
            Some(SectionValue::Text(Some(d))) if d == "2020-01-15"
        ));
        assert!(matches!(
            report.section(LATEST_DATE),
            Some(SectionValue::Text(Some(d))) if d == "2020-02-05"
        ));
        assert!(matches!(
            report.section(INDUSTRY),
            Some(SectionValue::Text(Some(v))) if v == "Fintech"
        ));
    }

    #[test]
    fn rounds_are_listed_chronologically() {
        let report = startup_report(&funding_frame(), "Alpha").unwrap();
        let Some(SectionValue::Records(rounds)) = report.section(ROUNDS) else {
            panic!("expected records");
        };
        assert_eq!(rounds.rows.len(), 2);
        assert_eq!(rounds.rows[0][0], "2020-01-15");
        assert_eq!(rounds.rows[1][0], "2020-02-05");
        assert_eq!(rounds.rows[0][1], "Acme Capital");
    }

    #[test]
    fn cities_are_distinct_and_sorted() {
        let report = startup_report(&funding_frame(), "Alpha").unwrap();
        assert!(matches!(
            report.section(CITIES),
            Some(SectionValue::TextList(cities)) if cities == &["Delhi", "Mumbai"]
        ));
    }

    #[test]
    fn similar_companies_share_the_industry_and_exclude_self() {
        let report = startup_report(&funding_frame(), "Alpha").unwrap();
        assert!(matches!(
            report.section(SIMILAR_COMPANIES),
            Some(SectionValue::TextList(similar)) if similar == &["Beta", "Delta"]
        ));
    }

    #[test]
    fn unknown_startup_yields_empty_profile() {
        let report = startup_report(&funding_frame(), "Nope").unwrap();

        assert!(matches!(
            report.section(TOTAL_FUNDING),
            Some(SectionValue::Metric(Some(v))) if *v == 0.0
        ));
        assert!(matches!(
            report.section(ROUND_COUNT),
            Some(SectionValue::Metric(Some(v))) if *v == 0.0
        ));
        assert!(matches!(
            report.section(EARLIEST_DATE),
            Some(SectionValue::Text(None))
        ));
        assert!(matches!(
            report.section(INDUSTRY),
            Some(SectionValue::Text(Some(v))) if v == schema::UNKNOWN
        ));
        assert!(matches!(
            report.section(SIMILAR_COMPANIES),
            Some(SectionValue::TextList(similar)) if similar.is_empty()
        ));
        let Some(SectionValue::Records(rounds)) = report.section(ROUNDS) else {
            panic!("expected records");
        };
        assert!(rounds.is_empty());
    }

    #[test]
    fn undated_rounds_sort_last_but_still_count_in_totals() {
        let report = startup_report(&funding_frame(), "Gamma").unwrap();
        assert!(matches!(
            report.section(TOTAL_FUNDING),
            Some(SectionValue::Metric(Some(v))) if *v == 3.0
        ));
        assert!(matches!(
            report.section(ROUND_COUNT),
            Some(SectionValue::Metric(Some(v))) if *v == 0.0
        ));
        let Some(SectionValue::Records(rounds)) = report.section(ROUNDS) else {
            panic!("expected records");
        };
        assert_eq!(rounds.rows.len(), 1);
        assert_eq!(rounds.rows[0][0], "");
    }
}
