//! Fundscope - Startup Funding Data Analysis & Report Engine
//!
//! CLI front end: loads the dataset, assembles the requested report and
//! prints it. Selection inputs (view, startup or investor name) live here,
//! never in the library.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fundscope::data::Dataset;
use fundscope::report::{
    general_report, investor_report, startup_report, GeneralOptions, Report, SectionValue,
    SectorMode,
};

/// Explore a startup-funding dataset from the command line.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// CSV file with the funding transactions
    #[arg(long)]
    funding: PathBuf,

    /// CSV file with the per-investor attributions
    #[arg(long)]
    investors: PathBuf,

    /// Emit the report as JSON instead of text tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    view: View,
}

#[derive(Subcommand)]
enum View {
    /// Aggregate analysis over the whole dataset
    General {
        /// Weight the sector distribution by deal count or total funding
        #[arg(long, value_enum, default_value = "count")]
        sector_mode: SectorWeight,

        /// Restrict the top-startups section to one calendar year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Profile of a single startup
    Startup { name: String },
    /// Profile of a single investor
    Investor { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SectorWeight {
    Count,
    Amount,
}

impl From<SectorWeight> for SectorMode {
    fn from(weight: SectorWeight) -> Self {
        match weight {
            SectorWeight::Count => SectorMode::DealCount,
            SectorWeight::Amount => SectorMode::TotalFunding,
        }
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env).init();

    let cli = Cli::parse();
    let dataset = Dataset::load(&cli.funding, &cli.investors)?;

    let report = match &cli.view {
        View::General { sector_mode, year } => general_report(
            dataset.funding(),
            &GeneralOptions {
                sector_mode: (*sector_mode).into(),
                year: *year,
            },
        )?,
        View::Startup { name } => startup_report(dataset.funding(), name)?,
        View::Investor { name } => investor_report(dataset.funding(), dataset.investors(), name)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!("=== {} ===", report.title);
    for section in &report.sections {
        println!();
        println!("{}", section.label);
        match &section.value {
            SectionValue::Metric(Some(value)) => println!("  {value:.2}"),
            SectionValue::Metric(None) => println!("  no data"),
            SectionValue::Text(Some(text)) => println!("  {text}"),
            SectionValue::Text(None) => println!("  no data"),
            SectionValue::TextList(items) if items.is_empty() => println!("  no data"),
            SectionValue::TextList(items) => {
                for item in items {
                    println!("  - {item}");
                }
            }
            SectionValue::Table(result) => {
                let mut table = Table::new();
                table.set_header(vec!["Group", "Value"]);
                for row in &result.rows {
                    table.add_row(vec![row.key.clone(), format!("{:.2}", row.value)]);
                }
                println!("{table}");
            }
            SectionValue::DualSeries(series) => {
                let mut table = Table::new();
                table.set_header(vec!["Month", "Funding", "Deals"]);
                for (i, key) in series.keys.iter().enumerate() {
                    table.add_row(vec![
                        key.clone(),
                        format!("{:.2}", series.primary[i]),
                        format!("{:.0}", series.secondary[i]),
                    ]);
                }
                println!("{table}");
            }
            SectionValue::Pivot(matrix) => {
                let mut table = Table::new();
                let mut header = vec![String::new()];
                header.extend(matrix.col_labels.iter().cloned());
                table.set_header(header);
                for (label, cells) in matrix.row_labels.iter().zip(&matrix.cells) {
                    let mut row = vec![label.clone()];
                    row.extend(cells.iter().map(|cell| format!("{cell:.0}")));
                    table.add_row(row);
                }
                println!("{table}");
            }
            SectionValue::Records(records) if records.is_empty() => println!("  no data"),
            SectionValue::Records(records) => {
                let mut table = Table::new();
                table.set_header(records.columns.clone());
                for row in &records.rows {
                    table.add_row(row.clone());
                }
                println!("{table}");
            }
        }
    }
}
