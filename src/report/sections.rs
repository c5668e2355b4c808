//! Report Sections Module
//! Containers the view assemblers hand to the rendering layer.

use polars::prelude::DataFrame;
use serde::Serialize;

use crate::analytics::{AggregateResult, AnalyticsError, PivotMatrix};
use crate::data::frame;

/// An ordered set of labeled results making up one view.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: SectionValue) {
        self.sections.push(Section {
            label: label.into(),
            value,
        });
    }

    pub fn section(&self, label: &str) -> Option<&SectionValue> {
        self.sections
            .iter()
            .find(|section| section.label == label)
            .map(|section| &section.value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub label: String,
    pub value: SectionValue,
}

#[derive(Debug, Clone, Serialize)]
pub enum SectionValue {
    /// Single numeric metric; `None` when there is no data to compute it.
    Metric(Option<f64>),
    /// Single text value; `None` when unresolved.
    Text(Option<String>),
    TextList(Vec<String>),
    Table(AggregateResult),
    DualSeries(DualSeries),
    Pivot(PivotMatrix),
    Records(SubTable),
}

/// Two aligned series over the same keys, e.g. monthly funding totals next
/// to monthly deal counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DualSeries {
    pub keys: Vec<String>,
    pub primary: Vec<f64>,
    pub secondary: Vec<f64>,
}

impl DualSeries {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A stringified slice of table rows, for drill-down listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SubTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Project `columns` out of `df`, taking rows by index in `order`.
    /// Null cells become empty strings.
    pub fn from_frame(
        df: &DataFrame,
        columns: &[&str],
        order: &[usize],
    ) -> Result<Self, AnalyticsError> {
        let names: Vec<String> = columns.iter().map(|column| column.to_string()).collect();
        if df.height() == 0 {
            return Ok(Self {
                columns: names,
                rows: Vec::new(),
            });
        }

        let mut extracted = Vec::with_capacity(columns.len());
        for column in columns {
            extracted.push(frame::string_values(df, column)?);
        }

        let rows = order
            .iter()
            .map(|&i| {
                extracted
                    .iter()
                    .map(|values| values[i].clone().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self {
            columns: names,
            rows,
        })
    }
}
