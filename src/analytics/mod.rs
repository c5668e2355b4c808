//! Analytics module - the stateless aggregation engine

pub mod aggregate;
pub mod filter;

pub use aggregate::{
    AggregateResult, AggregateRow, AnalyticsError, Granularity, PivotMatrix, SIMILARITY_LIMIT,
};
