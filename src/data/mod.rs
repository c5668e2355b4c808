//! Data module - dataset loading and the column contract

pub mod frame;
mod loader;
pub mod schema;

pub use loader::{Dataset, LoaderError};
