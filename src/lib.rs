//! Fundscope - Startup Funding Data Analysis & Report Engine
//!
//! Loads a startup-funding dataset and assembles aggregate, per-startup and
//! per-investor reports for an external rendering layer.

pub mod analytics;
pub mod data;
pub mod report;
