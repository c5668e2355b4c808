//! Report module - view assemblers feeding the rendering layer

pub mod general;
pub mod investor;
pub mod sections;
pub mod startup;

pub use general::{general_report, GeneralOptions, SectorMode};
pub use investor::investor_report;
pub use sections::{DualSeries, Report, Section, SectionValue, SubTable};
pub use startup::startup_report;
