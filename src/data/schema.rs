//! Column Contract Module
//! Column names the loader requires and the engine addresses tables by.

/// Funding event date, normalized to `YYYY-MM-DD` strings at load time.
pub const DATE: &str = "Date";
pub const STARTUP: &str = "Startup";
/// Industry sector classification.
pub const VERTICAL: &str = "Vertical";
pub const CITY: &str = "City";
/// Free text in the funding table; may list several co-investors.
pub const INVESTOR: &str = "Investor";
/// Funding stage label (seed, series A, ...).
pub const ROUND: &str = "Investment Round";
/// Deal amount in INR crore.
pub const AMOUNT: &str = "Amount in INR";

// Calendar columns derived from `Date` at load time; null when the date
// could not be parsed.
pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const MONTH_YEAR: &str = "MonthYear";

/// Columns the funding table must provide; absence is a hard load failure.
pub const FUNDING_REQUIRED: [&str; 7] =
    [DATE, STARTUP, VERTICAL, CITY, INVESTOR, ROUND, AMOUNT];

/// Columns the investor attribution table must provide.
pub const INVESTOR_REQUIRED: [&str; 4] = [DATE, STARTUP, INVESTOR, AMOUNT];

/// Rendered in place of a value that could not be resolved.
pub const UNKNOWN: &str = "Unknown";
