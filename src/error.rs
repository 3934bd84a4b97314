//! Error types for loading, normalizing, querying and exporting.

use thiserror::Error;

/// Failure to read the source dataset. Fatal to startup: no partial
/// dataset is produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV header could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header is missing one or more required columns.
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns {
        /// Names of every required column absent from the header.
        missing: Vec<String>,
    },
}

/// A single row's (year, month, day) does not form a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid calendar date: year {year}, month {month}, day {day}")]
pub struct DateConstructionError {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The selection's lower year bound is above its upper bound.
    #[error("invalid year range: {year_min} > {year_max}")]
    InvalidRange { year_min: i32, year_max: i32 },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
