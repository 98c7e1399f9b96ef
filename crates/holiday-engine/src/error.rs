//! Error types for holiday-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::window::DateWindow;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HolidayError {
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Unknown jurisdiction: {0}")]
    UnknownJurisdiction(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Expansion error: {0}")]
    Expansion(String),

    #[error("{date} is outside the computed window {window}")]
    OutOfWindow { date: NaiveDate, window: DateWindow },
}

pub type Result<T> = std::result::Result<T, HolidayError>;
