//! # holiday-engine
//!
//! Market holiday calendars built from recurrence rules.
//!
//! A jurisdiction's non-trading days are the union of recurring holidays
//! (fixed dates, nth weekday of a month, Easter offsets), their weekend
//! observances, and a ledger of one-off closures. Fixed and weekday patterns
//! expand through the `rrule` crate; the merged result is a sorted,
//! duplicate-free [`HolidaySet`].
//!
//! ## Modules
//!
//! - [`rule`]: recurrence rules and named holiday rules
//! - [`observance`]: weekend observance shifts
//! - [`exceptions`]: one-off closures
//! - [`ruleset`]: per-jurisdiction rule sets and their merge
//! - [`holiday_set`]: the sorted output of a merge
//! - [`store`]: cached holiday sets and trading-day queries
//! - [`jurisdictions`]: built-in rule sets
//! - [`expander`]: RRULE body to calendar dates
//! - [`easter`]: Gregorian Easter Sunday
//! - [`window`]: date windows and timestamp normalization
//! - [`config`]: store window configuration
//! - [`error`]: error types
//!
//! ```
//! use chrono::NaiveDate;
//! use holiday_engine::{CalendarStore, DateWindow};
//!
//! let window = DateWindow::new(
//!     NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2015, 12, 31).unwrap(),
//! )
//! .unwrap();
//! let store = CalendarStore::with_window(window);
//!
//! // July 4, 2015 was a Saturday; the exchange closed on Friday the 3rd.
//! let friday = NaiveDate::from_ymd_opt(2015, 7, 3).unwrap();
//! assert!(store.is_holiday("US", friday).unwrap());
//! ```

pub mod config;
pub mod easter;
pub mod error;
pub mod exceptions;
pub mod expander;
pub mod holiday_set;
pub mod jurisdictions;
pub mod observance;
pub mod rule;
pub mod ruleset;
pub mod store;
pub mod window;

pub use config::StoreConfig;
pub use easter::easter_sunday;
pub use error::{HolidayError, Result};
pub use exceptions::{ExceptionEntry, ExceptionLedger};
pub use holiday_set::HolidaySet;
pub use rule::{nth_weekday_of_month, HolidayRule, RecurrenceRule};
pub use ruleset::{RuleSet, RuleSetBuilder};
pub use store::CalendarStore;
pub use window::{canonical_date, canonical_date_in, is_weekend, DateWindow};

use chrono::NaiveDate;

/// Whether `date` is a holiday in `jurisdiction`, using the process-wide store.
pub fn is_holiday(jurisdiction: &str, date: NaiveDate) -> Result<bool> {
    CalendarStore::global().is_holiday(jurisdiction, date)
}

/// Holidays in `start..=end` for `jurisdiction`, using the process-wide store.
pub fn holidays_in(
    jurisdiction: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    CalendarStore::global().holidays_in(jurisdiction, start, end)
}
