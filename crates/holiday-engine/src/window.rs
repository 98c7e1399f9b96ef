//! Date windows and timestamp normalization.
//!
//! Every rule is evaluated over an inclusive [`DateWindow`]. Timestamps are
//! reduced to their UTC calendar date before they meet a rule; the engine
//! never reasons about time of day.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

use crate::error::{HolidayError, Result};

/// An inclusive `[start, end]` range of calendar dates. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Build a window, rejecting `start > end` with [`HolidayError::InvalidRange`].
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(HolidayError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A window covering exactly one day.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Calendar years overlapping the window.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }

    /// Number of days in the window, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Narrow the window so it starts no earlier than `effective_from`.
    ///
    /// Returns `None` when `effective_from` postdates the window end. The
    /// window is never extended.
    pub fn restrict_from(&self, effective_from: Option<NaiveDate>) -> Option<Self> {
        match effective_from {
            Some(from) if from > self.end => None,
            Some(from) => Some(Self {
                start: self.start.max(from),
                end: self.end,
            }),
            None => Some(*self),
        }
    }

    /// Grow the window by `days` on both sides, saturating at the chrono date limits.
    pub fn widen(&self, days: u64) -> Self {
        let span = Days::new(days);
        Self {
            start: self.start.checked_sub_days(span).unwrap_or(NaiveDate::MIN),
            end: self.end.checked_add_days(span).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Reduce a timestamp to its calendar date in UTC.
pub fn canonical_date<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> NaiveDate {
    timestamp.with_timezone(&Utc).date_naive()
}

/// Reduce a wall-clock timestamp in an IANA zone (e.g. "America/New_York")
/// to its calendar date in UTC.
///
/// # Errors
/// Returns `HolidayError::InvalidTimezone` if the zone name does not parse, and
/// `HolidayError::Expansion` if the local time falls in a DST gap.
pub fn canonical_date_in(local: NaiveDateTime, timezone: &str) -> Result<NaiveDate> {
    let tz: chrono_tz::Tz = timezone
        .parse()
        .map_err(|_| HolidayError::InvalidTimezone(timezone.to_string()))?;

    // Ambiguous times (DST fall-back) resolve to the earlier instant.
    let instant = tz.from_local_datetime(&local).earliest().ok_or_else(|| {
        HolidayError::Expansion(format!("{} does not exist in {}", local, timezone))
    })?;

    Ok(canonical_date(&instant))
}

/// Saturday or Sunday. Weekends are never encoded as holiday rules.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
