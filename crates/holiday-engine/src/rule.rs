//! Recurrence rules -- one holiday pattern each, evaluated over a date window.
//!
//! A [`RecurrenceRule`] is a closed set of patterns: fixed day of month, nth
//! weekday of month, Easter-relative offset, and the weekend-observance shift
//! that wraps any of them. Calendar-style patterns expand through RRULE bodies
//! (see [`crate::expander`]); Easter is computed directly.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::easter::easter_sunday;
use crate::error::{HolidayError, Result};
use crate::expander::expand_dates;
use crate::observance;
use crate::window::DateWindow;

/// A single holiday pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// The same month and day every year (e.g. July 4).
    FixedMonthDay { month: u32, day: u32 },
    /// The nth `weekday` of `month`. Negative `n` counts from the end of the month.
    NthWeekdayOfMonth { month: u32, weekday: Weekday, n: i8 },
    /// A signed day offset from Western Easter Sunday.
    EasterOffset { days: i32 },
    /// Weekend observance of `base`: Saturday occurrences move by `on_saturday`
    /// days, Sunday occurrences by `on_sunday`. Weekday occurrences yield nothing.
    ObservedShift {
        base: Box<RecurrenceRule>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_saturday: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_sunday: Option<i32>,
    },
}

impl RecurrenceRule {
    pub fn fixed(month: u32, day: u32) -> Self {
        Self::FixedMonthDay { month, day }
    }

    pub fn nth_weekday(month: u32, weekday: Weekday, n: i8) -> Self {
        Self::NthWeekdayOfMonth { month, weekday, n }
    }

    pub fn easter(days: i32) -> Self {
        Self::EasterOffset { days }
    }

    pub fn observed(
        base: RecurrenceRule,
        on_saturday: Option<i32>,
        on_sunday: Option<i32>,
    ) -> Self {
        Self::ObservedShift {
            base: Box::new(base),
            on_saturday,
            on_sunday,
        }
    }

    /// The usual US convention: Saturday → Friday, Sunday → Monday.
    pub fn weekend_observed(base: RecurrenceRule) -> Self {
        Self::observed(base, Some(-1), Some(1))
    }

    /// Check field ranges.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRule` for an out-of-range month, a day that
    /// no year of that month can hold, an `n` of zero or beyond five, or an
    /// observance shift with no offsets.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::FixedMonthDay { month, day } => {
                check_month(*month)?;
                if *day == 0 || *day > max_days_in_month(*month) {
                    return Err(HolidayError::InvalidRule(format!(
                        "day {} never occurs in month {}",
                        day, month
                    )));
                }
                Ok(())
            }
            Self::NthWeekdayOfMonth { month, n, .. } => {
                check_month(*month)?;
                if *n == 0 || n.unsigned_abs() > 5 {
                    return Err(HolidayError::InvalidRule(format!(
                        "occurrence {} must be within -5..=-1 or 1..=5",
                        n
                    )));
                }
                Ok(())
            }
            Self::EasterOffset { .. } => Ok(()),
            Self::ObservedShift {
                base,
                on_saturday,
                on_sunday,
            } => {
                if on_saturday.is_none() && on_sunday.is_none() {
                    return Err(HolidayError::InvalidRule(
                        "observance shift needs a Saturday or Sunday offset".to_string(),
                    ));
                }
                base.validate()
            }
        }
    }

    /// Every date this rule produces inside `window`, ascending and unique.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRule` if [`validate`](Self::validate) fails
    /// or the RRULE expansion rejects the pattern.
    pub fn generate(&self, window: &DateWindow) -> Result<Vec<NaiveDate>> {
        self.validate()?;
        match self {
            Self::FixedMonthDay { .. } | Self::NthWeekdayOfMonth { .. } => {
                let body = self.rrule_body().unwrap_or_default();
                let mut dates = expand_dates(&body, window)?;
                dates.retain(|date| self.matches(*date));
                Ok(dates)
            }
            Self::EasterOffset { days } => Ok(easter_dates(*days, window)),
            Self::ObservedShift {
                base,
                on_saturday,
                on_sunday,
            } => observance::observed_dates(base, *on_saturday, *on_sunday, window),
        }
    }

    /// Whether `date` is an occurrence of this rule, ignoring any window.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            Self::FixedMonthDay { month, day } => date.month() == *month && date.day() == *day,
            Self::NthWeekdayOfMonth { month, weekday, n } => {
                nth_weekday_of_month(date.year(), *month, *weekday, *n) == Some(date)
            }
            Self::EasterOffset { days } => [date.year() - 1, date.year(), date.year() + 1]
                .into_iter()
                .filter_map(|year| easter_sunday(year).and_then(|e| offset(e, *days)))
                .any(|candidate| candidate == date),
            Self::ObservedShift {
                base,
                on_saturday,
                on_sunday,
            } => observance::is_observed_occurrence(base, *on_saturday, *on_sunday, date),
        }
    }

    /// RFC 5545 body for the calendar-style variants; `None` for Easter and
    /// observance shifts, which are computed rather than expanded.
    ///
    /// BYSETPOS picks the nth match inside each month, so a fifth occurrence
    /// that does not exist yields nothing for that month.
    pub fn rrule_body(&self) -> Option<String> {
        match self {
            Self::FixedMonthDay { month, day } => Some(format!(
                "FREQ=MONTHLY;BYMONTH={};BYMONTHDAY={}",
                month, day
            )),
            Self::NthWeekdayOfMonth { month, weekday, n } => Some(format!(
                "FREQ=MONTHLY;BYMONTH={};BYDAY={};BYSETPOS={}",
                month,
                ical_weekday(*weekday),
                n
            )),
            Self::EasterOffset { .. } | Self::ObservedShift { .. } => None,
        }
    }
}

/// A named rule with an optional first effective date.
///
/// Holidays that need both an unshifted rule and a weekend shift are two
/// `HolidayRule`s sharing the same `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRule {
    pub name: String,
    pub rule: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<NaiveDate>,
}

impl HolidayRule {
    pub fn new(name: impl Into<String>, rule: RecurrenceRule) -> Self {
        Self {
            name: name.into(),
            rule,
            effective_from: None,
        }
    }

    /// Suppress every occurrence before `date`.
    pub fn since(mut self, date: NaiveDate) -> Self {
        self.effective_from = Some(date);
        self
    }

    /// Dates inside `window` on or after `effective_from`.
    ///
    /// A rule that only takes effect after the window end contributes nothing.
    pub fn generate(&self, window: &DateWindow) -> Result<Vec<NaiveDate>> {
        let Some(effective) = window.restrict_from(self.effective_from) else {
            tracing::trace!(rule = %self.name, %window, "rule not yet effective");
            return Ok(Vec::new());
        };
        let dates = self.rule.generate(&effective)?;
        tracing::trace!(rule = %self.name, %window, count = dates.len(), "rule expanded");
        Ok(dates)
    }
}

/// The nth `weekday` of `month` in `year`.
///
/// Positive `n` scans forward from day 1, negative `n` backward from the last
/// day. Returns `None` for `n == 0` or when the month has fewer than `|n|`
/// such weekdays.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: i8) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let steps = 7 * (u32::from(n.unsigned_abs()) - 1);

    if n > 0 {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let lead =
            (weekday.num_days_from_monday() + 7 - first.weekday().num_days_from_monday()) % 7;
        let date = first.checked_add_days(Days::new(u64::from(lead + steps)))?;
        (date.month() == month).then_some(date)
    } else {
        let last = last_day_of_month(year, month)?;
        let lag = (last.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
        let date = last.checked_sub_days(Days::new(u64::from(lag + steps)))?;
        (date.month() == month).then_some(date)
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn easter_dates(days: i32, window: &DateWindow) -> Vec<NaiveDate> {
    // Offsets can cross a year boundary, so look one year either side.
    let years = (window.start().year() - 1)..=(window.end().year() + 1);
    years
        .filter_map(|year| easter_sunday(year).and_then(|e| offset(e, days)))
        .filter(|date| window.contains(*date))
        .collect()
}

pub(crate) fn offset(date: NaiveDate, days: i32) -> Option<NaiveDate> {
    let span = Days::new(u64::from(days.unsigned_abs()));
    if days >= 0 {
        date.checked_add_days(span)
    } else {
        date.checked_sub_days(span)
    }
}

fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(HolidayError::InvalidRule(format!(
            "month {} must be within 1..=12",
            month
        )))
    }
}

fn max_days_in_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn ical_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
