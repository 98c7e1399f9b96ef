//! RRULE expansion -- turns an RFC 5545 recurrence body into calendar dates.
//!
//! Wraps the `rrule` crate (v0.13). Every expansion runs in UTC at midnight, so
//! each instance maps onto exactly one calendar date.

use crate::error::{HolidayError, Result};
use crate::window::DateWindow;
use chrono::{Datelike, NaiveDate, Utc};
use rrule::RRuleSet;

const ICAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Expand an RRULE body (e.g. "FREQ=MONTHLY;BYMONTH=7;BYMONTHDAY=4") into the
/// dates it produces inside `window`, ascending.
///
/// `DTSTART` is pinned to January 1 of the window's first year and `UNTIL` to the
/// window end, so the rule body must not carry its own `DTSTART`, `UNTIL` or `COUNT`.
///
/// # Errors
/// Returns `HolidayError::InvalidRule` if the body is empty or `rrule` rejects it.
pub fn expand_dates(rrule: &str, window: &DateWindow) -> Result<Vec<NaiveDate>> {
    if rrule.is_empty() {
        return Err(HolidayError::InvalidRule("empty RRULE string".to_string()));
    }

    let upper = rrule.to_uppercase();
    if upper.contains("UNTIL=") || upper.contains("COUNT=") {
        return Err(HolidayError::InvalidRule(format!(
            "RRULE must not bound itself: {}",
            rrule
        )));
    }

    let first_year = window.start().with_ordinal(1).ok_or_else(|| {
        HolidayError::Expansion(format!("no January 1 before {}", window.start()))
    })?;
    let dtstart = first_year
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| HolidayError::Expansion("midnight out of range".to_string()))?;
    let until = window
        .end()
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| HolidayError::Expansion("midnight out of range".to_string()))?;

    // The rrule crate requires UNTIL and DTSTART to share the same timezone.
    // For UTC, UNTIL must end with "Z".
    let rrule_text = format!(
        "DTSTART;TZID=UTC:{}\nRRULE:{};UNTIL={}Z",
        dtstart.format(ICAL_FORMAT),
        rrule,
        until.format(ICAL_FORMAT)
    );

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| HolidayError::InvalidRule(format!("{}", e)))?;

    // Holiday bodies match at most a few days per month, so a month-granular
    // cap never truncates a bounded window.
    let months = (window.years().count() as u64) * 12 * 5;
    let max_count = u16::try_from(months).unwrap_or(u16::MAX);

    let instances = rrule_set.all(max_count);
    if instances.limited {
        return Err(HolidayError::Expansion(format!(
            "{} produced more than {} instances over {}",
            rrule, max_count, window
        )));
    }

    Ok(instances
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .filter(|date| window.contains(*date))
        .collect())
}
