//! Weekend observance -- substitute weekdays for holidays that land on a weekend.
//!
//! An observance shift never recomputes its base condition. It consumes the
//! base rule's generated dates and re-emits the weekend ones at an offset, so
//! the base and its observed days cannot drift apart.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::Result;
use crate::rule::{offset, RecurrenceRule};
use crate::window::DateWindow;

/// The offset that applies to `date`, if it is a weekend day with a configured shift.
pub fn shift_for(date: NaiveDate, on_saturday: Option<i32>, on_sunday: Option<i32>) -> Option<i32> {
    match date.weekday() {
        Weekday::Sat => on_saturday,
        Weekday::Sun => on_sunday,
        _ => None,
    }
}

/// Observed substitutes for `base` inside `window`, ascending and unique.
///
/// The base rule is evaluated over the window widened by the largest offset so
/// that a weekend occurrence just outside the window still yields an observed
/// day inside it (e.g. Sunday January 1 observed on Monday January 2).
pub fn observed_dates(
    base: &RecurrenceRule,
    on_saturday: Option<i32>,
    on_sunday: Option<i32>,
    window: &DateWindow,
) -> Result<Vec<NaiveDate>> {
    let reach = on_saturday
        .into_iter()
        .chain(on_sunday)
        .map(i32::unsigned_abs)
        .max()
        .unwrap_or(0);

    let mut dates: Vec<NaiveDate> = base
        .generate(&window.widen(u64::from(reach)))?
        .into_iter()
        .filter_map(|date| {
            let days = shift_for(date, on_saturday, on_sunday)?;
            offset(date, days)
        })
        .filter(|date| window.contains(*date))
        .collect();

    dates.sort_unstable();
    dates.dedup();
    Ok(dates)
}

/// Whether `date` is the observed substitute of some weekend occurrence of `base`.
pub fn is_observed_occurrence(
    base: &RecurrenceRule,
    on_saturday: Option<i32>,
    on_sunday: Option<i32>,
    date: NaiveDate,
) -> bool {
    [(Weekday::Sat, on_saturday), (Weekday::Sun, on_sunday)]
        .into_iter()
        .filter_map(|(weekday, days)| {
            let origin = offset(date, days?.checked_neg()?)?;
            (origin.weekday() == weekday).then_some(origin)
        })
        .any(|origin| base.matches(origin))
}
