//! Built-in jurisdictions.
//!
//! `US` follows the New York Stock Exchange closure schedule.

use chrono::{NaiveDate, Weekday};

use crate::exceptions::ExceptionEntry;
use crate::rule::{HolidayRule, RecurrenceRule};
use crate::ruleset::RuleSet;

pub const US: &str = "US";

/// Closures outside any recurrence: (first day, last day, reason).
const US_CLOSURES: &[((i32, u32, u32), (i32, u32, u32), &str)] = &[
    ((1994, 4, 27), (1994, 4, 27), "National Day of Mourning for President Richard Nixon"),
    ((2001, 9, 11), (2001, 9, 16), "September 11 attacks; reopened September 17"),
    ((2004, 6, 11), (2004, 6, 11), "National Day of Mourning for President Ronald W. Reagan"),
    ((2007, 1, 2), (2007, 1, 2), "National Day of Mourning for President Gerald R. Ford"),
    ((2012, 10, 29), (2012, 10, 30), "Hurricane Sandy; reopened October 31"),
    ((2018, 12, 5), (2018, 12, 5), "National Day of Mourning for President George H. W. Bush"),
    ((2025, 1, 9), (2025, 1, 9), "National Day of Mourning for President Jimmy Carter"),
];

/// Every jurisdiction shipped with the engine.
pub fn builtin() -> Vec<RuleSet> {
    vec![united_states()]
}

/// NYSE holidays: ten recurring holidays with weekend observance where the
/// exchange applies it, plus the exceptional closures above.
///
/// New Year's Day falling on a Saturday is not observed on the preceding
/// Friday, which would close the market in the prior year.
pub fn united_states() -> RuleSet {
    let mut builder = RuleSet::builder(US)
        .observed(
            HolidayRule::new("New Year's Day", RecurrenceRule::fixed(1, 1)),
            None,
            Some(1),
        )
        .rule(HolidayRule {
            effective_from: NaiveDate::from_ymd_opt(1998, 1, 1),
            ..HolidayRule::new(
                "Martin Luther King Jr. Day",
                RecurrenceRule::nth_weekday(1, Weekday::Mon, 3),
            )
        })
        .rule(HolidayRule::new(
            "Washington's Birthday",
            RecurrenceRule::nth_weekday(2, Weekday::Mon, 3),
        ))
        .rule(HolidayRule::new("Good Friday", RecurrenceRule::easter(-2)))
        .rule(HolidayRule::new(
            "Memorial Day",
            RecurrenceRule::nth_weekday(5, Weekday::Mon, -1),
        ))
        .observed(
            HolidayRule {
                effective_from: NaiveDate::from_ymd_opt(2022, 1, 1),
                ..HolidayRule::new("Juneteenth", RecurrenceRule::fixed(6, 19))
            },
            Some(-1),
            Some(1),
        )
        .observed(
            HolidayRule::new("Independence Day", RecurrenceRule::fixed(7, 4)),
            Some(-1),
            Some(1),
        )
        .rule(HolidayRule::new(
            "Labor Day",
            RecurrenceRule::nth_weekday(9, Weekday::Mon, 1),
        ))
        .rule(HolidayRule::new(
            "Thanksgiving Day",
            RecurrenceRule::nth_weekday(11, Weekday::Thu, 4),
        ))
        .observed(
            HolidayRule::new("Christmas Day", RecurrenceRule::fixed(12, 25)),
            Some(-1),
            Some(1),
        );

    for &(first, last, reason) in US_CLOSURES {
        match closure(first, last, reason) {
            Some(entry) => builder = builder.exception(entry),
            None => tracing::warn!(reason, "skipping malformed closure"),
        }
    }

    builder.build()
}

fn closure(
    (y0, m0, d0): (i32, u32, u32),
    (y1, m1, d1): (i32, u32, u32),
    reason: &str,
) -> Option<ExceptionEntry> {
    let first = NaiveDate::from_ymd_opt(y0, m0, d0)?;
    let last = NaiveDate::from_ymd_opt(y1, m1, d1)?;
    ExceptionEntry::range(first, last, reason).ok()
}
