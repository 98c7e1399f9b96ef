//! Exceptional closures that no recurrence rule can express.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{HolidayError, Result};
use crate::window::DateWindow;

/// A one-off closure covering `first..=last`, with the reason it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionEntry {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub reason: String,
}

impl ExceptionEntry {
    pub fn single(date: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            first: date,
            last: date,
            reason: reason.into(),
        }
    }

    /// A closure spanning several consecutive days, both ends included.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRange` if `first > last`.
    pub fn range(first: NaiveDate, last: NaiveDate, reason: impl Into<String>) -> Result<Self> {
        if first > last {
            return Err(HolidayError::InvalidRange {
                start: first,
                end: last,
            });
        }
        Ok(Self {
            first,
            last,
            reason: reason.into(),
        })
    }

    /// Every closed day, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first
            .iter_days()
            .take_while(move |date| *date <= self.last)
    }
}

/// Hand-maintained list of closures for one jurisdiction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExceptionLedger {
    entries: Vec<ExceptionEntry>,
}

impl ExceptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ExceptionEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ExceptionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expanded closure days that fall inside `window`, in ledger order.
    ///
    /// Entries that overlap or repeat produce repeated dates; merging into a
    /// [`HolidaySet`](crate::HolidaySet) removes them.
    pub fn dates_within<'a>(
        &'a self,
        window: &'a DateWindow,
    ) -> impl Iterator<Item = NaiveDate> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.first <= window.end() && entry.last >= window.start())
            .flat_map(|entry| entry.dates())
            .filter(move |date| window.contains(*date))
    }
}

impl FromIterator<ExceptionEntry> for ExceptionLedger {
    fn from_iter<I: IntoIterator<Item = ExceptionEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn range_expands_inclusively() {
        let entry = ExceptionEntry::range(d(2001, 9, 11), d(2001, 9, 16), "September 11").unwrap();
        let dates: Vec<_> = entry.dates().collect();
        assert_eq!(dates.len(), 6);
        assert_eq!(dates.first(), Some(&d(2001, 9, 11)));
        assert_eq!(dates.last(), Some(&d(2001, 9, 16)));
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(matches!(
            ExceptionEntry::range(d(2012, 10, 30), d(2012, 10, 29), "Sandy"),
            Err(HolidayError::InvalidRange { .. })
        ));
    }

    #[test]
    fn dates_within_clips_to_window() {
        let ledger: ExceptionLedger = [
            ExceptionEntry::single(d(1994, 4, 27), "Nixon"),
            ExceptionEntry::range(d(2012, 10, 29), d(2012, 10, 30), "Sandy").unwrap(),
        ]
        .into_iter()
        .collect();
        let window = DateWindow::new(d(2012, 10, 30), d(2012, 12, 31)).unwrap();
        let dates: Vec<_> = ledger.dates_within(&window).collect();
        assert_eq!(dates, vec![d(2012, 10, 30)]);
    }
}
