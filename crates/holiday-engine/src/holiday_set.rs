//! The materialized holiday calendar for one window.

use chrono::NaiveDate;

use crate::error::{HolidayError, Result};
use crate::window::DateWindow;

/// Strictly ascending, duplicate-free holiday dates computed over `window`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidaySet {
    window: DateWindow,
    dates: Vec<NaiveDate>,
}

impl HolidaySet {
    /// Merge candidate dates: keep those inside `window`, sort, drop duplicates.
    ///
    /// Identity is the date alone; which rule produced it does not matter.
    pub fn from_dates(window: DateWindow, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut dates: Vec<NaiveDate> = dates
            .into_iter()
            .filter(|date| window.contains(*date))
            .collect();
        dates.sort_unstable();
        dates.dedup();
        Self { window, dates }
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    /// Holidays in `start..=end`. Bounds outside the computed window are
    /// clipped to it.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRange` if `start > end`.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> Result<&[NaiveDate]> {
        if start > end {
            return Err(HolidayError::InvalidRange { start, end });
        }
        let lo = self.dates.partition_point(|date| *date < start);
        let hi = self.dates.partition_point(|date| *date <= end);
        Ok(&self.dates[lo..hi])
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NaiveDate> {
        self.dates.iter()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl<'a> IntoIterator for &'a HolidaySet {
    type Item = &'a NaiveDate;
    type IntoIter = std::slice::Iter<'a, NaiveDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter()
    }
}
